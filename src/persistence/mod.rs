//! Persistence adapter
//!
//! Maps [`GeneratorState`] onto three string keys in a [`KvStore`], the same
//! layout older deployments of this generator wrote:
//! - `uniqueSeed`: integer as text
//! - `generationCount`: integer as text
//! - `uniqueNumbers`: JSON-encoded integer array
//!
//! The adapter knows *how* to persist, never *when* - the every-N-generations
//! policy lives in the session workflow. Saves are fail-silent: restrictive
//! storage is pre-warned by the startup probe, so a failing write here is
//! logged and swallowed rather than surfaced to callers that cannot react.

mod store;

pub use store::{FileKvStore, KvStore, MemoryKvStore, StoreError};

use std::collections::VecDeque;

use crate::consts::MAX_HISTORY;
use crate::state::GeneratorState;

const KEY_SEED: &str = "uniqueSeed";
const KEY_COUNT: &str = "generationCount";
const KEY_NUMBERS: &str = "uniqueNumbers";
/// Throwaway key used by the capability probe
const KEY_PROBE: &str = "privateTest";

/// Load the generator state, substituting defaults for absent or malformed
/// keys (fresh storage, partial wipes, and hand-edited files all degrade to
/// a clean state rather than an error).
pub fn load(store: &impl KvStore) -> GeneratorState {
    let seed = store
        .get(KEY_SEED)
        .and_then(|text| text.trim().parse::<i64>().ok());
    let generation_count = store
        .get(KEY_COUNT)
        .and_then(|text| text.trim().parse::<u64>().ok())
        .unwrap_or(0);
    let mut history: VecDeque<i64> = store
        .get(KEY_NUMBERS)
        .and_then(|text| serde_json::from_str(&text).ok())
        .unwrap_or_default();
    // Enforce the window bound even on oversized stored data
    while history.len() > MAX_HISTORY {
        history.pop_front();
    }

    let state = GeneratorState {
        seed,
        history,
        generation_count,
    };
    log::info!(
        "loaded state: seed {:?}, {} numbers, {} generations",
        state.seed,
        state.history.len(),
        state.generation_count
    );
    state
}

/// Write the full state. All three keys are written in one call so no other
/// component ever observes a partial-field update.
pub fn save(store: &mut impl KvStore, state: &GeneratorState) {
    let result = (|| -> Result<(), StoreError> {
        match state.seed {
            Some(seed) => store.set(KEY_SEED, &seed.to_string())?,
            None => store.remove(KEY_SEED)?,
        }
        store.set(KEY_COUNT, &state.generation_count.to_string())?;
        let numbers = serde_json::to_string(&state.history)?;
        store.set(KEY_NUMBERS, &numbers)?;
        Ok(())
    })();

    match result {
        Ok(()) => log::debug!(
            "saved state at generation {} ({} numbers)",
            state.generation_count,
            state.history.len()
        ),
        Err(err) => log::warn!("state save failed: {err}"),
    }
}

/// One-shot capability probe: a trivial write + delete.
///
/// Returns false when the store rejects writes (typically restrictive or
/// private-mode storage). Informational only - callers warn the user and
/// carry on.
pub fn check_available(store: &mut impl KvStore) -> bool {
    store.set(KEY_PROBE, "1").is_ok() && store.remove(KEY_PROBE).is_ok()
}
