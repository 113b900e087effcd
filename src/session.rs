//! Session controller
//!
//! Owns the [`GeneratorState`] and its backing store for the lifetime of one
//! run. All mutation goes through here: generation, backup import, and the
//! startup integrity check. Operations run to completion one at a time -
//! there is no concurrent trigger path.
//!
//! Periodic-save policy: state is written once every
//! [`BACKUP_INTERVAL`](crate::consts::BACKUP_INTERVAL) generations, so up to
//! `BACKUP_INTERVAL - 1` generations can be lost if the process dies between
//! saves. That window is an accepted trade-off, not a bug.

use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;
use thiserror::Error;

use crate::backup::{self, ImportError};
use crate::consts::{BACKUP_INTERVAL, DISPLAY_LIMIT, FRESH_SEED_MAX};
use crate::persistence::{self, KvStore};
use crate::rng::{self, RangeError};
use crate::state::GeneratorState;

/// User-facing confirmation and notification hooks.
///
/// Stands in for the blocking confirm/alert dialogs of a UI so the core
/// workflow stays testable without one.
pub trait Prompt {
    /// Ask a yes/no question; false means the user declined.
    fn confirm(&mut self, message: &str) -> bool;
    /// One-way informational message.
    fn notify(&mut self, message: &str);
}

/// Outcome of one successful generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generated {
    pub value: i64,
    /// Raised every `BACKUP_INTERVAL` generations as an export reminder
    pub backup_recommended: bool,
}

/// What the caller should do after the startup check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupAction {
    /// State is usable; proceed to normal operation
    Ready,
    /// User chose to restore from a backup; caller must drive an import
    AwaitImport,
}

/// Result of a validated import
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    /// State replaced and persisted
    Restored,
    /// User declined the overwrite; state untouched
    Declined,
}

/// Backup export failure
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot write backup file: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot encode backup: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// One run of the generator: live state plus its backing store.
pub struct Session<S: KvStore> {
    state: GeneratorState,
    store: S,
}

impl<S: KvStore> Session<S> {
    /// Load state from the store and wrap both into a session.
    pub fn open(store: S) -> Self {
        let state = persistence::load(&store);
        Self { state, store }
    }

    pub fn state(&self) -> &GeneratorState {
        &self.state
    }

    /// Startup integrity check and capability probe.
    ///
    /// Empty state offers the user a restore; declining seeds fresh from an
    /// unpredictable source and persists immediately. The probe failure is a
    /// warning only - nothing is blocked.
    pub fn startup(&mut self, prompt: &mut dyn Prompt) -> StartupAction {
        if !persistence::check_available(&mut self.store) {
            prompt.notify(
                "Storage appears to be restricted. Generated data will not survive this session.",
            );
        }

        if self.state.is_empty() {
            if prompt.confirm("No generator data found. Restore from a backup file?") {
                return StartupAction::AwaitImport;
            }
            let seed = self.reseed();
            log::info!("seeded fresh generator with {seed}");
            persistence::save(&mut self.store, &self.state);
            prompt.notify("Starting with a fresh seed.");
        }
        StartupAction::Ready
    }

    /// Generate one number in `[min, max]` inclusive.
    ///
    /// `min >= max` fails with [`RangeError::InvalidRange`] and mutates
    /// nothing. On success the seed advances by 1 (the consumed value is the
    /// pre-increment one), the value joins the history, the counter bumps,
    /// and the state is persisted on every `BACKUP_INTERVAL`-th generation.
    pub fn generate(&mut self, min: i64, max: i64) -> Result<Generated, RangeError> {
        // Validate before touching anything, including the lazy reseed
        if min >= max {
            return Err(RangeError::InvalidRange { min, max });
        }

        let seed = match self.state.seed {
            Some(seed) => seed,
            // Reachable only when the user skipped both restore and fresh
            // seeding at startup; seed on demand with the same fallback
            None => self.reseed(),
        };
        let value = rng::ranged_int(seed, min, max)?;

        self.state.seed = Some(seed.wrapping_add(1));
        self.state.push(value);
        self.state.generation_count += 1;

        let at_interval = self.state.generation_count % BACKUP_INTERVAL == 0;
        if at_interval {
            persistence::save(&mut self.store, &self.state);
        }

        Ok(Generated {
            value,
            backup_recommended: at_interval,
        })
    }

    /// Write a timestamped backup file into `dir`, returning its path.
    pub fn export_backup(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        let backup = backup::export_state(&self.state);
        let path = dir.join(backup.file_name());
        fs::write(&path, backup.to_json()?)?;
        log::info!("exported backup to {}", path.display());
        Ok(path)
    }

    /// Validate backup contents, confirm the overwrite, then replace and
    /// persist the whole aggregate. Declining leaves state untouched.
    pub fn import_backup(
        &mut self,
        contents: &str,
        prompt: &mut dyn Prompt,
    ) -> Result<ImportOutcome, ImportError> {
        let restored = backup::import_state(contents)?;
        if !prompt.confirm("Restore data from this backup? Current data will be replaced.") {
            return Ok(ImportOutcome::Declined);
        }

        self.state = restored;
        persistence::save(&mut self.store, &self.state);
        log::info!(
            "restored state from backup: {} generations, {} numbers",
            self.state.generation_count,
            self.state.history.len()
        );
        Ok(ImportOutcome::Restored)
    }

    /// The last `DISPLAY_LIMIT` generated numbers, oldest first.
    pub fn visible_history(&self) -> Vec<i64> {
        self.state.visible_tail(DISPLAY_LIMIT)
    }

    fn reseed(&mut self) -> i64 {
        let seed = rand::rng().random_range(1..FRESH_SEED_MAX);
        self.state.seed = Some(seed);
        seed
    }
}
