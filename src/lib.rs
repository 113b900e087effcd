//! Unique Numbers - seeded number generation with persisted history
//!
//! Core modules:
//! - `rng`: Deterministic seed-to-value transform
//! - `state`: Generator aggregate and bounded FIFO history
//! - `persistence`: String-keyed persistence adapter
//! - `backup`: JSON backup export/import
//! - `session`: Workflow controller tying the pieces together

pub mod backup;
pub mod persistence;
pub mod rng;
pub mod session;
pub mod state;

pub use session::{Generated, ImportOutcome, Prompt, Session, StartupAction};
pub use state::GeneratorState;

/// Generator configuration constants
pub mod consts {
    /// Persist state once every this many generations
    pub const BACKUP_INTERVAL: u64 = 10;
    /// Maximum numbers kept in history (oldest evicted first)
    pub const MAX_HISTORY: usize = 1000;
    /// How many recent numbers are shown to the user
    pub const DISPLAY_LIMIT: usize = 10;
    /// Exclusive upper bound for the unpredictable fresh-seed fallback
    pub const FRESH_SEED_MAX: i64 = 1_000_000;
}
