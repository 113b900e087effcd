//! JSON backup export/import
//!
//! A backup is a self-describing snapshot of the whole aggregate plus a
//! timestamp, pretty-printed so users can eyeball the file they are about to
//! restore. Import is the only path that can take an unset seed back to a
//! real one without generating - so it validates hard before anything is
//! replaced, and the caller still owes the user a confirmation prompt.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::consts::MAX_HISTORY;
use crate::state::GeneratorState;

/// Import failure taxonomy
#[derive(Debug, Error)]
pub enum ImportError {
    /// File contents are not parseable JSON
    #[error("backup file is not valid JSON: {0}")]
    MalformedBackup(#[from] serde_json::Error),

    /// JSON parsed but required fields are missing or unusable
    #[error("invalid backup format: {0}")]
    InvalidFormat(&'static str),
}

/// Snapshot payload written to a backup file
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    pub seed: i64,
    pub numbers: Vec<i64>,
    pub generation_count: u64,
    /// ISO-8601 UTC, also embedded in the file name
    pub timestamp: String,
}

impl Backup {
    /// `unique_numbers_backup_<timestamp>.json`
    pub fn file_name(&self) -> String {
        format!("unique_numbers_backup_{}.json", self.timestamp)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Snapshot the current state with a fresh timestamp.
///
/// An unset seed exports as 0; such a file will fail validation on import,
/// which is the correct fate for a backup of a never-seeded generator.
pub fn export_state(state: &GeneratorState) -> Backup {
    Backup {
        seed: state.seed.unwrap_or(0),
        numbers: state.history.iter().copied().collect(),
        generation_count: state.generation_count,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

/// Parse and validate backup file contents into a restorable state.
///
/// Unparsable input fails with [`ImportError::MalformedBackup`]; input that
/// parses but fails any field check fails with [`ImportError::InvalidFormat`].
/// Required fields: `seed` (non-zero integer), `numbers` (integer array),
/// `timestamp` (non-empty), `generationCount` (non-negative integer - zero
/// is valid here, unlike `seed`).
pub fn import_state(contents: &str) -> Result<GeneratorState, ImportError> {
    let value: Value = serde_json::from_str(contents)?;
    let obj = value
        .as_object()
        .ok_or(ImportError::InvalidFormat("payload is not a JSON object"))?;

    let seed = obj
        .get("seed")
        .and_then(Value::as_i64)
        .filter(|seed| *seed != 0)
        .ok_or(ImportError::InvalidFormat("seed is missing or zero"))?;

    let numbers = obj
        .get("numbers")
        .and_then(Value::as_array)
        .ok_or(ImportError::InvalidFormat("numbers is missing or not an array"))?;
    let numbers: Vec<i64> = numbers
        .iter()
        .map(Value::as_i64)
        .collect::<Option<_>>()
        .ok_or(ImportError::InvalidFormat("numbers contains a non-integer"))?;

    let timestamp_present = match obj.get("timestamp") {
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Null) | None => false,
        Some(_) => true,
    };
    if !timestamp_present {
        return Err(ImportError::InvalidFormat("timestamp is missing"));
    }

    let generation_count = obj
        .get("generationCount")
        .and_then(Value::as_u64)
        .ok_or(ImportError::InvalidFormat(
            "generationCount is missing or not a non-negative integer",
        ))?;

    // Restore only the window the live state would keep anyway
    let start = numbers.len().saturating_sub(MAX_HISTORY);
    Ok(GeneratorState {
        seed: Some(seed),
        history: numbers[start..].iter().copied().collect(),
        generation_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    fn sample_state() -> GeneratorState {
        GeneratorState {
            seed: Some(777),
            history: VecDeque::from([3, 14, 15, 92]),
            generation_count: 12,
        }
    }

    #[test]
    fn test_export_import_round_trip() {
        let state = sample_state();
        let json = export_state(&state).to_json().unwrap();
        assert_eq!(import_state(&json).unwrap(), state);
    }

    #[test]
    fn test_round_trip_with_zero_generation_count() {
        let state = GeneratorState {
            seed: Some(1),
            history: VecDeque::new(),
            generation_count: 0,
        };
        let json = export_state(&state).to_json().unwrap();
        assert_eq!(import_state(&json).unwrap(), state);
    }

    #[test]
    fn test_file_name_embeds_timestamp() {
        let backup = export_state(&sample_state());
        let name = backup.file_name();
        assert!(name.starts_with("unique_numbers_backup_"));
        assert!(name.ends_with(".json"));
        assert!(name.contains(&backup.timestamp));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            import_state("{not json"),
            Err(ImportError::MalformedBackup(_))
        ));
    }

    #[test]
    fn test_missing_fields_rejected() {
        // Parses fine, but lacks numbers/timestamp/generationCount
        assert!(matches!(
            import_state(r#"{"seed":1}"#),
            Err(ImportError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_zero_seed_rejected() {
        let json = r#"{"seed":0,"numbers":[1],"generationCount":1,"timestamp":"2024-01-01T00:00:00.000Z"}"#;
        assert!(matches!(
            import_state(json),
            Err(ImportError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_non_integer_numbers_rejected() {
        let json = r#"{"seed":5,"numbers":[1,"two"],"generationCount":1,"timestamp":"2024-01-01T00:00:00.000Z"}"#;
        assert!(matches!(
            import_state(json),
            Err(ImportError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_non_object_payload_rejected() {
        assert!(matches!(
            import_state("42"),
            Err(ImportError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_import_clamps_oversized_numbers() {
        let oversized: Vec<i64> = (0..(MAX_HISTORY as i64 + 10)).collect();
        let json = serde_json::json!({
            "seed": 9,
            "numbers": oversized,
            "generationCount": oversized.len(),
            "timestamp": "2024-01-01T00:00:00.000Z",
        })
        .to_string();

        let state = import_state(&json).unwrap();
        assert_eq!(state.history.len(), MAX_HISTORY);
        assert_eq!(state.history.front().copied(), Some(10));
    }
}
