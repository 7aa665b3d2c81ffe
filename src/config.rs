//! Detector parameters and environment overrides.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

fn parse_env_u32(name: &str, default: u32) -> u32 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u32>().ok())
        .unwrap_or(default)
}

fn parse_env_bool_u8(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u8>().ok())
        .map(|v| v != 0)
        .unwrap_or(default)
}

static CHECK_INVARIANTS: OnceLock<bool> = OnceLock::new();

/// `MSER_CHECK_INVARIANTS=1` turns on stack verification in release builds.
pub fn check_invariants_from_env() -> bool {
    *CHECK_INVARIANTS.get_or_init(|| parse_env_bool_u8("MSER_CHECK_INVARIANTS", false))
}

static MAX_DIM: OnceLock<Option<u32>> = OnceLock::new();

/// `MSER_MAX_DIM` caps the larger side of loaded images; unset or 0 disables it.
pub fn max_dim_from_env() -> Option<u32> {
    *MAX_DIM.get_or_init(|| match parse_env_u32("MSER_MAX_DIM", 0) {
        0 => None,
        v => Some(v),
    })
}

/// Log level requested through `MSER_LOG` (error, warn, info, debug, trace)
pub fn log_level_from_env() -> Option<log::LevelFilter> {
    std::env::var("MSER_LOG")
        .ok()
        .and_then(|v| v.trim().parse::<log::LevelFilter>().ok())
}

/// Knobs of a detection run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorParams {
    /// Keep a `MergeRecord` for every component folded during the flood
    pub record_history: bool,
    /// Verify the stack ordering after every collapse, even in release builds
    pub check_invariants: bool,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            record_history: false,
            check_invariants: check_invariants_from_env(),
        }
    }
}

impl DetectorParams {
    /// Read parameters from a JSON file; missing fields take their defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let params: DetectorParams = serde_json::from_str(r#"{ "record_history": true }"#).unwrap();
        assert!(params.record_history);
        assert_eq!(params.check_invariants, DetectorParams::default().check_invariants);
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        std::fs::write(&path, r#"{ "record_history": true, "check_invariants": true }"#).unwrap();
        let params = DetectorParams::from_json_file(&path).unwrap();
        assert!(params.record_history);
        assert!(params.check_invariants);
    }

    #[test]
    fn test_bad_json_is_params_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = DetectorParams::from_json_file(&path).unwrap_err();
        assert!(matches!(err, crate::MserError::Params(_)));
    }
}
