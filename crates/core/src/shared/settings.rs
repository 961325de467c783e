use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::faces::domain::feature_gate::FeatureGate;
use crate::optimize::pairing::PairingStrategy;
use crate::optimize::subject_groups::PairOrder;
use crate::shared::constants::{DEFAULT_MATCH_DIST, SETTINGS_DIR_NAME, SETTINGS_FILE_NAME};

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Tunables for a face optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerSettings {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_match_dist")]
    pub match_dist: f64,
    #[serde(default)]
    pub strategy: PairingStrategy,
    #[serde(default)]
    pub order: PairOrder,
}

fn default_enabled() -> bool {
    true
}

fn default_match_dist() -> f64 {
    DEFAULT_MATCH_DIST
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            match_dist: default_match_dist(),
            strategy: PairingStrategy::default(),
            order: PairOrder::default(),
        }
    }
}

impl OptimizerSettings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(SETTINGS_DIR_NAME).join(SETTINGS_FILE_NAME))
    }

    /// Loads settings from the user config directory, falling back to
    /// defaults when the file is missing or unreadable.
    pub fn load() -> Self {
        Self::config_path()
            .and_then(|path| Self::load_from(&path).ok())
            .unwrap_or_default()
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl FeatureGate for OptimizerSettings {
    fn is_disabled(&self) -> bool {
        !self.enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults() {
        let settings = OptimizerSettings::default();
        assert!(settings.enabled);
        assert!(!settings.is_disabled());
        assert_relative_eq!(settings.match_dist, DEFAULT_MATCH_DIST);
        assert_eq!(settings.strategy, PairingStrategy::Greedy);
        assert_eq!(settings.order, PairOrder::Id);
    }

    #[test]
    fn test_disabled_gate() {
        let settings = OptimizerSettings {
            enabled: false,
            ..Default::default()
        };
        assert!(settings.is_disabled());
    }

    #[test]
    fn test_load_from_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"strategy": "maximum", "match_dist": 0.3}"#).unwrap();

        let settings = OptimizerSettings::load_from(&path).unwrap();

        assert!(settings.enabled);
        assert_eq!(settings.strategy, PairingStrategy::Maximum);
        assert_eq!(settings.order, PairOrder::Id);
        assert_relative_eq!(settings.match_dist, 0.3);
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = OptimizerSettings::load_from(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, SettingsError::Read { .. }));
    }

    #[test]
    fn test_load_from_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"strategy": "optimal"}"#).unwrap();

        let err = OptimizerSettings::load_from(&path).unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
    }

    #[test]
    fn test_round_trip_through_json() {
        let settings = OptimizerSettings {
            enabled: false,
            match_dist: 0.25,
            strategy: PairingStrategy::Maximum,
            order: PairOrder::Fetched,
        };
        let json = serde_json::to_string_pretty(&settings).unwrap();
        assert!(json.contains(r#""order": "fetched""#));
        let back: OptimizerSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }
}
