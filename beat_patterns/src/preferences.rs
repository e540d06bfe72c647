use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::defaults::DifficultyDefaultsTable;
use crate::error::ErrorKind;
use crate::PatternError;

pub const CONFIG_FILE_NAME: &str = ".BeatPatternsConfig";

/// Places searched for the pattern library when none is configured.
pub const PATTERN_SEARCH_PATHS: [&str; 3] = [
    "/usr/local/etc/BeatPatterns/Patterns",
    "Patterns",
    "../BeatPatterns/Patterns",
];

/// User preferences, stored as JSON and meant to be hand-edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patterns_path: Option<PathBuf>,
    #[serde(default = "default_level_author")]
    pub level_author_name: String,
    #[serde(default = "DifficultyDefaultsTable::builtin")]
    pub difficulty_defaults: DifficultyDefaultsTable,
}

fn default_level_author() -> String {
    "Your Name Here".to_string()
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            patterns_path: None,
            level_author_name: default_level_author(),
            difficulty_defaults: DifficultyDefaultsTable::builtin(),
        }
    }
}

impl Preferences {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PatternError> {
        let path = path.as_ref();
        let file = path.display().to_string();
        let bytes = fs::read(path).map_err(|e| {
            PatternError::new("E1005", format!("failed to read preferences {file}: {e}"))
                .with_kind(ErrorKind::IO)
                .with_file(file.clone())
        })?;
        let prefs: Preferences = serde_json::from_slice(&bytes).map_err(|e| {
            PatternError::new("E1005", format!("invalid preferences json in {file}: {e}"))
                .with_file(file.clone())
        })?;
        prefs.difficulty_defaults.validate()?;
        Ok(prefs)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PatternError> {
        let path = path.as_ref();
        let file = path.display().to_string();
        let mut json = serde_json::to_string_pretty(self).map_err(|e| {
            PatternError::new("E1005", format!("failed to serialize preferences: {e}"))
        })?;
        json.push('\n');
        fs::write(path, json).map_err(|e| {
            PatternError::new("E1005", format!("failed to write preferences {file}: {e}"))
                .with_kind(ErrorKind::IO)
                .with_file(file.clone())
        })
    }

    /// Configured library path if set, else the first existing search path.
    pub fn find_patterns_dir(&self) -> Option<PathBuf> {
        if let Some(path) = &self.patterns_path {
            return Some(path.clone());
        }
        PATTERN_SEARCH_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|p| p.is_dir())
    }
}
