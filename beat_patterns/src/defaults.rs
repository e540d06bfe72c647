use beatmap_schema::LevelDifficulty;
use serde::{Deserialize, Serialize};

use crate::PatternError;

/// Pacing defaults for one level difficulty, all in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyDefaults {
    pub difficulty: LevelDifficulty,
    /// Silence before the first note.
    pub minimum_initial_whitespace: f64,
    pub minimum_delay_between_patterns: f64,
    pub maximum_delay_between_patterns: f64,
}

impl DifficultyDefaults {
    pub fn validate(&self) -> Result<(), PatternError> {
        let values = [
            self.minimum_initial_whitespace,
            self.minimum_delay_between_patterns,
            self.maximum_delay_between_patterns,
        ];
        if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(PatternError::new(
                "E2003",
                format!("difficulty defaults for {} must be finite and >= 0", self.difficulty),
            )
            .with_difficulty(self.difficulty));
        }
        if self.minimum_delay_between_patterns > self.maximum_delay_between_patterns {
            return Err(PatternError::new(
                "E2003",
                format!(
                    "difficulty defaults for {}: minimum delay {} exceeds maximum delay {}",
                    self.difficulty,
                    self.minimum_delay_between_patterns,
                    self.maximum_delay_between_patterns
                ),
            )
            .with_difficulty(self.difficulty));
        }
        Ok(())
    }
}

/// Per-difficulty defaults with an optional `All` catch-all entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DifficultyDefaultsTable(pub Vec<DifficultyDefaults>);

impl DifficultyDefaultsTable {
    pub fn builtin() -> Self {
        Self(vec![DifficultyDefaults {
            difficulty: LevelDifficulty::All,
            minimum_initial_whitespace: 4.0,
            minimum_delay_between_patterns: 0.05,
            maximum_delay_between_patterns: 4.0,
        }])
    }

    pub fn get(&self, difficulty: LevelDifficulty) -> Option<&DifficultyDefaults> {
        self.0.iter().find(|d| d.difficulty == difficulty)
    }

    /// Entry for `difficulty`, else the `All` entry.
    pub fn lookup(&self, difficulty: LevelDifficulty) -> Result<&DifficultyDefaults, PatternError> {
        self.get(difficulty)
            .or_else(|| self.get(LevelDifficulty::All))
            .ok_or_else(|| {
                PatternError::new(
                    "E2002",
                    format!("no difficulty defaults for {difficulty} and no All entry"),
                )
                .with_difficulty(difficulty)
            })
    }

    /// Replaces the entry for `defaults.difficulty`, or adds it.
    pub fn set(&mut self, defaults: DifficultyDefaults) {
        match self.0.iter_mut().find(|d| d.difficulty == defaults.difficulty) {
            Some(existing) => *existing = defaults,
            None => self.0.push(defaults),
        }
    }

    pub fn validate(&self) -> Result<(), PatternError> {
        self.0.iter().try_for_each(DifficultyDefaults::validate)
    }
}
