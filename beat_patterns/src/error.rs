use beatmap_schema::{Beat, LevelDifficulty};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    IO,
    Parse,
    Config,
    Generation,
    Unsupported,
}

impl ErrorKind {
    pub(crate) fn from_code(code: &'static str) -> Self {
        match code {
            // IO
            "E1001" | "E1003" => Self::IO,

            // Parse
            "E1002" | "E1004" | "E1005" => Self::Parse,

            // Config
            "E2001" | "E2002" | "E2003" | "E2004" => Self::Config,

            // Generation
            "E3001" | "E3002" => Self::Generation,

            "E4001" => Self::Unsupported,

            _ => Self::Config,
        }
    }
}

#[derive(Debug, Error, Clone)]
#[error("{code}: {message}")]
pub struct PatternError {
    pub code: &'static str,
    pub kind: ErrorKind,
    pub message: String,

    pub file: Option<String>,
    pub pattern: Option<String>,
    pub difficulty: Option<LevelDifficulty>,
    pub beat: Option<Beat>,
}

impl PatternError {
    pub(crate) fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            kind: ErrorKind::from_code(code),
            message: message.into(),

            file: None,
            pattern: None,
            difficulty: None,
            beat: None,
        }
    }

    pub fn with_kind(mut self, kind: ErrorKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn with_difficulty(mut self, difficulty: LevelDifficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    pub fn with_beat(mut self, beat: Beat) -> Self {
        self.beat = Some(beat);
        self
    }
}
