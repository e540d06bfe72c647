use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod sequence;

pub use sequence::{BeatmapStats, DISTINCT_TIME_DELTA, LARGE_GAP_SECONDS};

/// Time measured in beats of the song.
pub type Beat = f64;

pub const NOTE_TYPE_RED: i32 = 0;
pub const NOTE_TYPE_BLUE: i32 = 1;
pub const NOTE_TYPE_BOMB: i32 = 3;

pub const GRID_ROWS: i32 = 3;
pub const GRID_COLUMNS: i32 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {what}: {value}")]
pub struct UnknownName {
    pub what: &'static str,
    pub value: String,
}

/// Difficulty levels of a song, matching the names used in `info.dat`.
///
/// `All` is a meta-value: it selects fallback defaults and bulk generation,
/// it is never written into a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LevelDifficulty {
    Easy,
    Normal,
    Hard,
    Expert,
    ExpertPlus,
    All,
}

impl LevelDifficulty {
    pub const LEVELS: [LevelDifficulty; 5] = [
        LevelDifficulty::Easy,
        LevelDifficulty::Normal,
        LevelDifficulty::Hard,
        LevelDifficulty::Expert,
        LevelDifficulty::ExpertPlus,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LevelDifficulty::Easy => "Easy",
            LevelDifficulty::Normal => "Normal",
            LevelDifficulty::Hard => "Hard",
            LevelDifficulty::Expert => "Expert",
            LevelDifficulty::ExpertPlus => "ExpertPlus",
            LevelDifficulty::All => "All",
        }
    }

    /// Chart file name used for this difficulty, e.g. `Hard.dat`.
    pub fn beatmap_filename(self) -> String {
        format!("{}.dat", self.as_str())
    }
}

impl fmt::Display for LevelDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LevelDifficulty {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(LevelDifficulty::Easy),
            "normal" => Ok(LevelDifficulty::Normal),
            "hard" => Ok(LevelDifficulty::Hard),
            "expert" => Ok(LevelDifficulty::Expert),
            "expertplus" | "expert+" => Ok(LevelDifficulty::ExpertPlus),
            "all" => Ok(LevelDifficulty::All),
            _ => Err(UnknownName {
                what: "difficulty",
                value: s.to_string(),
            }),
        }
    }
}

/// How hard a pattern is to play. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PatternDifficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CubeType {
    /// Left hand.
    Red,
    /// Right hand.
    Blue,
    Bomb,
}

impl CubeType {
    pub fn code(self) -> i32 {
        match self {
            CubeType::Red => NOTE_TYPE_RED,
            CubeType::Blue => NOTE_TYPE_BLUE,
            CubeType::Bomb => NOTE_TYPE_BOMB,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            NOTE_TYPE_RED => Some(CubeType::Red),
            NOTE_TYPE_BLUE => Some(CubeType::Blue),
            NOTE_TYPE_BOMB => Some(CubeType::Bomb),
            _ => None,
        }
    }

    pub fn swapped(self) -> Self {
        match self {
            CubeType::Red => CubeType::Blue,
            CubeType::Blue => CubeType::Red,
            CubeType::Bomb => CubeType::Bomb,
        }
    }
}

/// Slash directions, laid out on the grid as
///
/// ```text
///  4 0 5
///  2 8 3
///  6 1 7
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CutDirection {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutCategory {
    Vertical,
    Horizontal,
    Diagonal,
    Dot,
}

impl CutDirection {
    pub fn code(self) -> i32 {
        match self {
            CutDirection::Up => 0,
            CutDirection::Down => 1,
            CutDirection::Left => 2,
            CutDirection::Right => 3,
            CutDirection::UpLeft => 4,
            CutDirection::UpRight => 5,
            CutDirection::DownLeft => 6,
            CutDirection::DownRight => 7,
            CutDirection::Center => 8,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            0 => CutDirection::Up,
            1 => CutDirection::Down,
            2 => CutDirection::Left,
            3 => CutDirection::Right,
            4 => CutDirection::UpLeft,
            5 => CutDirection::UpRight,
            6 => CutDirection::DownLeft,
            7 => CutDirection::DownRight,
            8 => CutDirection::Center,
            _ => return None,
        })
    }

    pub fn category(self) -> CutCategory {
        match self {
            CutDirection::Up | CutDirection::Down => CutCategory::Vertical,
            CutDirection::Left | CutDirection::Right => CutCategory::Horizontal,
            CutDirection::UpLeft
            | CutDirection::UpRight
            | CutDirection::DownLeft
            | CutDirection::DownRight => CutCategory::Diagonal,
            CutDirection::Center => CutCategory::Dot,
        }
    }

    pub fn mirror_left_right(self) -> Self {
        match self {
            CutDirection::Up | CutDirection::Down | CutDirection::Center => self,
            CutDirection::Left => CutDirection::Right,
            CutDirection::Right => CutDirection::Left,
            CutDirection::UpLeft => CutDirection::UpRight,
            CutDirection::UpRight => CutDirection::UpLeft,
            CutDirection::DownLeft => CutDirection::DownRight,
            CutDirection::DownRight => CutDirection::DownLeft,
        }
    }

    pub fn mirror_up_down(self) -> Self {
        match self {
            CutDirection::Left | CutDirection::Right | CutDirection::Center => self,
            CutDirection::Up => CutDirection::Down,
            CutDirection::Down => CutDirection::Up,
            CutDirection::UpLeft => CutDirection::DownLeft,
            CutDirection::UpRight => CutDirection::DownRight,
            CutDirection::DownLeft => CutDirection::UpLeft,
            CutDirection::DownRight => CutDirection::UpRight,
        }
    }

    pub fn mirrored(self, left_right: bool, up_down: bool) -> Self {
        let mut out = self;
        if left_right {
            out = out.mirror_left_right();
        }
        if up_down {
            out = out.mirror_up_down();
        }
        out
    }
}

/// One `difficulty.dat` file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BeatmapData {
    #[serde(rename = "_version", default = "default_version")]
    pub version: String,
    #[serde(rename = "_events", default)]
    pub events: Vec<Event>,
    #[serde(rename = "_notes", default)]
    pub notes: Vec<Note>,

    /// Set whenever the notes are modified; the host decides when to save.
    #[serde(skip)]
    pub has_changed: bool,
}

fn default_version() -> String {
    "2.0.0".to_string()
}

impl Default for BeatmapData {
    fn default() -> Self {
        Self {
            version: default_version(),
            events: Vec::new(),
            notes: Vec::new(),
            has_changed: false,
        }
    }
}

impl BeatmapData {
    /// Serializes without pretty printing; downstream tools expect one line.
    pub fn to_compact_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Event {
    #[serde(rename = "_time")]
    pub time: Beat,
    #[serde(rename = "_type")]
    pub event_type: i32,
    #[serde(rename = "_value")]
    pub value: i32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Note {
    #[serde(rename = "_time")]
    pub time: Beat,
    /// Column, 0 (leftmost) to 3.
    #[serde(rename = "_lineIndex")]
    pub line_index: i32,
    /// Row, 0 (bottom) to 2.
    #[serde(rename = "_lineLayer")]
    pub line_layer: i32,
    #[serde(rename = "_type")]
    pub note_type: i32,
    #[serde(rename = "_cutDirection")]
    pub cut_direction: i32,
}

impl Note {
    pub fn cube_type(&self) -> Option<CubeType> {
        CubeType::from_code(self.note_type)
    }

    pub fn direction(&self) -> Option<CutDirection> {
        CutDirection::from_code(self.cut_direction)
    }
}
