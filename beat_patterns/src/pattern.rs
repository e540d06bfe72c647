use std::collections::BTreeMap;

use beatmap_schema::{CubeType, CutDirection, LevelDifficulty, PatternDifficulty};
use serde::{Deserialize, Serialize};

pub const DEFAULT_WEIGHT: i32 = 500;
pub const DEFAULT_STEP: f64 = 1.0;

/// How often a pattern is drawn at each level difficulty.
///
/// 0 never uses the pattern, 500 is average and 1000 is twice as often.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UseWeights {
    #[serde(default = "default_weight", skip_serializing_if = "not_positive")]
    pub easy: i32,
    #[serde(default = "default_weight", skip_serializing_if = "not_positive")]
    pub normal: i32,
    #[serde(default = "default_weight", skip_serializing_if = "not_positive")]
    pub hard: i32,
    #[serde(default = "default_weight", skip_serializing_if = "not_positive")]
    pub expert: i32,
    #[serde(default = "default_weight", skip_serializing_if = "not_positive")]
    pub expert_plus: i32,
}

fn default_weight() -> i32 {
    DEFAULT_WEIGHT
}

fn not_positive(v: &i32) -> bool {
    *v <= 0
}

fn is_false(v: &bool) -> bool {
    !*v
}

impl Default for UseWeights {
    fn default() -> Self {
        Self::uniform(DEFAULT_WEIGHT)
    }
}

impl UseWeights {
    pub fn uniform(weight: i32) -> Self {
        Self {
            easy: weight,
            normal: weight,
            hard: weight,
            expert: weight,
            expert_plus: weight,
        }
    }

    /// `All` uses the Easy weight.
    pub fn for_difficulty(&self, difficulty: LevelDifficulty) -> i32 {
        match difficulty {
            LevelDifficulty::Easy | LevelDifficulty::All => self.easy,
            LevelDifficulty::Normal => self.normal,
            LevelDifficulty::Hard => self.hard,
            LevelDifficulty::Expert => self.expert,
            LevelDifficulty::ExpertPlus => self.expert_plus,
        }
    }
}

/// A grid cell a pattern may start from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Column, 0 (leftmost) to 3.
    pub line_index: i32,
    /// Row, 0 (bottom) to 2.
    pub line_layer: i32,
    #[serde(default, skip_serializing_if = "is_false")]
    pub preferred: bool,
}

impl Location {
    pub fn start_weight(&self) -> f64 {
        if self.preferred {
            10.0
        } else {
            3.0
        }
    }
}

/// One note of a pattern, relative to the chosen starting location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternNote {
    pub cube_type: CubeType,
    pub cut_direction: CutDirection,
    #[serde(default)]
    pub relative_x: i32,
    #[serde(default)]
    pub relative_y: i32,
}

/// Notes struck at the same instant.
pub type NoteGroup = Vec<PatternNote>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepBreakpoint {
    #[serde(rename = "maxBPM")]
    pub max_bpm: f64,
    #[serde(rename = "stepBy")]
    pub step_by: f64,
}

/// Beats advanced between note groups, tiered by difficulty then by tempo.
///
/// Each tier lists breakpoints in ascending `maxBPM` order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepTable(pub BTreeMap<LevelDifficulty, Vec<StepBreakpoint>>);

impl StepTable {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn step_for(&self, difficulty: LevelDifficulty, bpm: f64) -> f64 {
        let wanted = match difficulty {
            LevelDifficulty::All => LevelDifficulty::Easy,
            d => d,
        };
        let tier = self
            .0
            .range(..=wanted)
            .next_back()
            .map(|(_, tier)| tier)
            .or_else(|| self.0.get(&LevelDifficulty::All));

        let Some(tier) = tier else {
            return DEFAULT_STEP;
        };
        tier.iter()
            .find(|bp| bp.max_bpm >= bpm)
            .or_else(|| tier.last())
            .map_or(DEFAULT_STEP, |bp| bp.step_by)
    }

    /// First step that is not a positive finite number.
    pub(crate) fn invalid_step(&self) -> Option<f64> {
        self.0
            .values()
            .flatten()
            .map(|bp| bp.step_by)
            .find(|s| !(s.is_finite() && *s > 0.0))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transformation {
    pub pattern_name: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub swap_colors: bool,
    /// Mirrors locations and cut directions.
    #[serde(default, skip_serializing_if = "is_false")]
    pub mirror_left_right: bool,
    /// Flips cut directions only; locations stay.
    #[serde(default, skip_serializing_if = "is_false")]
    pub swap_up_down: bool,
    /// Keep the source cubes alongside the transformed ones.
    #[serde(default, skip_serializing_if = "is_false")]
    pub duplicate_cubes: bool,
}

/// The playable content of a pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternShape {
    pub starting_locations: Vec<Location>,
    pub note_sequence: Vec<NoteGroup>,
}

impl PatternShape {
    pub fn note_count(&self) -> usize {
        self.note_sequence.iter().map(Vec::len).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternBody {
    Direct(PatternShape),
    Transformation(Transformation),
}

/// A named template of notes, loaded from the pattern library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PatternRecord", into = "PatternRecord")]
pub struct Pattern {
    pub name: String,
    pub difficulty: PatternDifficulty,
    pub use_weights: UseWeights,
    pub step_by: StepTable,
    pub body: PatternBody,
}

impl Pattern {
    pub fn direct(name: impl Into<String>, shape: PatternShape) -> Self {
        Self {
            name: name.into(),
            difficulty: PatternDifficulty::default(),
            use_weights: UseWeights::default(),
            step_by: StepTable::default(),
            body: PatternBody::Direct(shape),
        }
    }

    pub fn transformed(name: impl Into<String>, transformation: Transformation) -> Self {
        Self {
            name: name.into(),
            difficulty: PatternDifficulty::default(),
            use_weights: UseWeights::default(),
            step_by: StepTable::default(),
            body: PatternBody::Transformation(transformation),
        }
    }

    pub fn with_weights(mut self, use_weights: UseWeights) -> Self {
        self.use_weights = use_weights;
        self
    }

    pub fn with_step_by(mut self, step_by: StepTable) -> Self {
        self.step_by = step_by;
        self
    }

    pub fn weight(&self, difficulty: LevelDifficulty) -> i32 {
        self.use_weights.for_difficulty(difficulty)
    }

    pub fn transformation(&self) -> Option<&Transformation> {
        match &self.body {
            PatternBody::Transformation(t) => Some(t),
            PatternBody::Direct(_) => None,
        }
    }

    pub fn is_transformation(&self) -> bool {
        self.transformation().is_some()
    }
}

// On-disk layout. A record carrying `transformation` is a transformation and
// its own locations/notes are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PatternRecord {
    name: String,
    #[serde(default)]
    difficulty: PatternDifficulty,
    #[serde(default)]
    use_weights: UseWeights,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    starting_locations: Vec<Location>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    note_sequence: Vec<NoteGroup>,
    #[serde(default, skip_serializing_if = "StepTable::is_empty")]
    step_by: StepTable,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    transformation: Option<Transformation>,
}

impl From<PatternRecord> for Pattern {
    fn from(r: PatternRecord) -> Self {
        let body = match r.transformation {
            Some(t) => PatternBody::Transformation(t),
            None => PatternBody::Direct(PatternShape {
                starting_locations: r.starting_locations,
                note_sequence: r.note_sequence,
            }),
        };
        Self {
            name: r.name,
            difficulty: r.difficulty,
            use_weights: r.use_weights,
            step_by: r.step_by,
            body,
        }
    }
}

impl From<Pattern> for PatternRecord {
    fn from(p: Pattern) -> Self {
        let (starting_locations, note_sequence, transformation) = match p.body {
            PatternBody::Direct(shape) => (shape.starting_locations, shape.note_sequence, None),
            PatternBody::Transformation(t) => (Vec::new(), Vec::new(), Some(t)),
        };
        Self {
            name: p.name,
            difficulty: p.difficulty,
            use_weights: p.use_weights,
            starting_locations,
            note_sequence,
            step_by: p.step_by,
            transformation,
        }
    }
}
