use beatmap_schema::{BeatmapData, LevelDifficulty};
use rand::Rng;

mod defaults;
mod error;
mod generator;
mod library;
mod pattern;
mod preferences;
mod rng;
mod saber;
mod select;
mod transform;

pub use defaults::{DifficultyDefaults, DifficultyDefaultsTable};
pub use error::{ErrorKind, PatternError};
pub use generator::{Generator, GeneratorContext, Song, MINIMUM_REMAINING_SECONDS};
pub use library::{load_patterns, PatternId, PatternLibrary};
pub use pattern::{
    Location, NoteGroup, Pattern, PatternBody, PatternNote, PatternShape, StepBreakpoint, StepTable,
    Transformation, UseWeights, DEFAULT_STEP, DEFAULT_WEIGHT,
};
pub use preferences::{Preferences, CONFIG_FILE_NAME, PATTERN_SEARCH_PATHS};
pub use rng::create_rng;
pub use saber::SaberLocation;
pub use select::weighted_index;

/// Caller overrides of the difficulty defaults. `None` keeps the default.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GenerateOptions {
    pub initial_silence: Option<f64>,
    pub minimum_delay: Option<f64>,
    pub maximum_delay: Option<f64>,
    pub pattern_snap_to: Option<u32>,
}

/// Generates a fresh beatmap for one level difficulty.
pub fn generate_beatmap<R: Rng>(
    context: GeneratorContext<'_>,
    song: Song,
    difficulty: LevelDifficulty,
    rng: R,
) -> Result<BeatmapData, PatternError> {
    generate_beatmap_with_options(context, song, difficulty, rng, GenerateOptions::default())
}

pub fn generate_beatmap_with_options<R: Rng>(
    context: GeneratorContext<'_>,
    song: Song,
    difficulty: LevelDifficulty,
    rng: R,
    options: GenerateOptions,
) -> Result<BeatmapData, PatternError> {
    let mut beatmap = BeatmapData::default();
    {
        let mut generator = Generator::new(context, song, difficulty, &mut beatmap, rng)?;
        if let Some(v) = options.initial_silence {
            generator.set_minimum_initial_whitespace(v);
        }
        if let Some(v) = options.minimum_delay {
            generator.set_minimum_delay_between_patterns(v);
        }
        if let Some(v) = options.maximum_delay {
            generator.set_maximum_delay_between_patterns(v);
        }
        if let Some(v) = options.pattern_snap_to {
            generator.set_pattern_snap_to(v);
        }
        generator.generate_entire_song()?;
    }
    Ok(beatmap)
}
