use beatmap_schema::{Beat, BeatmapData, CubeType, LevelDifficulty, Note, GRID_COLUMNS, GRID_ROWS};
use log::debug;
use rand::Rng;

use crate::defaults::DifficultyDefaultsTable;
use crate::library::{PatternId, PatternLibrary};
use crate::pattern::{Location, PatternShape};
use crate::saber::SaberLocation;
use crate::select::weighted_index;
use crate::PatternError;

/// Generation stops once less than this much of the song remains.
pub const MINIMUM_REMAINING_SECONDS: f64 = 0.5;

/// Used when a resolved pattern has no starting locations.
const DEFAULT_START: Location = Location {
    line_index: 2,
    line_layer: 0,
    preferred: false,
};

// Values this close to a snap point count as on it, so 10.000000000000002
// beats stays at 10. Anything further away rounds up.
const SNAP_EPSILON: f64 = 1e-9;

/// The song facts the generator needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Song {
    pub duration_seconds: f64,
    pub beats_per_minute: u32,
}

impl Song {
    pub fn new(duration_seconds: f64, beats_per_minute: u32) -> Self {
        Self {
            duration_seconds,
            beats_per_minute,
        }
    }

    pub fn beat_duration_seconds(&self) -> f64 {
        60.0 / f64::from(self.beats_per_minute)
    }
}

/// Read-only inputs shared by every generator run.
#[derive(Debug, Clone, Copy)]
pub struct GeneratorContext<'a> {
    pub patterns: &'a PatternLibrary,
    pub defaults: &'a DifficultyDefaultsTable,
}

/// Fills one beatmap with notes drawn from the pattern library.
///
/// A generator is bound to one song, one difficulty and one beatmap. Pacing
/// comes from the difficulty defaults and can be overridden before running.
pub struct Generator<'a, R: Rng> {
    song: Song,
    difficulty: LevelDifficulty,
    beatmap: &'a mut BeatmapData,
    patterns: &'a PatternLibrary,
    rng: R,

    pattern_snap_to: u32,
    minimum_initial_whitespace: f64,
    minimum_delay_between_patterns: f64,
    maximum_delay_between_patterns: f64,

    beat_duration: f64,
    next_eligible_beat: Beat,
    red_saber: SaberLocation,
    blue_saber: SaberLocation,
}

impl<'a, R: Rng> Generator<'a, R> {
    pub fn new(
        context: GeneratorContext<'a>,
        song: Song,
        difficulty: LevelDifficulty,
        beatmap: &'a mut BeatmapData,
        rng: R,
    ) -> Result<Self, PatternError> {
        if context.patterns.is_empty() {
            return Err(PatternError::new("E2001", "pattern library is empty")
                .with_difficulty(difficulty));
        }
        if song.beats_per_minute == 0 {
            return Err(PatternError::new("E2004", "song bpm must be > 0"));
        }
        let defaults = context.defaults.lookup(difficulty)?;

        Ok(Self {
            song,
            difficulty,
            beatmap,
            patterns: context.patterns,
            rng,

            pattern_snap_to: 1,
            minimum_initial_whitespace: defaults.minimum_initial_whitespace,
            minimum_delay_between_patterns: defaults.minimum_delay_between_patterns,
            maximum_delay_between_patterns: defaults.maximum_delay_between_patterns,

            beat_duration: song.beat_duration_seconds(),
            next_eligible_beat: 0.0,
            red_saber: SaberLocation::home(CubeType::Red),
            blue_saber: SaberLocation::home(CubeType::Blue),
        })
    }

    pub fn difficulty(&self) -> LevelDifficulty {
        self.difficulty
    }

    pub fn beat_duration_seconds(&self) -> f64 {
        self.beat_duration
    }

    pub fn pattern_snap_to(&self) -> u32 {
        self.pattern_snap_to
    }

    pub fn minimum_initial_whitespace(&self) -> f64 {
        self.minimum_initial_whitespace
    }

    pub fn minimum_delay_between_patterns(&self) -> f64 {
        self.minimum_delay_between_patterns
    }

    pub fn maximum_delay_between_patterns(&self) -> f64 {
        self.maximum_delay_between_patterns
    }

    /// Granularity new patterns snap forward to: 1 is whole beats, 2 allows
    /// half beats, 3 thirds. The first pattern always lands on a whole beat.
    pub fn set_pattern_snap_to(&mut self, value: u32) -> &mut Self {
        self.pattern_snap_to = value.max(1);
        self
    }

    pub fn set_minimum_initial_whitespace(&mut self, seconds: f64) -> &mut Self {
        self.minimum_initial_whitespace = seconds;
        self
    }

    pub fn set_minimum_delay_between_patterns(&mut self, seconds: f64) -> &mut Self {
        self.minimum_delay_between_patterns = seconds;
        self
    }

    pub fn set_maximum_delay_between_patterns(&mut self, seconds: f64) -> &mut Self {
        self.maximum_delay_between_patterns = seconds;
        self
    }

    pub fn red_saber(&self) -> &SaberLocation {
        &self.red_saber
    }

    pub fn blue_saber(&self) -> &SaberLocation {
        &self.blue_saber
    }

    /// Earliest beat the previous pattern leaves free for the next one.
    ///
    /// Callers placing patterns one at a time can use it; full-song generation
    /// spaces patterns by the drawn delay alone.
    pub fn next_eligible_beat(&self) -> Beat {
        self.next_eligible_beat
    }

    pub fn reset_sabers(&mut self) {
        self.red_saber.reset(CubeType::Red);
        self.blue_saber.reset(CubeType::Blue);
    }

    /// Throws away every note in the beatmap and generates the whole song.
    pub fn generate_entire_song(&mut self) -> Result<(), PatternError> {
        self.check_pacing()?;

        self.beatmap.clear_notes();
        self.reset_sabers();

        let beat_duration = self.beat_duration;
        let mut beat = snap_up(self.minimum_initial_whitespace / beat_duration, 1);
        self.next_eligible_beat = beat;
        let mut remaining = self.song.duration_seconds - beat * beat_duration;

        while remaining > MINIMUM_REMAINING_SECONDS {
            let last = self.pick_and_apply_pattern(None, beat)?;
            let anchor = last
                .and_then(|i| self.beatmap.note(i))
                .map_or(beat, |note| note.time);

            let delay = self.random_delay();
            let mut next = snap_up((anchor * beat_duration + delay) / beat_duration, self.pattern_snap_to);
            if next <= beat {
                next = beat + 1.0;
            }

            beat = next;
            remaining = self.song.duration_seconds - beat * beat_duration;
        }

        debug!(
            "generated {} notes for {}",
            self.beatmap.note_count(),
            self.difficulty
        );
        Ok(())
    }

    /// Regenerating between two existing notes is not supported yet.
    pub fn generate_range(&mut self, starting_index: usize, ending_index: usize) -> Result<(), PatternError> {
        Err(PatternError::new(
            "E4001",
            format!("range regeneration ({starting_index}..{ending_index}) is not supported"),
        )
        .with_difficulty(self.difficulty))
    }

    /// Patterns usable at this difficulty: every pattern with a positive weight.
    ///
    /// `max_duration_seconds` is accepted but not applied; a long pattern can
    /// run past the end of the song.
    pub fn possible_patterns(&self, _max_duration_seconds: f64) -> Vec<PatternId> {
        self.patterns
            .ids()
            .filter(|&id| self.patterns.weight(id, self.difficulty) > 0)
            .collect()
    }

    /// Picks one pattern and writes its notes starting at `beat`.
    ///
    /// Notes are appended, or inserted from `at_index` onward. Returns the index
    /// of the last note placed, `None` when the pattern had no notes.
    pub fn pick_and_apply_pattern(
        &mut self,
        at_index: Option<usize>,
        beat: Beat,
    ) -> Result<Option<usize>, PatternError> {
        let patterns = self.patterns;
        let remaining = self.song.duration_seconds - beat * self.beat_duration;

        let candidates = self.possible_patterns(remaining);
        let id = patterns
            .select_from(&candidates, self.difficulty, &mut self.rng)
            .or_else(|| candidates.first().copied())
            .or_else(|| patterns.first())
            .ok_or_else(|| PatternError::new("E2001", "pattern library is empty"))?;

        let name = &patterns.get(id).name;
        let shape = patterns.resolve(id);
        let start = self.pick_starting_location(shape);
        let step = patterns.step_size(id, self.difficulty, f64::from(self.song.beats_per_minute));
        debug!(
            "apply {name:?} at beat {beat} from row {} col {} step {step}",
            start.line_layer, start.line_index
        );

        let mut placed = Vec::with_capacity(shape.note_count());
        let mut cursor = beat;
        for group in &shape.note_sequence {
            for pattern_note in group {
                let row = start.line_layer + pattern_note.relative_y;
                let col = start.line_index + pattern_note.relative_x;
                if !(0..GRID_ROWS).contains(&row) || !(0..GRID_COLUMNS).contains(&col) {
                    return Err(PatternError::new(
                        "E3001",
                        format!("pattern {name:?} places a note outside the grid (row={row}, col={col})"),
                    )
                    .with_pattern(name.clone())
                    .with_difficulty(self.difficulty)
                    .with_beat(cursor));
                }
                placed.push((
                    pattern_note.cube_type,
                    Note {
                        time: cursor,
                        line_index: col,
                        line_layer: row,
                        note_type: pattern_note.cube_type.code(),
                        cut_direction: pattern_note.cut_direction.code(),
                    },
                ));
            }
            cursor += step;
        }

        let mut insert_at = at_index;
        if let Some(i) = insert_at {
            if i > self.beatmap.note_count() {
                return Err(PatternError::new(
                    "E3002",
                    format!(
                        "insertion index {i} is past the end of {} notes",
                        self.beatmap.note_count()
                    ),
                )
                .with_pattern(name.clone())
                .with_beat(beat));
            }
        }

        let mut last_index = None;
        for (cube_type, note) in placed {
            let index = match insert_at.as_mut() {
                Some(i) => {
                    self.beatmap.insert_note(*i, note);
                    *i += 1;
                    *i - 1
                }
                None => {
                    self.beatmap.push_note(note);
                    self.beatmap.note_count() - 1
                }
            };
            last_index = Some(index);

            match cube_type {
                CubeType::Red => self.red_saber.apply(&note, note.time),
                CubeType::Blue => self.blue_saber.apply(&note, note.time),
                CubeType::Bomb => {}
            }
        }

        let mut next = cursor.ceil();
        if next - cursor < 2.0 * step {
            next += 1.0;
        }
        self.next_eligible_beat = next;

        Ok(last_index)
    }

    fn pick_starting_location(&mut self, shape: &PatternShape) -> Location {
        let weights: Vec<f64> = shape
            .starting_locations
            .iter()
            .map(Location::start_weight)
            .collect();
        weighted_index(&weights, &mut self.rng)
            .map(|i| shape.starting_locations[i])
            .unwrap_or(DEFAULT_START)
    }

    fn random_delay(&mut self) -> f64 {
        let (min, max) = (
            self.minimum_delay_between_patterns,
            self.maximum_delay_between_patterns,
        );
        if max > min {
            self.rng.gen_range(min..=max)
        } else {
            min
        }
    }

    fn check_pacing(&self) -> Result<(), PatternError> {
        let min = self.minimum_delay_between_patterns;
        let max = self.maximum_delay_between_patterns;
        let silence = self.minimum_initial_whitespace;
        let all_valid = [min, max, silence].iter().all(|v| v.is_finite() && *v >= 0.0);
        if !all_valid || min > max {
            return Err(PatternError::new(
                "E2003",
                format!("invalid pacing: initial silence {silence}, delay {min}..{max}"),
            )
            .with_difficulty(self.difficulty));
        }
        Ok(())
    }
}

/// Rounds `beats` up to the next multiple of `1 / snap_to`.
fn snap_up(beats: Beat, snap_to: u32) -> Beat {
    if beats <= 0.0 {
        return 0.0;
    }
    let per_beat = f64::from(snap_to.max(1));
    let scaled = beats * per_beat;
    let nearest = scaled.round();
    if (scaled - nearest).abs() <= SNAP_EPSILON * nearest.max(1.0) {
        nearest / per_beat
    } else {
        scaled.ceil() / per_beat
    }
}
