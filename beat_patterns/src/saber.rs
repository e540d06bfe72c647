use beatmap_schema::{Beat, CubeType, CutDirection, Note};

/// Where we believe one saber is after the most recent note it cut.
///
/// Last write wins; this is not a trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaberLocation {
    pub row: i32,
    pub col: i32,
    pub last_cut_direction: CutDirection,
    pub last_slice_beat: Beat,
}

impl SaberLocation {
    /// Sabers out in front, side by side: red on column 1, blue on column 2.
    pub fn home(hand: CubeType) -> Self {
        let col = match hand {
            CubeType::Red => 1,
            _ => 2,
        };
        Self {
            row: 1,
            col,
            last_cut_direction: CutDirection::Center,
            last_slice_beat: 0.0,
        }
    }

    pub fn reset(&mut self, hand: CubeType) {
        *self = Self::home(hand);
    }

    pub fn apply(&mut self, note: &Note, beat: Beat) {
        self.row = note.line_layer;
        self.col = note.line_index;
        self.last_cut_direction = note.direction().unwrap_or(CutDirection::Center);
        self.last_slice_beat = beat;
    }
}
