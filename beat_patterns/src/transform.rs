use crate::pattern::{Location, NoteGroup, PatternNote, PatternShape, Transformation};

/// Last column index; mirroring maps column `c` to `MIRROR_AXIS - c`.
const MIRROR_AXIS: i32 = 3;

impl Location {
    pub fn transformed(&self, t: &Transformation) -> Location {
        Location {
            line_index: if t.mirror_left_right {
                MIRROR_AXIS - self.line_index
            } else {
                self.line_index
            },
            line_layer: self.line_layer,
            preferred: self.preferred,
        }
    }
}

impl PatternNote {
    pub fn transformed(&self, t: &Transformation) -> PatternNote {
        PatternNote {
            cube_type: if t.swap_colors {
                self.cube_type.swapped()
            } else {
                self.cube_type
            },
            cut_direction: self
                .cut_direction
                .mirrored(t.mirror_left_right, t.swap_up_down),
            relative_x: if t.mirror_left_right {
                -self.relative_x
            } else {
                self.relative_x
            },
            relative_y: self.relative_y,
        }
    }
}

impl PatternShape {
    /// Derives the shape a transformation produces from this (source) shape.
    pub fn transformed(&self, t: &Transformation) -> PatternShape {
        let starting_locations = self
            .starting_locations
            .iter()
            .map(|loc| loc.transformed(t))
            .collect();

        let note_sequence = self
            .note_sequence
            .iter()
            .map(|group| {
                let mut out: NoteGroup = Vec::new();
                if t.duplicate_cubes {
                    out.extend(group.iter().copied());
                }
                out.extend(group.iter().map(|n| n.transformed(t)));
                out
            })
            .collect();

        PatternShape {
            starting_locations,
            note_sequence,
        }
    }
}
