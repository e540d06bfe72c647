use crate::{Beat, BeatmapData, CubeType, CutCategory, CutDirection, Note};

/// Notes closer together than this many beats count as the same instant.
pub const DISTINCT_TIME_DELTA: Beat = 0.1;

/// A silence longer than this many seconds is reported as a large gap.
pub const LARGE_GAP_SECONDS: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeatmapStats {
    pub note_count: usize,
    pub notes_per_second: f64,
    pub largest_gap: f64,
    pub large_gaps: usize,
    pub red_cuts: usize,
    pub blue_cuts: usize,
    pub up_down_cuts: usize,
    pub left_right_cuts: usize,
    pub diagonal_cuts: usize,
}

impl BeatmapData {
    pub fn clear_notes(&mut self) {
        self.notes.clear();
        self.has_changed = true;
    }

    pub fn push_note(&mut self, note: Note) {
        self.notes.push(note);
        self.has_changed = true;
    }

    /// Inserts before `index`, shifting later notes. `index == len` appends.
    ///
    /// Panics if `index > len`, like `Vec::insert`.
    pub fn insert_note(&mut self, index: usize, note: Note) {
        self.notes.insert(index, note);
        self.has_changed = true;
    }

    pub fn note(&self, index: usize) -> Option<&Note> {
        self.notes.get(index)
    }

    pub fn note_count(&self) -> usize {
        self.notes.len()
    }

    /// Nearest earlier note at least [`DISTINCT_TIME_DELTA`] beats before the note at `index`.
    pub fn previous_note(&self, index: usize) -> Option<&Note> {
        let base = self.notes.get(index)?;
        self.notes[..index]
            .iter()
            .rev()
            .find(|n| base.time - n.time > DISTINCT_TIME_DELTA)
    }

    /// Nearest later note at least [`DISTINCT_TIME_DELTA`] beats after the note at `index`.
    pub fn next_note(&self, index: usize) -> Option<&Note> {
        let base = self.notes.get(index)?;
        self.notes[index + 1..]
            .iter()
            .find(|n| n.time - base.time > DISTINCT_TIME_DELTA)
    }

    /// Index of the first note strictly after `time`, or `len` if there is none.
    pub fn index_after(&self, time: Beat) -> usize {
        self.notes.partition_point(|n| n.time <= time)
    }

    pub fn notes_per_second(&self, song_length_seconds: f64) -> f64 {
        if song_length_seconds <= 0.0 {
            return 0.0;
        }
        self.notes.len() as f64 / song_length_seconds
    }

    // Beats are scaled by bpm/60 here, not by the 60/bpm beat duration the
    // generator uses.
    fn gap_times(&self, bpm: u32) -> impl Iterator<Item = f64> + '_ {
        let factor = f64::from(bpm) / 60.0;
        self.notes.iter().map(move |n| n.time * factor)
    }

    /// Longest silence between consecutive notes, the start, and the song end.
    pub fn largest_gap(&self, song_length: f64, bpm: u32) -> f64 {
        let mut largest = 0.0_f64;
        let mut last = 0.0;
        for t in self.gap_times(bpm) {
            largest = largest.max(t - last);
            last = t;
        }
        largest.max(song_length - last)
    }

    pub fn number_large_gaps(&self, song_length: f64, bpm: u32) -> usize {
        let mut count = 0;
        let mut last = 0.0;
        for t in self.gap_times(bpm) {
            if t - last > LARGE_GAP_SECONDS {
                count += 1;
            }
            last = t;
        }
        if song_length - last > LARGE_GAP_SECONDS {
            count += 1;
        }
        count
    }

    pub fn cuts_count(&self, cube_type: CubeType) -> usize {
        let code = cube_type.code();
        self.notes.iter().filter(|n| n.note_type == code).count()
    }

    fn category_count(&self, category: CutCategory) -> usize {
        self.notes
            .iter()
            .filter_map(|n| CutDirection::from_code(n.cut_direction))
            .filter(|d| d.category() == category)
            .count()
    }

    pub fn up_down_cuts(&self) -> usize {
        self.category_count(CutCategory::Vertical)
    }

    pub fn left_right_cuts(&self) -> usize {
        self.category_count(CutCategory::Horizontal)
    }

    pub fn diagonal_cuts(&self) -> usize {
        self.category_count(CutCategory::Diagonal)
    }

    pub fn stats(&self, song_length: f64, bpm: u32) -> BeatmapStats {
        BeatmapStats {
            note_count: self.note_count(),
            notes_per_second: self.notes_per_second(song_length),
            largest_gap: self.largest_gap(song_length, bpm),
            large_gaps: self.number_large_gaps(song_length, bpm),
            red_cuts: self.cuts_count(CubeType::Red),
            blue_cuts: self.cuts_count(CubeType::Blue),
            up_down_cuts: self.up_down_cuts(),
            left_right_cuts: self.left_right_cuts(),
            diagonal_cuts: self.diagonal_cuts(),
        }
    }
}
