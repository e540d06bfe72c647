use std::{collections::HashMap, fs, path::Path};

use beatmap_schema::LevelDifficulty;
use log::{debug, warn};
use rand::Rng;
use walkdir::{DirEntry, WalkDir};

use crate::pattern::{Pattern, PatternBody, PatternShape, DEFAULT_STEP};
use crate::select::weighted_index;
use crate::PatternError;

/// Stable handle of a pattern inside one [`PatternLibrary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatternId(usize);

impl PatternId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// All patterns known to the generator, indexed by name.
///
/// Transformations are linked and resolved once when the library is built and
/// the library is read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct PatternLibrary {
    patterns: Vec<Pattern>,
    by_name: HashMap<String, PatternId>,
    sources: Vec<Option<PatternId>>,
    resolved: Vec<PatternShape>,
}

impl PatternLibrary {
    /// Loads a pattern file or a directory of them, then indexes the result.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PatternError> {
        let patterns = load_patterns(path)?;
        Ok(Self::from_patterns(patterns))
    }

    pub fn from_patterns(patterns: Vec<Pattern>) -> Self {
        let mut library = Self {
            patterns,
            ..Self::default()
        };
        library.index();
        library
    }

    fn index(&mut self) {
        self.by_name.clear();
        for (i, pattern) in self.patterns.iter().enumerate() {
            if self.by_name.contains_key(&pattern.name) {
                warn!("duplicate pattern name {:?}; keeping the first one", pattern.name);
                continue;
            }
            self.by_name.insert(pattern.name.clone(), PatternId(i));
        }

        self.sources = self
            .patterns
            .iter()
            .map(|pattern| {
                let t = pattern.transformation()?;
                let source = self.by_name.get(&t.pattern_name).copied();
                if source.is_none() {
                    warn!(
                        "pattern {:?} transforms missing pattern {:?}; using it unchanged",
                        pattern.name, t.pattern_name
                    );
                }
                source
            })
            .collect();

        let n = self.patterns.len();
        let mut resolved: Vec<Option<PatternShape>> = vec![None; n];
        let mut in_progress = vec![false; n];
        for i in 0..n {
            self.resolve_into(PatternId(i), &mut resolved, &mut in_progress);
        }
        self.resolved = resolved.into_iter().map(Option::unwrap_or_default).collect();
    }

    fn resolve_into(
        &self,
        id: PatternId,
        resolved: &mut [Option<PatternShape>],
        in_progress: &mut [bool],
    ) -> PatternShape {
        if let Some(shape) = &resolved[id.0] {
            return shape.clone();
        }

        let pattern = &self.patterns[id.0];
        let shape = match (&pattern.body, self.sources[id.0]) {
            (PatternBody::Direct(shape), _) => shape.clone(),
            (PatternBody::Transformation(_), None) => PatternShape::default(),
            (PatternBody::Transformation(t), Some(source)) => {
                in_progress[id.0] = true;
                let shape = if in_progress[source.0] {
                    warn!(
                        "pattern {:?} is part of a transformation cycle; using it unchanged",
                        pattern.name
                    );
                    PatternShape::default()
                } else {
                    let from = self.resolve_into(source, resolved, in_progress);
                    debug!(
                        "produce {:?} from {:?} (swap colors: {}, mirror left/right: {}, swap up/down: {}, duplicate: {})",
                        pattern.name,
                        t.pattern_name,
                        t.swap_colors,
                        t.mirror_left_right,
                        t.swap_up_down,
                        t.duplicate_cubes
                    );
                    from.transformed(t)
                };
                in_progress[id.0] = false;
                shape
            }
        };

        resolved[id.0] = Some(shape.clone());
        shape
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = PatternId> + '_ {
        (0..self.patterns.len()).map(PatternId)
    }

    pub fn first(&self) -> Option<PatternId> {
        self.ids().next()
    }

    pub fn get(&self, id: PatternId) -> &Pattern {
        &self.patterns[id.0]
    }

    pub fn find(&self, name: &str) -> Option<PatternId> {
        self.by_name.get(name).copied()
    }

    /// The pattern a transformation was linked to, if any.
    pub fn source(&self, id: PatternId) -> Option<PatternId> {
        self.sources[id.0]
    }

    pub fn weight(&self, id: PatternId, difficulty: LevelDifficulty) -> i32 {
        self.get(id).weight(difficulty)
    }

    /// Weighted draw over the whole library.
    pub fn select_weighted<R: Rng + ?Sized>(
        &self,
        difficulty: LevelDifficulty,
        rng: &mut R,
    ) -> Option<PatternId> {
        let all: Vec<PatternId> = self.ids().collect();
        self.select_from(&all, difficulty, rng)
    }

    /// Weighted draw over `candidates`. `None` when their total weight is zero.
    pub fn select_from<R: Rng + ?Sized>(
        &self,
        candidates: &[PatternId],
        difficulty: LevelDifficulty,
        rng: &mut R,
    ) -> Option<PatternId> {
        let weights: Vec<f64> = candidates
            .iter()
            .map(|&id| f64::from(self.weight(id, difficulty)))
            .collect();
        weighted_index(&weights, rng).map(|i| candidates[i])
    }

    /// The playable shape of a pattern, with any transformation applied.
    ///
    /// Unlinked transformations resolve to themselves, which carry no notes.
    pub fn resolve(&self, id: PatternId) -> &PatternShape {
        &self.resolved[id.0]
    }

    /// Beats between note groups. A transformation without its own table
    /// uses its source's.
    pub fn step_size(&self, id: PatternId, difficulty: LevelDifficulty, bpm: f64) -> f64 {
        let mut current = id;
        for _ in 0..=self.patterns.len() {
            let pattern = self.get(current);
            if !pattern.step_by.is_empty() {
                return pattern.step_by.step_for(difficulty, bpm);
            }
            match self.sources[current.0] {
                Some(source) => current = source,
                None => break,
            }
        }
        DEFAULT_STEP
    }
}

/// Reads every pattern under `path` without indexing them.
///
/// Directories are walked in file-name order; entries starting with a dot are skipped.
pub fn load_patterns(path: impl AsRef<Path>) -> Result<Vec<Pattern>, PatternError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(PatternError::new(
            "E1003",
            format!("pattern library not found: {}", path.display()),
        )
        .with_file(path.display().to_string()));
    }

    let mut patterns = Vec::new();
    let walker = WalkDir::new(path)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e));
    for entry in walker {
        let entry = entry.map_err(|e| {
            PatternError::new("E1001", format!("failed to walk pattern library: {e}"))
                .with_file(path.display().to_string())
        })?;
        if entry.file_type().is_file() {
            patterns.extend(read_pattern_file(entry.path())?);
        }
    }
    Ok(patterns)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

fn read_pattern_file(path: &Path) -> Result<Vec<Pattern>, PatternError> {
    let file = path.display().to_string();
    let bytes = fs::read(path).map_err(|e| {
        PatternError::new("E1001", format!("failed to read pattern file {file}: {e}"))
            .with_file(file.clone())
    })?;

    let invalid = |e: serde_json::Error| {
        PatternError::new("E1002", format!("invalid pattern json in {file}: {e}"))
            .with_file(file.clone())
    };
    let value: serde_json::Value = serde_json::from_slice(&bytes).map_err(invalid)?;
    let patterns = if value.is_array() {
        serde_json::from_value::<Vec<Pattern>>(value).map_err(invalid)?
    } else if value.is_object() {
        vec![serde_json::from_value::<Pattern>(value).map_err(invalid)?]
    } else {
        return Err(PatternError::new(
            "E1002",
            format!("pattern file {file} must hold an object or an array"),
        )
        .with_file(file.clone()));
    };

    for pattern in &patterns {
        if let Some(step) = pattern.step_by.invalid_step() {
            return Err(PatternError::new(
                "E1004",
                format!("pattern {:?} in {file} has invalid stepBy {step}", pattern.name),
            )
            .with_file(file.clone())
            .with_pattern(pattern.name.clone()));
        }
    }
    Ok(patterns)
}
