//! Reference exemplar sources.
//!
//! A [`ReferenceLibrary`] hands out the known-correct exemplars for each
//! exercise and phase. Models are built from it once at start-up.
//!
//! # JSON Directory Format
//!
//! [`JsonDirectoryLibrary`] reads one `<exercise>.json` file per exercise:
//!
//! ```json
//! {
//!   "exercise": "squat",
//!   "first_half": [
//!     { "angles": [172.0, 171.5, 175.0, 174.0, 80.0, 81.0], "progress": 0.0 },
//!     { "landmarks": [{ "id": 23, "x": 0.45, "y": 0.52, "z": 0.0 }] }
//!   ],
//!   "second_half": []
//! }
//! ```
//!
//! A frame holds either precomputed `angles` (in the exercise's layout
//! order) or raw `landmarks`, which are converted with the exercise's
//! layout at load time. Frames without `progress` are labelled by their
//! position within the phase, evenly spaced from 0 to 1.

// Frame counts are small; casts are exact.
#![allow(clippy::cast_precision_loss)]

use std::path::{Path, PathBuf};

use hashbrown::HashMap;
use pose_angles::{AngleComputer, LayoutCatalog};
use pose_types::{AngleVector, LandmarkEntry, Landmarks, Phase, ReferenceExemplar};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Result, ScoringError};

/// Source of reference exemplars.
pub trait ReferenceLibrary {
    /// Returns the lower-cased names of all exercises with data, sorted.
    fn exercises(&self) -> Vec<String>;

    /// Returns the exemplars for `exercise` (case-insensitive) and `phase`.
    ///
    /// Returns an empty slice when there are none.
    fn exemplars(&self, exercise: &str, phase: Phase) -> &[ReferenceExemplar];
}

/// Exemplars held in memory.
///
/// # Example
///
/// ```
/// use pose_scoring::{InMemoryLibrary, ReferenceLibrary};
/// use pose_types::{AngleVector, Phase, ReferenceExemplar};
///
/// let mut library = InMemoryLibrary::new();
/// library.insert(ReferenceExemplar::new(
///     "Squat",
///     Phase::FirstHalf,
///     AngleVector::new(vec![170.0; 6]).unwrap(),
///     0.0,
/// ));
///
/// assert_eq!(library.exercises(), vec!["squat".to_string()]);
/// assert_eq!(library.exemplars("SQUAT", Phase::FirstHalf).len(), 1);
/// assert!(library.exemplars("squat", Phase::SecondHalf).is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryLibrary {
    sets: HashMap<(String, Phase), Vec<ReferenceExemplar>>,
}

impl InMemoryLibrary {
    /// Creates an empty library.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an exemplar to its exercise/phase set.
    pub fn insert(&mut self, exemplar: ReferenceExemplar) {
        self.sets
            .entry((exemplar.exercise().to_string(), exemplar.phase()))
            .or_default()
            .push(exemplar);
    }

    /// Returns the total number of exemplars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.values().map(Vec::len).sum()
    }

    /// Returns `true` if the library holds no exemplars.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Extend<ReferenceExemplar> for InMemoryLibrary {
    fn extend<I: IntoIterator<Item = ReferenceExemplar>>(&mut self, iter: I) {
        for exemplar in iter {
            self.insert(exemplar);
        }
    }
}

impl FromIterator<ReferenceExemplar> for InMemoryLibrary {
    fn from_iter<I: IntoIterator<Item = ReferenceExemplar>>(iter: I) -> Self {
        let mut library = Self::new();
        library.extend(iter);
        library
    }
}

impl ReferenceLibrary for InMemoryLibrary {
    fn exercises(&self) -> Vec<String> {
        let mut names: Vec<String> = self.sets.keys().map(|(name, _)| name.clone()).collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    fn exemplars(&self, exercise: &str, phase: Phase) -> &[ReferenceExemplar] {
        self.sets
            .get(&(exercise.to_lowercase(), phase))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// One recorded frame in a reference file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReferenceFrame {
    /// Precomputed angles in layout order.
    Angles {
        /// Joint angles in degrees.
        angles: Vec<f64>,
        /// Progress label, if recorded.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        progress: Option<f64>,
    },
    /// Raw landmarks to be converted with the exercise's layout.
    Landmarks {
        /// Landmark entries for the frame.
        landmarks: Vec<LandmarkEntry>,
        /// Progress label, if recorded.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        progress: Option<f64>,
    },
}

impl ReferenceFrame {
    const fn progress(&self) -> Option<f64> {
        match self {
            Self::Angles { progress, .. } | Self::Landmarks { progress, .. } => *progress,
        }
    }
}

/// Contents of one `<exercise>.json` reference file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReferenceFile {
    /// Exercise name; defaults to the file stem.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise: Option<String>,
    /// Frames of the rising half, in recording order.
    #[serde(default)]
    pub first_half: Vec<ReferenceFrame>,
    /// Frames of the falling half, in recording order.
    #[serde(default)]
    pub second_half: Vec<ReferenceFrame>,
}

impl ReferenceFile {
    /// Parses a reference file.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::Serialization`] for malformed JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ScoringError::Serialization(e.to_string()))
    }

    /// Serialises the file to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::Serialization`] if encoding fails.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| ScoringError::Serialization(e.to_string()))
    }

    /// Returns the frames recorded for `phase`.
    #[must_use]
    pub fn frames(&self, phase: Phase) -> &[ReferenceFrame] {
        match phase {
            Phase::FirstHalf => &self.first_half,
            Phase::SecondHalf => &self.second_half,
        }
    }

    /// Converts the frames into exemplars.
    ///
    /// Landmark frames are measured with `exercise`'s layout from
    /// `catalog`; angle frames must already match its length.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::InvalidReference`] naming `source_name` and
    /// the offending frame.
    pub fn to_exemplars(
        &self,
        exercise: &str,
        catalog: &LayoutCatalog,
        computer: AngleComputer,
        source_name: &str,
    ) -> Result<Vec<ReferenceExemplar>> {
        let layout = catalog.resolve(exercise);
        let mut exemplars = Vec::new();

        for phase in Phase::ALL {
            let frames = self.frames(phase);
            for (index, frame) in frames.iter().enumerate() {
                let context = |reason: String| {
                    ScoringError::invalid_reference(
                        source_name,
                        format!("{phase} frame {index}: {reason}"),
                    )
                };

                let angles = match frame {
                    ReferenceFrame::Angles { angles, .. } => {
                        AngleVector::new(angles.clone()).map_err(|e| context(e.to_string()))?
                    }
                    ReferenceFrame::Landmarks { landmarks, .. } => {
                        let landmarks = Landmarks::from_entries(landmarks);
                        computer
                            .compute(&landmarks, layout.specs())
                            .map_err(|e| context(e.to_string()))?
                    }
                };
                if angles.len() != layout.len() {
                    return Err(context(format!(
                        "expected {} angles for layout {:?}, got {}",
                        layout.len(),
                        layout.name(),
                        angles.len()
                    )));
                }

                let progress = frame
                    .progress()
                    .unwrap_or_else(|| sequence_progress(index, frames.len()));
                exemplars.push(ReferenceExemplar::new(exercise, phase, angles, progress));
            }
        }

        Ok(exemplars)
    }
}

/// Progress label for frame `index` of `count` evenly spaced frames.
///
/// A lone frame is labelled as complete.
#[must_use]
pub fn sequence_progress(index: usize, count: usize) -> f64 {
    if count <= 1 {
        1.0
    } else {
        index as f64 / (count - 1) as f64
    }
}

/// Exemplars loaded from a directory of `<exercise>.json` files.
///
/// Files are read eagerly in name order; any malformed file fails the
/// whole load.
#[derive(Debug, Clone)]
pub struct JsonDirectoryLibrary {
    root: PathBuf,
    inner: InMemoryLibrary,
}

impl JsonDirectoryLibrary {
    /// Loads every `*.json` file under `root`.
    ///
    /// # Errors
    ///
    /// - [`ScoringError::Io`] if the directory or a file cannot be read
    /// - [`ScoringError::Serialization`] / [`ScoringError::InvalidReference`]
    ///   for malformed files
    pub fn open(
        root: impl AsRef<Path>,
        catalog: &LayoutCatalog,
        computer: AngleComputer,
    ) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let io_err = |path: &Path, e: std::io::Error| {
            ScoringError::Io(format!("{}: {e}", path.display()))
        };

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(&root).map_err(|e| io_err(&root, e))? {
            let path = entry.map_err(|e| io_err(&root, e))?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            } else {
                debug!(path = %path.display(), "Skipping non-reference entry");
            }
        }
        paths.sort();

        let mut inner = InMemoryLibrary::new();
        for path in &paths {
            let source_name = path.display().to_string();
            let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
            let file = ReferenceFile::from_json_str(&contents)
                .map_err(|e| ScoringError::invalid_reference(&source_name, e.to_string()))?;

            let exercise = match (&file.exercise, path.file_stem()) {
                (Some(name), _) => name.to_lowercase(),
                (None, Some(stem)) => stem.to_string_lossy().to_lowercase(),
                (None, None) => {
                    return Err(ScoringError::invalid_reference(
                        &source_name,
                        "cannot determine exercise name",
                    ));
                }
            };

            let exemplars = file.to_exemplars(&exercise, catalog, computer, &source_name)?;
            for phase in Phase::ALL {
                if file.frames(phase).is_empty() {
                    warn!(
                        path = %source_name,
                        exercise = %exercise,
                        %phase,
                        "Reference file has no frames for phase"
                    );
                }
            }
            debug!(
                path = %source_name,
                exercise = %exercise,
                exemplars = exemplars.len(),
                "Loaded reference file"
            );
            inner.extend(exemplars);
        }

        info!(
            root = %root.display(),
            files = paths.len(),
            exemplars = inner.len(),
            "Loaded reference library"
        );

        Ok(Self { root, inner })
    }

    /// Returns the directory the library was loaded from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the total number of exemplars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if no exemplars were loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl ReferenceLibrary for JsonDirectoryLibrary {
    fn exercises(&self) -> Vec<String> {
        self.inner.exercises()
    }

    fn exemplars(&self, exercise: &str, phase: Phase) -> &[ReferenceExemplar] {
        self.inner.exemplars(exercise, phase)
    }
}
