//! Exemplar-based scoring of exercise repetitions.
//!
//! Given a frame's joint angles, this crate answers three questions
//! against recorded reference executions:
//!
//! - **How correct is the pose?** Similarity to the nearest exemplar, plus
//!   the single angle that deviates most.
//! - **How far through the movement is it?** A k-nearest-neighbour
//!   regression over the exemplars' progress labels.
//! - **Did a repetition just finish?** A two-phase transition rule driven
//!   by progress.
//!
//! # Main Types
//!
//! - [`ScoringModel`] - Scoring interface for one exercise and phase
//! - [`KnnModel`] - The k-NN implementation over Euclidean angle distance
//! - [`ModelRegistry`] - Immutable set of models built at start-up
//! - [`ReferenceLibrary`] - Source of exemplars ([`InMemoryLibrary`], [`JsonDirectoryLibrary`])
//! - [`Analyzer`] - Full landmarks-to-response pipeline
//! - [`ScoringConfig`] - Tunables, loadable from TOML
//!
//! # Concurrency
//!
//! Models never change after construction. A registry can be shared
//! freely across threads and [`Analyzer::analyze_batch`] scores frames in
//! parallel with no locking.
//!
//! # Example
//!
//! ```
//! use pose_angles::LayoutCatalog;
//! use pose_scoring::{Analyzer, InMemoryLibrary, ModelRegistry, ScoringConfig};
//! use pose_types::{AngleVector, Phase, ReferenceExemplar};
//!
//! // Two recorded bicep-curl poses per phase: arm extended and arm flexed.
//! let extended = AngleVector::new(vec![170.0, 170.0, 15.0, 15.0]).unwrap();
//! let flexed = AngleVector::new(vec![40.0, 40.0, 15.0, 15.0]).unwrap();
//! let library: InMemoryLibrary = [
//!     ReferenceExemplar::new("bicep_curl", Phase::FirstHalf, extended.clone(), 0.0),
//!     ReferenceExemplar::new("bicep_curl", Phase::FirstHalf, flexed.clone(), 1.0),
//!     ReferenceExemplar::new("bicep_curl", Phase::SecondHalf, flexed, 0.0),
//!     ReferenceExemplar::new("bicep_curl", Phase::SecondHalf, extended, 1.0),
//! ]
//! .into_iter()
//! .collect();
//!
//! let config = ScoringConfig::default();
//! let registry = ModelRegistry::build(&library, &LayoutCatalog::standard(), &config).unwrap();
//! let analyzer = Analyzer::new(registry, &config);
//!
//! let live = AngleVector::new(vec![45.0, 42.0, 15.0, 15.0]).unwrap();
//! let score = analyzer.score_angles("bicep_curl", Phase::FirstHalf, &live).unwrap();
//! assert!(score.correctness > 0.8);
//! assert!(score.progress > 0.5);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod analyzer;
mod config;
mod error;
mod knn;
mod library;
mod model;
mod phase;
mod registry;

pub use analyzer::{AnalysisRequest, AnalysisResponse, Analyzer, ErrorResponse};
pub use config::ScoringConfig;
pub use error::{Result, ScoringError};
pub use knn::{KnnModel, KnnParams};
pub use library::{
    InMemoryLibrary, JsonDirectoryLibrary, ReferenceFile, ReferenceFrame, ReferenceLibrary,
    sequence_progress,
};
pub use model::{Correctness, ModelKey, ScoringModel};
pub use phase::{PhaseTransition, REPETITION_THRESHOLD, transition, transition_with_threshold};
pub use registry::ModelRegistry;
