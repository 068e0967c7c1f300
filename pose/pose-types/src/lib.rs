//! Pose data types for repetition scoring.
//!
//! This crate provides the data model shared by angle extraction and
//! exemplar scoring:
//!
//! - [`JointId`] - Joint in the 33-point full-body topology
//! - [`LandmarkPoint`] / [`LandmarkEntry`] / [`Landmarks`] - Per-frame joint coordinates
//! - [`AngleSpec`] / [`AngleLayout`] - Which joint angles make up a vector, in what order
//! - [`AngleVector`] - One frame's joint angles in degrees
//! - [`Phase`] - Rising or falling half of a repetition
//! - [`ReferenceExemplar`] - Known-correct angle vector with a progress label
//! - [`ScoreResult`] - Correctness, most-divergent angle and progress
//!
//! # Layer 0 Crate
//!
//! Pure data types with no I/O. They can be used in servers, CLI tools and
//! offline reference-authoring scripts alike.
//!
//! # Example
//!
//! ```
//! use pose_types::{AngleVector, Phase, ReferenceExemplar};
//!
//! let live = AngleVector::new(vec![170.0, 92.0]).unwrap();
//! let exemplar = ReferenceExemplar::new(
//!     "squat",
//!     Phase::FirstHalf,
//!     AngleVector::new(vec![170.0, 90.0]).unwrap(),
//!     0.5,
//! );
//!
//! let distance = live.distance(exemplar.angles()).unwrap();
//! assert!((distance - 2.0).abs() < 1e-12);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod angle;
mod error;
mod exemplar;
mod joint;
mod landmark;
mod phase;

pub use angle::{AngleLayout, AngleSpec, AngleVector};
pub use error::{PoseTypesError, Result};
pub use exemplar::{ReferenceExemplar, ScoreResult, clamp_unit};
pub use joint::JointId;
pub use landmark::{IngestReport, LandmarkEntry, LandmarkPoint, Landmarks};
pub use phase::Phase;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
