//! Joint-angle extraction for repetition scoring.
//!
//! This crate turns a frame's landmarks into a fixed-length vector of
//! joint angles:
//!
//! - [`AngleComputer`] - Computes an [`AngleVector`](pose_types::AngleVector) from landmarks
//! - [`LayoutCatalog`] - Which angles (and in what order) each exercise is scored on
//! - [`LayoutChoice`] - Specialised layout or explicit "use the default" marker
//!
//! # Angle Definition
//!
//! For a spec `(a, vertex, b)` the angle is `acos(u·v / |u||v|)` with
//! `u = a - vertex` and `v = b - vertex`, reported in degrees in `[0, 180]`.
//! Either all angles of a layout are computed or the call fails; there is
//! no partial result.
//!
//! # Example
//!
//! ```
//! use pose_angles::{AngleComputer, LayoutCatalog};
//! use pose_types::{JointId, LandmarkPoint, Landmarks};
//!
//! let catalog = LayoutCatalog::standard();
//! let layout = catalog.resolve("bicep_curl");
//!
//! let landmarks: Landmarks = [
//!     (JointId::LEFT_SHOULDER, LandmarkPoint::new(0.40, 0.30, 0.0)),
//!     (JointId::RIGHT_SHOULDER, LandmarkPoint::new(0.60, 0.30, 0.0)),
//!     (JointId::LEFT_ELBOW, LandmarkPoint::new(0.40, 0.45, 0.0)),
//!     (JointId::RIGHT_ELBOW, LandmarkPoint::new(0.60, 0.45, 0.0)),
//!     (JointId::LEFT_WRIST, LandmarkPoint::new(0.40, 0.60, 0.0)),
//!     (JointId::RIGHT_WRIST, LandmarkPoint::new(0.60, 0.60, 0.0)),
//!     (JointId::LEFT_HIP, LandmarkPoint::new(0.42, 0.60, 0.0)),
//!     (JointId::RIGHT_HIP, LandmarkPoint::new(0.58, 0.60, 0.0)),
//! ]
//! .into_iter()
//! .collect();
//!
//! let angles = AngleComputer::planar().compute(&landmarks, layout.specs()).unwrap();
//! assert_eq!(angles.len(), layout.len());
//! // Arms hang straight down.
//! assert!((angles.as_slice()[0] - 180.0).abs() < 1e-4);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod catalog;
mod compute;
mod error;

pub use catalog::{DEFAULT_LAYOUT_NAME, LayoutCatalog, LayoutChoice};
pub use compute::{AngleComputer, angle_between, joint_angle};
pub use error::{AngleError, Result};
