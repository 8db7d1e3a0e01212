#![forbid(unsafe_code)]

//! Landmark-based 3D transforms.
//!
//! Models are fitted to weighted point correspondences. The moving least squares transform
//! refits its model for every transformed location, weighting each landmark by its inverse
//! squared distance to that location, which yields a smooth non-linear warp.

pub mod error;
pub mod mls;
pub mod model;
pub mod point;

pub use error::{Error, Result};
pub use mls::MovingLeastSquaresTransform;
pub use model::{AffineModel3D, Model, RigidModel3D, SimilarityModel3D};
pub use point::{Point, PointMatch};
