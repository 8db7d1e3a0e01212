//! Models fitted to point matches.

use crate::error::{Error, Result};
use crate::point::PointMatch;
use nalgebra::{Matrix3, Point3, Vector3};

mod affine;
mod similarity;

pub use affine::AffineModel3D;
pub use similarity::{RigidModel3D, SimilarityModel3D};

pub trait Model: Clone {
    /// Smallest number of matches `fit` accepts.
    const MIN_NUM_MATCHES: usize;

    /// Fit the model to `matches`, minimising the weighted squared distance between every
    /// transformed source and its target.
    fn fit(&mut self, matches: &[PointMatch]) -> Result<()>;

    fn apply(&self, location: &Point3<f64>) -> Point3<f64>;

    fn apply_inverse(&self, location: &Point3<f64>) -> Result<Point3<f64>>;

    fn apply_in_place(&self, location: &mut Point3<f64>) {
        *location = self.apply(location);
    }

    fn apply_inverse_in_place(&self, location: &mut Point3<f64>) -> Result<()> {
        *location = self.apply_inverse(location)?;
        Ok(())
    }
}

pub(crate) fn check_matches(found: usize, required: usize) -> Result<()> {
    if found < required {
        return Err(Error::NotEnoughDataPoints { found, required });
    }
    Ok(())
}

/// `x ↦ linear · x + translation`, with its inverse cached after every fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Homography {
    pub(crate) linear: Matrix3<f64>,
    pub(crate) translation: Vector3<f64>,
    inverse: Option<(Matrix3<f64>, Vector3<f64>)>,
}

impl Default for Homography {
    fn default() -> Self {
        Self {
            linear: Matrix3::identity(),
            translation: Vector3::zeros(),
            inverse: Some((Matrix3::identity(), Vector3::zeros())),
        }
    }
}

impl Homography {
    pub(crate) fn set(&mut self, linear: Matrix3<f64>, translation: Vector3<f64>) {
        self.linear = linear;
        self.translation = translation;
        self.inverse = linear.try_inverse().map(|inv| (inv, -(inv * translation)));
    }

    pub(crate) fn apply(&self, location: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.linear * location.coords + self.translation)
    }

    pub(crate) fn apply_inverse(&self, location: &Point3<f64>) -> Result<Point3<f64>> {
        let (inv, t) = self.inverse.ok_or(Error::NoninvertibleModel)?;
        Ok(Point3::from(inv * location.coords + t))
    }

    pub(crate) fn is_invertible(&self) -> bool {
        self.inverse.is_some()
    }
}

/// Weighted centroids of the sources (local coordinates) and targets (world coordinates).
pub(crate) fn weighted_centroids(matches: &[PointMatch]) -> (Vector3<f64>, Vector3<f64>) {
    let mut pc = Vector3::zeros();
    let mut qc = Vector3::zeros();
    let mut ws = 0.0;
    for m in matches {
        ws += m.weight;
        pc += m.weight * m.p1.local.coords;
        qc += m.weight * m.p2.world.coords;
    }
    (pc / ws, qc / ws)
}
