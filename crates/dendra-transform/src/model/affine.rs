use super::{Homography, Model, check_matches, weighted_centroids};
use crate::error::{Error, Result};
use crate::point::PointMatch;
use nalgebra::{Matrix3, Point3};

/// General 3D affine transform, fitted in closed form by weighted least squares
/// (Schaefer et al. 2006).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AffineModel3D {
    h: Homography,
}

impl AffineModel3D {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn matrix(&self) -> nalgebra::Matrix3<f64> {
        self.h.linear
    }

    pub fn translation(&self) -> nalgebra::Vector3<f64> {
        self.h.translation
    }

    pub fn is_invertible(&self) -> bool {
        self.h.is_invertible()
    }
}

impl Model for AffineModel3D {
    const MIN_NUM_MATCHES: usize = 4;

    fn fit(&mut self, matches: &[PointMatch]) -> Result<()> {
        check_matches(matches.len(), Self::MIN_NUM_MATCHES)?;
        let (pc, qc) = weighted_centroids(matches);

        let mut a = Matrix3::zeros();
        let mut b = Matrix3::zeros();
        for m in matches {
            let p = m.p1.local.coords - pc;
            let q = m.p2.world.coords - qc;
            a += m.weight * p * p.transpose();
            b += m.weight * p * q.transpose();
        }
        let a_inv = a.try_inverse().ok_or(Error::IllDefinedDataPoints)?;
        let linear = (a_inv * b).transpose();
        let translation = qc - linear * pc;
        self.h.set(linear, translation);
        Ok(())
    }

    fn apply(&self, location: &Point3<f64>) -> Point3<f64> {
        self.h.apply(location)
    }

    fn apply_inverse(&self, location: &Point3<f64>) -> Result<Point3<f64>> {
        self.h.apply_inverse(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    #[test]
    fn recovers_a_shear_and_translation() {
        let linear = Matrix3::new(1.0, 0.5, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 1.0);
        let t = Vector3::new(1.0, -2.0, 3.0);
        let sources = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
        ];
        let matches: Vec<PointMatch> = sources
            .iter()
            .map(|s| PointMatch::between(*s, Point3::from(linear * s.coords + t)))
            .collect();

        let mut model = AffineModel3D::new();
        model.fit(&matches).unwrap();
        assert!((model.matrix() - linear).norm() < 1e-9);
        assert!((model.translation() - t).norm() < 1e-9);

        let p = Point3::new(2.0, 3.0, 4.0);
        let back = model.apply_inverse(&model.apply(&p)).unwrap();
        assert!((back - p).norm() < 1e-9);
    }

    #[test]
    fn coplanar_sources_are_ill_defined() {
        let matches: Vec<PointMatch> = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)]
            .iter()
            .map(|&(x, y)| PointMatch::between(Point3::new(x, y, 0.0), Point3::new(x, y, 0.0)))
            .collect();
        let mut model = AffineModel3D::new();
        assert!(matches!(model.fit(&matches), Err(Error::IllDefinedDataPoints)));
    }
}
