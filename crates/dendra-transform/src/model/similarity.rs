use super::{Homography, Model, check_matches, weighted_centroids};
use crate::error::{Error, Result};
use crate::point::PointMatch;
use nalgebra::{Matrix3, Matrix4, Point3, SymmetricEigen, Vector3};

/// Rotation, uniform scale and translation.
///
/// The rotation is found as the quaternion of Kanatani (1994): an eigenvector of the 4×4 matrix
/// built from the cross-covariance of the centred sources and targets. By default the eigenvector
/// of the largest absolute eigenvalue is taken, and a negative eigenvalue turns the fit into a
/// reflection. With `proper`, the largest eigenvalue is taken and the fit is always a rotation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimilarityModel3D {
    h: Homography,
    pub proper: bool,
}

/// Rotation and translation only; like [`SimilarityModel3D`] with the scale fixed to 1.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RigidModel3D {
    h: Homography,
    pub proper: bool,
}

impl SimilarityModel3D {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn proper() -> Self {
        Self {
            proper: true,
            ..Self::default()
        }
    }

    pub fn matrix(&self) -> Matrix3<f64> {
        self.h.linear
    }

    pub fn translation(&self) -> Vector3<f64> {
        self.h.translation
    }
}

impl RigidModel3D {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn proper() -> Self {
        Self {
            proper: true,
            ..Self::default()
        }
    }

    pub fn matrix(&self) -> Matrix3<f64> {
        self.h.linear
    }

    pub fn translation(&self) -> Vector3<f64> {
        self.h.translation
    }
}

impl Model for SimilarityModel3D {
    const MIN_NUM_MATCHES: usize = 3;

    fn fit(&mut self, matches: &[PointMatch]) -> Result<()> {
        check_matches(matches.len(), Self::MIN_NUM_MATCHES)?;
        let (pc, qc) = weighted_centroids(matches);

        let (mut r1, mut r2) = (0.0, 0.0);
        for m in matches {
            r1 += m.weight * (m.p1.local.coords - pc).norm_squared();
            r2 += m.weight * (m.p2.world.coords - qc).norm_squared();
        }
        if r1 == 0.0 {
            return Err(Error::IllDefinedDataPoints);
        }
        let scale = (r2 / r1).sqrt();

        let s = cross_covariance(matches, pc, qc, scale);
        let (q, reflection) = quaternion_rotation(&compute_n(&s), self.proper);
        let scale = if reflection { -scale } else { scale };
        set_rotation_translation(&mut self.h, scale, q, pc, qc);
        Ok(())
    }

    fn apply(&self, location: &Point3<f64>) -> Point3<f64> {
        self.h.apply(location)
    }

    fn apply_inverse(&self, location: &Point3<f64>) -> Result<Point3<f64>> {
        self.h.apply_inverse(location)
    }
}

impl Model for RigidModel3D {
    const MIN_NUM_MATCHES: usize = 3;

    fn fit(&mut self, matches: &[PointMatch]) -> Result<()> {
        check_matches(matches.len(), Self::MIN_NUM_MATCHES)?;
        let (pc, qc) = weighted_centroids(matches);

        let s = cross_covariance(matches, pc, qc, 1.0);
        let (q, reflection) = quaternion_rotation(&compute_n(&s), self.proper);
        let scale = if reflection { -1.0 } else { 1.0 };
        set_rotation_translation(&mut self.h, scale, q, pc, qc);
        Ok(())
    }

    fn apply(&self, location: &Point3<f64>) -> Point3<f64> {
        self.h.apply(location)
    }

    fn apply_inverse(&self, location: &Point3<f64>) -> Result<Point3<f64>> {
        self.h.apply_inverse(location)
    }
}

/// `Σ w · (scale · (p - pc)) (q - qc)ᵀ`.
fn cross_covariance(
    matches: &[PointMatch],
    pc: Vector3<f64>,
    qc: Vector3<f64>,
    scale: f64,
) -> Matrix3<f64> {
    let mut s = Matrix3::zeros();
    for m in matches {
        let p = (m.p1.local.coords - pc) * (scale * m.weight);
        let q = m.p2.world.coords - qc;
        s += p * q.transpose();
    }
    s
}

fn compute_n(s: &Matrix3<f64>) -> Matrix4<f64> {
    let (sxx, sxy, sxz) = (s[(0, 0)], s[(0, 1)], s[(0, 2)]);
    let (syx, syy, syz) = (s[(1, 0)], s[(1, 1)], s[(1, 2)]);
    let (szx, szy, szz) = (s[(2, 0)], s[(2, 1)], s[(2, 2)]);
    Matrix4::new(
        sxx + syy + szz,
        syz - szy,
        szx - sxz,
        sxy - syx,
        syz - szy,
        sxx - syy - szz,
        sxy + syx,
        szx + sxz,
        szx - sxz,
        sxy + syx,
        -sxx + syy - szz,
        syz + szy,
        sxy - syx,
        szx + sxz,
        syz + szy,
        -sxx - syy + szz,
    )
}

/// Unit quaternion `(q0, qx, qy, qz)` of the best-fit rotation, and whether the fit is a
/// reflection.
fn quaternion_rotation(n: &Matrix4<f64>, proper: bool) -> ([f64; 4], bool) {
    let eigen = SymmetricEigen::new(*n);
    let values = eigen.eigenvalues;
    let mut index = 0;
    for i in 1..4 {
        let better = if proper {
            values[i] > values[index]
        } else {
            values[i].abs() > values[index].abs()
        };
        if better {
            index = i;
        }
    }
    let v = eigen.eigenvectors.column(index);
    ([v[0], v[1], v[2], v[3]], values[index] < 0.0)
}

fn set_rotation_translation(
    h: &mut Homography,
    s: f64,
    [q0, qx, qy, qz]: [f64; 4],
    pc: Vector3<f64>,
    qc: Vector3<f64>,
) {
    let linear = Matrix3::new(
        s * (q0 * q0 + qx * qx - qy * qy - qz * qz),
        s * 2.0 * (qx * qy - q0 * qz),
        s * 2.0 * (qx * qz + q0 * qy),
        s * 2.0 * (qy * qx + q0 * qz),
        s * (q0 * q0 - qx * qx + qy * qy - qz * qz),
        s * 2.0 * (qy * qz - q0 * qx),
        s * 2.0 * (qz * qx - q0 * qy),
        s * 2.0 * (qz * qy + q0 * qx),
        s * (q0 * q0 - qx * qx - qy * qy + qz * qz),
    );
    h.set(linear, qc - linear * pc);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tetrahedron() -> [Point3<f64>; 4] {
        [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
            Point3::new(0.0, 0.0, 3.0),
        ]
    }

    fn mapped(f: impl Fn(&Point3<f64>) -> Point3<f64>) -> Vec<PointMatch> {
        tetrahedron()
            .iter()
            .map(|p| PointMatch::between(*p, f(p)))
            .collect()
    }

    /// 90° about z.
    fn rot_z(p: &Point3<f64>) -> Point3<f64> {
        Point3::new(-p.y, p.x, p.z)
    }

    #[test]
    fn rigid_recovers_rotation_and_translation() {
        let t = Vector3::new(5.0, -1.0, 2.0);
        let matches = mapped(|p| rot_z(p) + t);
        let mut model = RigidModel3D::new();
        model.fit(&matches).unwrap();
        for m in &matches {
            assert!((model.apply(&m.p1.local) - m.p2.world).norm() < 1e-9);
        }
        assert!((model.matrix().determinant() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn similarity_recovers_uniform_scale() {
        let matches = mapped(|p| Point3::from(rot_z(p).coords * 2.5));
        let mut model = SimilarityModel3D::new();
        model.fit(&matches).unwrap();
        for m in &matches {
            assert!((model.apply(&m.p1.local) - m.p2.world).norm() < 1e-9);
        }
        let p = Point3::new(0.3, -0.7, 1.1);
        let back = model.apply_inverse(&model.apply(&p)).unwrap();
        assert!((back - p).norm() < 1e-9);
    }

    #[test]
    fn mirrored_targets_fit_as_a_reflection_unless_proper() {
        let matches = mapped(|p| Point3::new(-p.x, -p.y, -p.z));

        let mut improper = RigidModel3D::new();
        improper.fit(&matches).unwrap();
        assert!((improper.matrix().determinant() + 1.0).abs() < 1e-9);
        for m in &matches {
            assert!((improper.apply(&m.p1.local) - m.p2.world).norm() < 1e-9);
        }

        let mut proper = RigidModel3D::proper();
        proper.fit(&matches).unwrap();
        assert!((proper.matrix().determinant() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn too_few_matches() {
        let all = mapped(|p| *p);
        assert!(matches!(
            SimilarityModel3D::new().fit(&all[..2]),
            Err(Error::NotEnoughDataPoints {
                found: 2,
                required: 3
            })
        ));
    }
}
