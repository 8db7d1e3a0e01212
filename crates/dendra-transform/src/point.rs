use crate::model::Model;
use nalgebra::Point3;

/// A landmark with its local coordinates and its (transformed) world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub local: Point3<f64>,
    pub world: Point3<f64>,
}

impl Point {
    /// A point whose world coordinates equal its local ones.
    pub fn new(local: Point3<f64>) -> Self {
        Self {
            local,
            world: local,
        }
    }

    pub fn with_world(local: Point3<f64>, world: Point3<f64>) -> Self {
        Self { local, world }
    }

    /// Set the world coordinates to `model` applied to the local ones.
    pub fn apply<M: Model>(&mut self, model: &M) {
        self.world = model.apply(&self.local);
    }

    /// Squared distance between local and world coordinates.
    pub fn square_distance(&self) -> f64 {
        nalgebra::distance_squared(&self.local, &self.world)
    }
}

/// A weighted correspondence from `p1` (source, read in local coordinates) to `p2` (target, read
/// in world coordinates).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointMatch {
    pub p1: Point,
    pub p2: Point,
    pub weight: f64,
}

impl PointMatch {
    pub fn new(p1: Point, p2: Point) -> Self {
        Self::weighted(p1, p2, 1.0)
    }

    pub fn weighted(p1: Point, p2: Point, weight: f64) -> Self {
        Self { p1, p2, weight }
    }

    /// A match from `source` to `target` with weight 1.
    pub fn between(source: Point3<f64>, target: Point3<f64>) -> Self {
        Self::new(Point::new(source), Point::new(target))
    }

    /// Distance between the transformed source and the target.
    pub fn distance(&self) -> f64 {
        nalgebra::distance(&self.p1.world, &self.p2.world)
    }
}
