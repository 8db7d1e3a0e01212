//! Moving least squares warping (Schaefer et al. 2006).

use crate::error::Result;
use crate::model::Model;
use crate::point::PointMatch;
use nalgebra::Point3;

/// Every location is transformed by `M` refitted to the landmarks, each weighted by its match
/// weight times `1 / s^alpha`, with `s` the squared distance from the location to the landmark
/// source. A location on a landmark source maps exactly onto its target.
#[derive(Debug, Clone)]
pub struct MovingLeastSquaresTransform<M: Model> {
    model: M,
    matches: Vec<PointMatch>,
    alpha: f64,
}

impl<M: Model> MovingLeastSquaresTransform<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            matches: Vec::new(),
            alpha: 1.0,
        }
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn set_alpha(&mut self, alpha: f64) {
        self.alpha = alpha;
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn matches(&self) -> &[PointMatch] {
        &self.matches
    }

    /// Replace the landmarks. The model is fitted once to all of them with their own weights,
    /// which fails when there are too few or they are degenerate.
    pub fn set_matches(&mut self, matches: Vec<PointMatch>) -> Result<()> {
        self.model.fit(&matches)?;
        tracing::debug!(matches = matches.len(), "fitted moving least squares landmarks");
        self.matches = matches;
        Ok(())
    }

    fn weigh(&self, square_distance: f64) -> f64 {
        1.0 / square_distance.powf(self.alpha)
    }

    pub fn apply(&self, location: &Point3<f64>) -> Result<Point3<f64>> {
        let mut out = *location;
        self.apply_in_place(&mut out)?;
        Ok(out)
    }

    /// On error `location` is left untouched.
    pub fn apply_in_place(&self, location: &mut Point3<f64>) -> Result<()> {
        let mut weighted: Vec<PointMatch> = Vec::with_capacity(self.matches.len());
        for m in &self.matches {
            let s = nalgebra::distance_squared(&m.p1.local, location);
            if s <= 0.0 {
                *location = m.p2.world;
                return Ok(());
            }
            weighted.push(PointMatch::weighted(m.p1, m.p2, m.weight * self.weigh(s)));
        }

        let mut model = self.model.clone();
        model.fit(&weighted)?;
        model.apply_in_place(location);
        Ok(())
    }
}
