//! Tunables for a full skeleton analysis.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Options shared by the clustering and axon analyses. Missing JSON fields take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Gaussian bandwidth λ of the synapse density, in the units of the node positions.
    pub bandwidth: f64,
    /// Fraction of the maximum centrifugal flow above which a node counts as axon trunk.
    pub fraction: f64,
    /// Collapse branches whose end node carries the "not a branch" tag.
    pub collapse_not_a_branch: bool,
    /// Reroot at the node tagged "soma" when exactly one such node exists.
    pub reroot_at_soma: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            bandwidth: 5000.0,
            fraction: 0.9,
            collapse_not_a_branch: true,
            reroot_at_soma: true,
        }
    }
}

impl AnalysisOptions {
    pub fn validate(&self) -> Result<()> {
        if !(self.bandwidth.is_finite() && self.bandwidth > 0.0) {
            return Err(Error::InvalidBandwidth(self.bandwidth));
        }
        if !(0.0..=1.0).contains(&self.fraction) {
            return Err(Error::InvalidFraction(self.fraction));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let opts: AnalysisOptions = serde_json::from_str(r#"{"bandwidth": 2.5}"#).unwrap();
        assert_eq!(opts.bandwidth, 2.5);
        assert_eq!(opts.fraction, 0.9);
        assert!(opts.reroot_at_soma);
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        let mut opts = AnalysisOptions::default();
        assert!(opts.validate().is_ok());
        opts.bandwidth = 0.0;
        assert!(matches!(opts.validate(), Err(Error::InvalidBandwidth(_))));
        opts.bandwidth = 1.0;
        opts.fraction = 1.5;
        assert!(matches!(opts.validate(), Err(Error::InvalidFraction(_))));
    }
}
