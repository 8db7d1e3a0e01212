//! Input/output segregation of synapse clusters.

use crate::arbor::{HashMap, NodeId};

/// Synapse counts and binary entropy of one cluster.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClusterSynapses {
    pub n_inputs: u64,
    pub n_outputs: u64,
    pub entropy: f64,
}

impl ClusterSynapses {
    pub fn count<'a, N, I>(nodes: I, outputs: &HashMap<N, u32>, inputs: &HashMap<N, u32>) -> Self
    where
        N: NodeId + 'a,
        I: IntoIterator<Item = &'a N>,
    {
        let mut c = Self::default();
        for node in nodes {
            c.n_outputs += outputs.get(node).copied().map(u64::from).unwrap_or(0);
            c.n_inputs += inputs.get(node).copied().map(u64::from).unwrap_or(0);
        }
        c.entropy = binary_entropy(c.n_inputs, c.n_synapses());
        c
    }

    pub fn n_synapses(&self) -> u64 {
        self.n_inputs + self.n_outputs
    }
}

/// Entropy of the input/output split, 0 when the split is pure.
fn binary_entropy(n_inputs: u64, n_synapses: u64) -> f64 {
    if n_inputs == 0 || n_inputs == n_synapses {
        return 0.0;
    }
    let p = n_inputs as f64 / n_synapses as f64;
    -(p * p.ln() + (1.0 - p) * (1.0 - p).ln())
}

/// How well `clusters` separate inputs from outputs: `1 - S / S_norm`, where `S` is the
/// synapse-weighted mean entropy of the clusters and `S_norm` the entropy of the whole arbor.
///
/// 1 means fully segregated. Clusters without synapses are ignored. Returns 1 when there are no
/// synapses, only inputs, only outputs, or every cluster is pure.
pub fn segregation_index<'a, N, C, I>(
    clusters: C,
    outputs: &HashMap<N, u32>,
    inputs: &HashMap<N, u32>,
) -> f64
where
    N: NodeId + 'a,
    C: IntoIterator<Item = I>,
    I: IntoIterator<Item = &'a N>,
{
    let mut n_synapses = 0u64;
    let mut n_inputs = 0u64;
    let mut weighted = 0.0;
    for members in clusters {
        let c = ClusterSynapses::count(members, outputs, inputs);
        if c.n_synapses() == 0 {
            continue;
        }
        n_synapses += c.n_synapses();
        n_inputs += c.n_inputs;
        weighted += c.n_synapses() as f64 * c.entropy;
    }

    if n_synapses == 0 || n_inputs == 0 || n_inputs == n_synapses {
        return 1.0;
    }
    let s = weighted / n_synapses as f64;
    if s == 0.0 {
        return 1.0;
    }
    1.0 - s / binary_entropy(n_inputs, n_synapses)
}
