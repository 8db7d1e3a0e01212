//! Density-based synapse clustering.
//!
//! Every node gets the list of cable distances to the synapses within `3λ`, which turns into a
//! Gaussian synapse density. Nodes are then grouped into density hills: a node joins the hill of
//! its steepest uphill neighbor, and saddles between two or more hills start new clusters.

use crate::arbor::{Arbor, HashMap, NodeId};
use crate::util::{node_distance, timing_report, timing_start};
use crate::Positions;

mod clusters;
mod density_hill;
mod distance_map;

pub use clusters::{cluster_maps, cluster_sizes, clusters};
pub use distance_map::distance_map;

/// Node → cable distances to every synapse within `3λ` of it, one entry per synapse.
pub type DistanceMap<N> = HashMap<N, Vec<f64>>;

/// Node → cluster index. The root is always in cluster 0.
pub type DensityHillMap<N> = HashMap<N, usize>;

/// Clustering state for one arbor. Partitions, distances to root and the distance map are
/// computed once at construction.
#[derive(Debug, Clone)]
pub struct SynapseClustering<'a, N: NodeId> {
    arbor: &'a Arbor<N>,
    lambda: f64,
    partitions: Vec<Vec<N>>,
    distances_to_root: HashMap<N, f64>,
    ds: DistanceMap<N>,
}

impl<'a, N: NodeId> SynapseClustering<'a, N> {
    /// `synapses` maps nodes to their synapse count (inputs plus outputs); `lambda` is the
    /// Gaussian bandwidth, in the units of `positions`.
    pub fn new(
        arbor: &'a Arbor<N>,
        positions: &Positions<N>,
        synapses: &HashMap<N, u32>,
        lambda: f64,
    ) -> Self {
        let start = timing_start();
        let partitions = arbor.partition_sorted();
        let distances_to_root = match arbor.root() {
            Some(root) => {
                arbor
                    .nodes_distance_to(root, |child, parent| {
                        node_distance(positions, child, parent)
                    })
                    .distances
            }
            None => HashMap::default(),
        };
        let ds = distance_map(
            &partitions,
            synapses,
            &distances_to_root,
            arbor.root(),
            3.0 * lambda,
        );
        tracing::debug!(
            nodes = arbor.count_nodes(),
            partitions = partitions.len(),
            synapses = synapses.values().map(|&n| u64::from(n)).sum::<u64>(),
            lambda,
            "built synapse distance map"
        );
        timing_report("distance_map", start);

        Self {
            arbor,
            lambda,
            partitions,
            distances_to_root,
            ds,
        }
    }

    pub fn arbor(&self) -> &Arbor<N> {
        self.arbor
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Partitions of the arbor, shortest first.
    pub fn partitions(&self) -> &[Vec<N>] {
        &self.partitions
    }

    pub fn distances_to_root(&self) -> &HashMap<N, f64> {
        &self.distances_to_root
    }

    pub fn distance_map(&self) -> &DistanceMap<N> {
        &self.ds
    }

    /// Synapse density of every node: `Σ exp(-d² / λ²)` over its distance list.
    pub fn density(&self) -> HashMap<N, f64> {
        density(&self.ds, self.lambda)
    }
}

pub fn density<N: NodeId>(ds: &DistanceMap<N>, lambda: f64) -> HashMap<N, f64> {
    let lambda_sq = lambda * lambda;
    ds.iter()
        .map(|(&node, distances)| {
            let sum = distances
                .iter()
                .map(|d| (-(d * d) / lambda_sq).exp())
                .fold(0.0, |acc, x| acc + x);
            (node, sum)
        })
        .collect()
}
