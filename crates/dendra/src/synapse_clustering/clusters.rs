//! Views of a [`DensityHillMap`] grouped by cluster.

use super::DensityHillMap;
use crate::arbor::{HashSet, NodeId};
use std::collections::BTreeMap;

/// Cluster index → member nodes, sorted by node ID.
pub fn clusters<N: NodeId>(map: &DensityHillMap<N>) -> BTreeMap<usize, Vec<N>> {
    let mut out: BTreeMap<usize, Vec<N>> = BTreeMap::new();
    for (&node, &cluster) in map {
        out.entry(cluster).or_default().push(node);
    }
    for members in out.values_mut() {
        members.sort_unstable();
    }
    out
}

/// Cluster index → set of member nodes.
pub fn cluster_maps<N: NodeId>(map: &DensityHillMap<N>) -> BTreeMap<usize, HashSet<N>> {
    let mut out: BTreeMap<usize, HashSet<N>> = BTreeMap::new();
    for (&node, &cluster) in map {
        out.entry(cluster).or_default().insert(node);
    }
    out
}

/// Cluster index → number of member nodes.
pub fn cluster_sizes<N: NodeId>(map: &DensityHillMap<N>) -> BTreeMap<usize, usize> {
    let mut out: BTreeMap<usize, usize> = BTreeMap::new();
    for &cluster in map.values() {
        *out.entry(cluster).or_insert(0) += 1;
    }
    out
}
