//! Axon detection from synaptic flow centrality.
//!
//! The axon hangs off the stretch of cable with maximum centrifugal flow: the edges that carry
//! the most input → output paths away from the root. The cut is placed inside that stretch and
//! everything downstream of it is the axon.

use crate::arbor::{Arbor, FlowCentrality, HashMap, HashSet, NodeId, alg};
use crate::parser::ArborParser;
use crate::segregation::segregation_index;
use crate::util::{node_distance, timing_report, timing_start};
use crate::Positions;
use std::cmp::Reverse;
use std::collections::VecDeque;

/// Nodes of an arbor classified by centrifugal flow.
#[derive(Debug, Clone, PartialEq)]
pub struct ArborRegions<N: NodeId> {
    /// Centrifugal flow at or above `fraction × max`.
    pub above: Vec<N>,
    /// Centrifugal flow exactly at the maximum.
    pub plateau: Vec<N>,
    /// Outside `above`, with no flow of either direction.
    pub zeros: Vec<N>,
}

/// Classify the nodes of `arbor` by their centrifugal flow. Returns `None` when no node has
/// any centrifugal flow, which happens for arbors rooted inside the axon.
pub fn find_arbor_regions<N: NodeId>(
    arbor: &Arbor<N>,
    fc: &HashMap<N, FlowCentrality>,
    fraction: f64,
) -> Option<ArborRegions<N>> {
    let nodes = arbor.nodes_array();
    let flow = |n: &N| fc.get(n).copied().unwrap_or_default();
    let max = nodes
        .iter()
        .map(|n| flow(n).centrifugal)
        .fold(0.0_f64, f64::max);
    if max == 0.0 {
        return None;
    }

    let threshold = fraction * max;
    let mut regions = ArborRegions {
        above: Vec::new(),
        plateau: Vec::new(),
        zeros: Vec::new(),
    };
    for node in nodes {
        let f = flow(&node);
        if f.centrifugal >= threshold {
            regions.above.push(node);
            if f.centrifugal == max {
                regions.plateau.push(node);
            }
        } else if f.sum == 0.0 {
            regions.zeros.push(node);
        }
    }
    Some(regions)
}

/// The node at which to cut `arbor` so that the sub-arbor downstream of it is the axon. The
/// returned node is a member of `above`.
///
/// Within `above`, cable distances are measured from the member closest to the root. Among the
/// members at half the maximum distance or beyond, the one of lowest order wins if it bears
/// an output, or if it is a branch whose parent is in `above` and more than one of its children
/// is in `above` or has outputs downstream. Otherwise the member furthest from the root is used.
pub fn find_axon_cut<N: NodeId>(
    arbor: &Arbor<N>,
    outputs: &HashMap<N, u32>,
    above: &[N],
    positions: &Positions<N>,
) -> Option<N> {
    match above {
        [] => return None,
        [only] => return Some(*only),
        _ => {}
    }
    let root = arbor.root()?;
    let orders = arbor.nodes_order_from(root);
    let order = |n: N| orders.get(&n).copied().unwrap_or(0);
    let has_outputs = |n: N| outputs.get(&n).is_some_and(|&c| c > 0);

    let mut sorted = above.to_vec();
    sorted.sort_by_key(|&n| (Reverse(order(n)), n));
    let furthest = sorted[0];
    let closest = sorted[sorted.len() - 1];
    let is_above: HashSet<N> = above.iter().copied().collect();
    let successors = arbor.all_successors();

    let mut distances: HashMap<N, f64> = HashMap::default();
    distances.insert(closest, 0.0);
    let mut max = 0.0_f64;
    let mut open: VecDeque<N> = VecDeque::from([closest]);
    while let Some(parent) = open.pop_front() {
        let d = distances.get(&parent).copied().unwrap_or(0.0);
        for &child in successors.get(&parent).into_iter().flatten() {
            if !is_above.contains(&child) {
                continue;
            }
            let dc = d + node_distance(positions, parent, child);
            distances.insert(child, dc);
            max = max.max(dc);
            open.push_back(child);
        }
    }

    let threshold = max / 2.0;
    let downstream_outputs = count_downstream(arbor, root, outputs);
    let be = arbor.find_branch_and_end_nodes();

    let mut lowest: Option<(N, usize)> = None;
    for &node in &sorted {
        // Members disconnected from `closest` have no distance.
        if !distances.get(&node).is_some_and(|&d| d > 0.0 && d >= threshold) {
            continue;
        }
        let node_order = order(node);
        if lowest.is_some_and(|(_, o)| node_order >= o) {
            continue;
        }
        let qualifies = has_outputs(node)
            || (be.is_branch(node)
                && arbor.parent(node).is_some_and(|p| is_above.contains(&p))
                && successors
                    .get(&node)
                    .into_iter()
                    .flatten()
                    .filter(|&&c| {
                        is_above.contains(&c)
                            || downstream_outputs.get(&c).is_some_and(|&n| n > 0)
                    })
                    .count()
                    > 1);
        if qualifies {
            lowest = Some((node, node_order));
        }
    }

    Some(lowest.map_or(furthest, |(node, _)| node))
}

/// Subtree-inclusive output counts of every node.
fn count_downstream<N: NodeId>(
    arbor: &Arbor<N>,
    root: N,
    outputs: &HashMap<N, u32>,
) -> HashMap<N, u64> {
    let mut counts: HashMap<N, u64> = HashMap::default();
    for node in alg::postorder(arbor, root) {
        let own = outputs.get(&node).copied().map(u64::from).unwrap_or(0);
        let total = counts.get(&node).copied().unwrap_or(0) + own;
        counts.insert(node, total);
        if let Some(parent) = arbor.parent(node) {
            *counts.entry(parent).or_insert(0) += total;
        }
    }
    counts
}

/// The axon of a neuron: the sub-arbor downstream of the cut, plus the flow regions it was
/// derived from.
#[derive(Debug, Clone)]
pub struct Axon<N: NodeId> {
    pub arbor: Arbor<N>,
    pub fc_max_plateau: Vec<N>,
    pub fc_zeros: Vec<N>,
}

impl<N: NodeId> Axon<N> {
    /// The node at which the axon was cut off.
    pub fn cut(&self) -> Option<N> {
        self.arbor.root()
    }
}

/// Find the axon of a parsed skeleton. Returns `None` when the flow centrality is not
/// computable (no inputs or no outputs), when no node has centrifugal flow, or when no cut
/// exists.
pub fn find_axon(
    parsed: &ArborParser,
    fraction: f64,
    positions: &Positions<u64>,
) -> Option<Axon<u64>> {
    let start = timing_start();
    let fc = parsed.arbor.flow_centrality(
        &parsed.outputs,
        &parsed.inputs,
        parsed.n_outputs,
        parsed.n_inputs,
    )?;
    let regions = find_arbor_regions(&parsed.arbor, &fc, fraction)?;
    let cut = find_axon_cut(&parsed.arbor, &parsed.outputs, &regions.above, positions)?;
    tracing::debug!(
        cut,
        above = regions.above.len(),
        plateau = regions.plateau.len(),
        "found axon cut"
    );
    timing_report("find_axon", start);

    Some(Axon {
        arbor: parsed.arbor.sub_arbor(cut),
        fc_max_plateau: regions.plateau,
        fc_zeros: regions.zeros,
    })
}

/// Segregation index of the two-cluster split of a neuron into its axon and everything else.
pub fn axon_segregation_index(parsed: &ArborParser, axon: &Axon<u64>) -> f64 {
    let axon_nodes = axon.arbor.nodes();
    let (in_axon, rest): (Vec<u64>, Vec<u64>) = parsed
        .arbor
        .nodes_array()
        .into_iter()
        .partition(|n| axon_nodes.contains(n));
    segregation_index([&in_axon, &rest], &parsed.outputs, &parsed.inputs)
}
