use super::DistanceMap;
use crate::arbor::{HashMap, NodeId};

/// Cable distances from every node to the synapses within `max_distance`.
///
/// `partitions` must be sorted shortest first (see `Arbor::partition_sorted`): a branch node
/// has to be the tail of every shorter partition merging into it before the longer partition
/// passing through it is walked, otherwise synapses on the side branches never reach the nodes
/// beyond the branch.
///
/// Distances added while walking down a partition are dropped when they exceed `max_distance`;
/// distances carried one node up, and distances to synapses on the root, are kept only below it.
pub fn distance_map<N: NodeId>(
    partitions: &[Vec<N>],
    synapses: &HashMap<N, u32>,
    distances_to_root: &HashMap<N, f64>,
    root: Option<N>,
    max_distance: f64,
) -> DistanceMap<N> {
    let to_root = |n: N| distances_to_root.get(&n).copied().unwrap_or(0.0);
    let n_synapses = |n: N| synapses.get(&n).copied().unwrap_or(0) as usize;

    let mut ds: DistanceMap<N> = HashMap::default();
    for &node in partitions.iter().flatten().chain(root.as_ref()) {
        ds.entry(node).or_default();
    }

    // Branch node → every node downstream of it seen so far. Consumed once a longer partition
    // passes through the branch.
    let mut seen_downstream: HashMap<N, Vec<N>> = HashMap::default();

    for partition in partitions {
        let Some((&first, rest)) = partition.split_first() else {
            continue;
        };
        let mut downstream: Vec<N> = Vec::new();
        let mut prev = first;

        for &node in rest {
            downstream.push(prev);

            let n = n_synapses(prev);
            if n > 0 {
                let d = to_root(prev);
                for &child in &downstream {
                    let to_synapse = to_root(child) - d;
                    if to_synapse > max_distance {
                        continue;
                    }
                    ds.entry(child)
                        .or_default()
                        .extend(std::iter::repeat_n(to_synapse, n));
                }
            }

            let distance_to_root = to_root(node);
            let prev_to_current = to_root(prev) - distance_to_root;
            let translated: Vec<f64> = ds
                .get(&prev)
                .map(|prev_ds| {
                    prev_ds
                        .iter()
                        .map(|d| d + prev_to_current)
                        .filter(|&d| d < max_distance)
                        .collect()
                })
                .unwrap_or_default();

            if let Some(seen) = seen_downstream.remove(&node) {
                let current_ds = ds.get(&node).cloned().unwrap_or_default();
                let prev_ds = ds.get(&prev).cloned().unwrap_or_default();

                // Synapses on the branches already merged into `node` reach this partition.
                for &child in &downstream {
                    let distance = to_root(child) - distance_to_root;
                    if distance > max_distance {
                        continue;
                    }
                    ds.entry(child)
                        .or_default()
                        .extend(current_ds.iter().map(|d| d + distance));
                }

                // ...and the synapses of this partition reach those branches.
                for &child in &seen {
                    let distance = to_root(child) + prev_to_current - distance_to_root;
                    if distance > max_distance {
                        continue;
                    }
                    ds.entry(child)
                        .or_default()
                        .extend(prev_ds.iter().map(|d| d + distance));
                }

                downstream.extend(seen);
            }

            ds.entry(node).or_default().extend(translated);
            prev = node;
        }

        seen_downstream.insert(prev, downstream);
    }

    if let Some(root) = root {
        let n = n_synapses(root);
        if n > 0 {
            for (&node, distances) in ds.iter_mut() {
                let distance = to_root(node);
                if distance < max_distance {
                    distances.extend(std::iter::repeat_n(distance, n));
                }
            }
        }
    }

    ds
}
