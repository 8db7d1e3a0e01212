//! Distance and cable measurements over an [`Arbor`].

use super::Arbor;
use crate::{HashMap, NodeId};
use std::collections::VecDeque;

/// Distance of every node to a reference node, plus the largest distance found at an end node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDistances<N: NodeId> {
    pub distances: HashMap<N, f64>,
    pub max: f64,
}

impl<N: NodeId> Arbor<N> {
    /// Distance of every node downstream of `root` to `root`.
    ///
    /// `distance_fn(child, parent)` returns the length of one edge. Unbranched stretches are
    /// walked in place; only branch children go through the queue.
    pub fn nodes_distance_to<F>(&self, root: N, mut distance_fn: F) -> NodeDistances<N>
    where
        F: FnMut(N, N) -> f64,
    {
        let successors = self.successors_cached();
        let mut distances: HashMap<N, f64> = HashMap::default();
        let mut max = 0.0_f64;

        let mut open: VecDeque<(N, f64)> = VecDeque::new();
        open.push_back((root, 0.0));
        while let Some((mut parent, mut dist)) = open.pop_front() {
            distances.insert(parent, dist);
            let mut succ = successors.get(&parent).map(Vec::as_slice).unwrap_or(&[]);
            while let [child] = succ {
                dist += distance_fn(*child, parent);
                distances.insert(*child, dist);
                parent = *child;
                succ = successors.get(&parent).map(Vec::as_slice).unwrap_or(&[]);
            }
            if succ.is_empty() {
                max = max.max(dist);
            } else {
                for &child in succ {
                    open.push_back((child, dist + distance_fn(child, parent)));
                }
            }
        }

        NodeDistances { distances, max }
    }

    /// Topological order of every node downstream of `root`: `root` has order 0, its children 1,
    /// and so on.
    pub fn nodes_order_from(&self, root: N) -> HashMap<N, usize> {
        let successors = self.successors_cached();
        let mut orders: HashMap<N, usize> = HashMap::default();
        let mut open: VecDeque<(N, usize)> = VecDeque::new();
        open.push_back((root, 0));
        while let Some((node, order)) = open.pop_front() {
            orders.insert(node, order);
            if let Some(children) = successors.get(&node) {
                for &child in children {
                    open.push_back((child, order + 1));
                }
            }
        }
        orders
    }

    /// Sum of `distance_fn(child, parent)` over all edges.
    pub fn cable_length<F>(&self, mut distance_fn: F) -> f64
    where
        F: FnMut(N, N) -> f64,
    {
        self.edges().map(|(c, p)| distance_fn(c, p)).sum()
    }

    /// Amount of arbor downstream of every node, where `amount_fn(parent, child)` measures one
    /// edge (return `1.0` to count nodes, the edge length to measure cable).
    ///
    /// With `normalize`, every value is divided by the value at the root.
    pub fn downstream_amount<F>(&self, mut amount_fn: F, normalize: bool) -> HashMap<N, f64>
    where
        F: FnMut(N, N) -> f64,
    {
        let mut values: HashMap<N, f64> = HashMap::default();
        // Shortest partitions first: every branch node is complete before a longer partition
        // passes through it.
        for partition in self.partition_sorted() {
            let Some((&first, rest)) = partition.split_first() else {
                continue;
            };
            values.insert(first, 0.0);
            let mut child = first;
            let mut val = 0.0;
            for &parent in rest {
                let accumulated = values.get(&parent).copied().unwrap_or(0.0);
                val += amount_fn(parent, child) + accumulated;
                values.insert(parent, val);
                child = parent;
            }
        }

        if let Some(root) = self.root() {
            values.entry(root).or_insert(0.0);
            if normalize {
                let max = values.get(&root).copied().unwrap_or(0.0);
                if max > 0.0 {
                    for v in values.values_mut() {
                        *v /= max;
                    }
                }
            }
        }

        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn y_shape() -> Arbor<u32> {
        // 1 is the root; 2 branches into 3 and 4, 4 continues to 5.
        let mut a = Arbor::new();
        a.add_edges([(2, 1), (3, 2), (4, 2), (5, 4)]);
        a
    }

    #[test]
    fn orders_count_edges_from_root() {
        let orders = y_shape().nodes_order_from(1);
        assert_eq!(orders[&1], 0);
        assert_eq!(orders[&2], 1);
        assert_eq!(orders[&3], 2);
        assert_eq!(orders[&5], 3);
    }

    #[test]
    fn distances_accumulate_edge_lengths() {
        let d = y_shape().nodes_distance_to(1, |c, p| f64::from(c - p));
        assert_eq!(d.distances[&2], 1.0);
        assert_eq!(d.distances[&3], 2.0);
        assert_eq!(d.distances[&4], 3.0);
        assert_eq!(d.distances[&5], 4.0);
        assert_eq!(d.max, 4.0);
    }

    #[test]
    fn downstream_node_counts() {
        let counts = y_shape().downstream_amount(|_, _| 1.0, false);
        assert_eq!(counts[&5], 0.0);
        assert_eq!(counts[&4], 1.0);
        assert_eq!(counts[&2], 3.0);
        assert_eq!(counts[&1], 4.0);

        let normalized = y_shape().downstream_amount(|_, _| 1.0, true);
        assert_eq!(normalized[&1], 1.0);
        assert_eq!(normalized[&2], 0.75);
    }
}
