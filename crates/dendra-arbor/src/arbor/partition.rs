//! Partitioning an [`Arbor`] into unbranched paths.

use super::Arbor;
use crate::{HashSet, NodeId};
use std::cmp::Reverse;

impl<N: NodeId> Arbor<N> {
    /// Maximal unbranched paths, each starting at an end node.
    ///
    /// End nodes are taken from the furthest (in edge count from the root) to the closest, ties
    /// by node ID. The first path therefore runs from the deepest end node all the way to the
    /// root; every later path stops at (and includes) the first node an earlier path already
    /// covered. Together the paths cover every edge exactly once.
    pub fn partition(&self) -> Vec<Vec<N>> {
        let Some(root) = self.root() else {
            return Vec::new();
        };
        let orders = self.nodes_order_from(root);
        let mut ends = self.find_end_nodes();
        ends.sort_by_key(|n| (Reverse(orders.get(n).copied().unwrap_or(0)), *n));

        let mut seen: HashSet<N> = HashSet::default();
        ends.into_iter()
            .map(|end| {
                let mut sequence = vec![end];
                let mut parent = self.parent(end);
                while let Some(p) = parent {
                    sequence.push(p);
                    if !seen.insert(p) {
                        break;
                    }
                    parent = self.parent(p);
                }
                sequence
            })
            .collect()
    }

    /// [`Arbor::partition`] stably sorted by length, shortest first.
    ///
    /// This order is a contract: walking the result front to back guarantees that every path
    /// merging into a branch node has been walked before the path that continues through it.
    /// Algorithms that accumulate downstream state depend on it; algorithms that propagate
    /// state away from the root consume it back to front.
    pub fn partition_sorted(&self) -> Vec<Vec<N>> {
        let mut partitions = self.partition();
        partitions.sort_by_key(Vec::len);
        partitions
    }
}
