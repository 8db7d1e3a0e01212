//! Synaptic flow centrality.

use super::Arbor;
use crate::{HashMap, NodeId};

/// Number of input → output paths crossing the edge between a node and its parent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlowCentrality {
    /// Paths from inputs upstream of the node to outputs downstream of it (away from the root).
    pub centrifugal: f64,
    /// Paths from inputs downstream of the node to outputs upstream of it (toward the root).
    pub centripetal: f64,
    pub sum: f64,
}

impl<N: NodeId> Arbor<N> {
    /// Flow centrality of every node.
    ///
    /// `outputs` and `inputs` map nodes to synapse counts. The totals are summed from the maps
    /// when not given. Returns `None` when either total is zero, as no path exists.
    pub fn flow_centrality(
        &self,
        outputs: &HashMap<N, u32>,
        inputs: &HashMap<N, u32>,
        total_outputs: Option<u64>,
        total_inputs: Option<u64>,
    ) -> Option<HashMap<N, FlowCentrality>> {
        let total_outputs =
            total_outputs.unwrap_or_else(|| outputs.values().map(|&n| u64::from(n)).sum());
        let total_inputs =
            total_inputs.unwrap_or_else(|| inputs.values().map(|&n| u64::from(n)).sum());
        if total_outputs == 0 || total_inputs == 0 {
            return None;
        }
        let root = self.root()?;

        // Downstream (subtree-inclusive) synapse counts, accumulated from the leaves up.
        let order = super::alg::breadth_first(self, root);
        let mut seen_inputs: HashMap<N, u64> = HashMap::default();
        let mut seen_outputs: HashMap<N, u64> = HashMap::default();
        for &node in order.iter().rev() {
            let n_in = *seen_inputs.entry(node).or_insert(0)
                + inputs.get(&node).copied().map(u64::from).unwrap_or(0);
            let n_out = *seen_outputs.entry(node).or_insert(0)
                + outputs.get(&node).copied().map(u64::from).unwrap_or(0);
            seen_inputs.insert(node, n_in);
            seen_outputs.insert(node, n_out);
            if let Some(parent) = self.parent(node) {
                *seen_inputs.entry(parent).or_insert(0) += n_in;
                *seen_outputs.entry(parent).or_insert(0) += n_out;
            }
        }

        let (total_in, total_out) = (total_inputs as f64, total_outputs as f64);
        let centrality = order
            .into_iter()
            .map(|node| {
                let s_in = seen_inputs.get(&node).copied().unwrap_or(0) as f64;
                let s_out = seen_outputs.get(&node).copied().unwrap_or(0) as f64;
                let centrifugal = s_out * (total_in - s_in);
                let centripetal = s_in * (total_out - s_out);
                (
                    node,
                    FlowCentrality {
                        centrifugal,
                        centripetal,
                        sum: centrifugal + centripetal,
                    },
                )
            })
            .collect();
        Some(centrality)
    }
}
