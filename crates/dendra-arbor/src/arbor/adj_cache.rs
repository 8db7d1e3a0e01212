//! Children cache used by [`Arbor`](super::Arbor).
//!
//! Most tree walks ask for the children of every node. Deriving them from the child → parent
//! map is O(n), so the result is kept until the arbor is mutated.

use crate::{HashMap, NodeId};

#[derive(Debug, Clone)]
pub(in crate::arbor) struct SuccessorCache<N: NodeId> {
    pub(in crate::arbor) generation: u64,
    pub(in crate::arbor) successors: HashMap<N, Vec<N>>,
}
