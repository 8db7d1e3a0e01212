//! Rooted tree container used by `dendra`.
//!
//! An [`Arbor`] models a neuron skeleton: every node has at most one edge, pointing to its
//! parent. The single node without a parent is the root. Malformed topologies (several roots,
//! cycles, disconnected pieces) are a caller error and are not checked outside debug builds.
//!
//! All derived maps iterate in edge insertion order, so results are deterministic for a given
//! construction sequence.

pub mod arbor;

pub use arbor::{Arbor, BranchAndEndNodes, FlowCentrality, NodeDistances, alg};

use rustc_hash::FxBuildHasher;
use std::fmt::Debug;
use std::hash::Hash;

pub type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;
pub type HashSet<T> = hashbrown::HashSet<T, FxBuildHasher>;

/// Identifier of a skeleton node.
///
/// `Ord` is required so that ties in sorting and clustering resolve by node ID rather than by
/// hash order.
pub trait NodeId: Debug + Copy + Hash + Eq + Ord {}

impl<T: Debug + Copy + Hash + Eq + Ord> NodeId for T {}
