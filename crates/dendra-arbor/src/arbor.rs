//! The [`Arbor`] container.
//!
//! Baseline: CATMAID's `Arbor.js`. Edges are stored child → parent in an insertion-ordered map;
//! the root is the only node that never appears as a key.

use crate::{HashMap, HashSet, NodeId};
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use std::cell::{Ref, RefCell};

pub mod alg;

mod adj_cache;
mod flow;
mod measure;
mod partition;

use adj_cache::SuccessorCache;

pub use flow::FlowCentrality;
pub use measure::NodeDistances;

type EdgeMap<N> = IndexMap<N, N, FxBuildHasher>;

/// Branch nodes (with their child counts) and end nodes of an arbor.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchAndEndNodes<N: NodeId> {
    pub branches: HashMap<N, usize>,
    pub ends: Vec<N>,
}

impl<N: NodeId> BranchAndEndNodes<N> {
    pub fn is_branch(&self, node: N) -> bool {
        self.branches.contains_key(&node)
    }
}

#[derive(Debug, Clone)]
pub struct Arbor<N: NodeId> {
    root: Option<N>,
    edges: EdgeMap<N>,

    // Partitioning, sub-arbors and distance walks all need children lists. Rebuilding them from
    // the edge map costs O(n) per call, so they are cached until the next mutation.
    generation: u64,
    successor_cache: RefCell<Option<SuccessorCache<N>>>,
}

impl<N: NodeId> Default for Arbor<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: NodeId> PartialEq for Arbor<N> {
    fn eq(&self, other: &Self) -> bool {
        self.root == other.root && self.edges == other.edges
    }
}

impl<N: NodeId> Arbor<N> {
    pub fn new() -> Self {
        Self {
            root: None,
            edges: EdgeMap::default(),
            generation: 0,
            successor_cache: RefCell::new(None),
        }
    }

    /// A single-node arbor.
    pub fn with_root(root: N) -> Self {
        let mut arbor = Self::new();
        arbor.root = Some(root);
        arbor
    }

    fn invalidate(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        *self.successor_cache.get_mut() = None;
    }

    pub(crate) fn successors_cached(&self) -> Ref<'_, HashMap<N, Vec<N>>> {
        let generation = self.generation;
        let stale = self
            .successor_cache
            .borrow()
            .as_ref()
            .map(|c| c.generation != generation)
            .unwrap_or(true);
        if stale {
            let successors = self.build_successors();
            *self.successor_cache.borrow_mut() = Some(SuccessorCache {
                generation,
                successors,
            });
        }
        Ref::map(self.successor_cache.borrow(), |c| {
            &c.as_ref()
                .expect("successor cache should be present after rebuild")
                .successors
        })
    }

    fn build_successors(&self) -> HashMap<N, Vec<N>> {
        let mut out: HashMap<N, Vec<N>> = HashMap::default();
        if self.edges.is_empty() {
            if let Some(root) = self.root {
                out.insert(root, Vec::new());
            }
            return out;
        }
        for (&child, &parent) in &self.edges {
            out.entry(parent).or_default().push(child);
            out.entry(child).or_default();
        }
        out
    }

    pub fn root(&self) -> Option<N> {
        self.root
    }

    /// Set the root without touching the edges. The caller guarantees `root` has no parent.
    pub fn set_root(&mut self, root: N) -> &mut Self {
        debug_assert!(!self.edges.contains_key(&root), "root must not have a parent");
        self.root = Some(root);
        self.invalidate();
        self
    }

    /// Edges as `(child, parent)` pairs in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (N, N)> + '_ {
        self.edges.iter().map(|(&c, &p)| (c, p))
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn parent(&self, node: N) -> Option<N> {
        self.edges.get(&node).copied()
    }

    /// Add a single child → parent edge. The root is not re-derived; see [`Arbor::add_edges`].
    pub fn set_edge(&mut self, child: N, parent: N) -> &mut Self {
        self.edges.insert(child, parent);
        self.invalidate();
        self
    }

    /// Drop the edge from `child` to its parent, returning the parent. Does not re-derive the
    /// root.
    pub fn remove_edge(&mut self, child: N) -> Option<N> {
        let parent = self.edges.swap_remove(&child);
        if parent.is_some() {
            self.invalidate();
        }
        parent
    }

    /// Add `(child, parent)` edges and re-derive the root.
    ///
    /// The new edges are assumed to intersect the existing ones, if any; otherwise the arbor
    /// ends up with several disconnected subtrees.
    pub fn add_edges<I>(&mut self, edges: I) -> &mut Self
    where
        I: IntoIterator<Item = (N, N)>,
    {
        for (child, parent) in edges {
            self.edges.insert(child, parent);
        }
        self.invalidate();
        self.root = self.find_root();
        self
    }

    /// `path` lists nodes where every node is the child of its predecessor. The first node
    /// becomes the root when it has no parent yet.
    pub fn add_path(&mut self, path: &[N]) -> &mut Self {
        for pair in path.windows(2).rev() {
            self.edges.insert(pair[1], pair[0]);
        }
        self.invalidate();
        if let Some(&first) = path.first() {
            if !self.edges.contains_key(&first) {
                self.root = Some(first);
            }
        }
        self
    }

    /// Like [`Arbor::add_path`], with every node being the parent of its predecessor.
    pub fn add_path_reversed(&mut self, path: &[N]) -> &mut Self {
        for pair in path.windows(2).rev() {
            self.edges.insert(pair[0], pair[1]);
        }
        self.invalidate();
        if let Some(&last) = path.last() {
            if !self.edges.contains_key(&last) {
                self.root = Some(last);
            }
        }
        self
    }

    pub fn contains(&self, node: N) -> bool {
        self.root == Some(node) || self.edges.contains_key(&node)
    }

    /// The first parent that has no parent itself, or the current root when there are no edges.
    pub fn find_root(&self) -> Option<N> {
        for &parent in self.edges.values() {
            if !self.edges.contains_key(&parent) {
                return Some(parent);
            }
        }
        self.root
    }

    /// Make `new_root` the root by reversing the edges on its path to the current root.
    /// Assumes `new_root` belongs to this arbor.
    pub fn reroot(&mut self, new_root: N) -> &mut Self {
        if self.root == Some(new_root) {
            return self;
        }
        let mut path = vec![new_root];
        let mut parent = self.edges.get(&new_root).copied();
        while let Some(p) = parent {
            if let Some(&last) = path.last() {
                self.edges.swap_remove(&last);
            }
            path.push(p);
            parent = self.edges.get(&p).copied();
        }
        self.add_path(&path)
    }

    /// All nodes: children in insertion order, then the root.
    pub fn nodes_array(&self) -> Vec<N> {
        let mut nodes: Vec<N> = self.edges.keys().copied().collect();
        if let Some(root) = self.root {
            nodes.push(root);
        }
        nodes
    }

    pub fn nodes(&self) -> HashSet<N> {
        self.nodes_array().into_iter().collect()
    }

    pub fn count_nodes(&self) -> usize {
        self.edges.len() + usize::from(self.root.is_some())
    }

    /// Map of every node to its children. End nodes map to empty lists.
    pub fn all_successors(&self) -> HashMap<N, Vec<N>> {
        self.successors_cached().clone()
    }

    pub fn successors(&self, node: N) -> Vec<N> {
        self.successors_cached()
            .get(&node)
            .cloned()
            .unwrap_or_default()
    }

    /// Map of every node to its children plus its parent. An isolated root maps to an empty list.
    pub fn all_neighbors(&self) -> HashMap<N, Vec<N>> {
        let mut out: HashMap<N, Vec<N>> = HashMap::default();
        if self.edges.is_empty() {
            if let Some(root) = self.root {
                out.insert(root, Vec::new());
            }
            return out;
        }
        for (&child, &parent) in &self.edges {
            out.entry(child).or_default().push(parent);
            out.entry(parent).or_default().push(child);
        }
        out
    }

    pub fn neighbors(&self, node: N) -> Vec<N> {
        let mut out: Vec<N> = self.parent(node).into_iter().collect();
        out.extend(self.successors(node));
        out
    }

    /// End nodes in insertion order. The root is never reported, even when isolated.
    pub fn find_end_nodes(&self) -> Vec<N> {
        let parents: HashSet<N> = self.edges.values().copied().collect();
        self.edges
            .keys()
            .copied()
            .filter(|child| !parents.contains(child))
            .collect()
    }

    pub fn find_branch_and_end_nodes(&self) -> BranchAndEndNodes<N> {
        let mut child_counts: HashMap<N, usize> = HashMap::default();
        for &parent in self.edges.values() {
            *child_counts.entry(parent).or_insert(0) += 1;
        }
        let ends = self
            .edges
            .keys()
            .copied()
            .filter(|child| !child_counts.contains_key(child))
            .collect();
        child_counts.retain(|_, count| *count > 1);
        BranchAndEndNodes {
            branches: child_counts,
            ends,
        }
    }

    pub fn find_branch_nodes(&self) -> Vec<N> {
        let successors = self.successors_cached();
        self.nodes_array()
            .into_iter()
            .filter(|n| successors.get(n).map(|c| c.len() > 1).unwrap_or(false))
            .collect()
    }

    /// A new arbor with every node downstream of `new_root`, rooted at `new_root`.
    pub fn sub_arbor(&self, new_root: N) -> Arbor<N> {
        let successors = self.successors_cached();
        let mut sub = Arbor::with_root(new_root);
        let mut open: std::collections::VecDeque<N> = std::collections::VecDeque::new();
        open.push_back(new_root);
        while let Some(mut parent) = open.pop_front() {
            loop {
                let children = successors.get(&parent).map(Vec::as_slice).unwrap_or(&[]);
                let Some((&first, rest)) = children.split_first() else {
                    break;
                };
                sub.edges.insert(first, parent);
                for &child in rest {
                    sub.edges.insert(child, parent);
                    open.push_back(child);
                }
                parent = first;
            }
        }
        sub
    }
}
