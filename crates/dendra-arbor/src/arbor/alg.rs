//! Traversal helpers.
//!
//! Skeletons routinely contain unbranched stretches of tens of thousands of nodes, so the
//! depth-first walks use an explicit stack instead of recursion.

use super::Arbor;
use crate::NodeId;
use std::collections::VecDeque;

/// Nodes downstream of `start` (inclusive), parents before children, children in insertion
/// order.
pub fn preorder<N: NodeId>(arbor: &Arbor<N>, start: N) -> Vec<N> {
    let successors = arbor.successors_cached();
    let mut out: Vec<N> = Vec::new();
    let mut stack: Vec<N> = vec![start];
    while let Some(v) = stack.pop() {
        out.push(v);
        if let Some(children) = successors.get(&v) {
            stack.extend(children.iter().rev().copied());
        }
    }
    out
}

/// Nodes downstream of `start` (inclusive), children before parents.
pub fn postorder<N: NodeId>(arbor: &Arbor<N>, start: N) -> Vec<N> {
    let successors = arbor.successors_cached();
    let mut out: Vec<N> = Vec::new();
    let mut stack: Vec<(N, bool)> = vec![(start, false)];
    while let Some((v, expanded)) = stack.pop() {
        if expanded {
            out.push(v);
            continue;
        }
        stack.push((v, true));
        if let Some(children) = successors.get(&v) {
            stack.extend(children.iter().rev().map(|&c| (c, false)));
        }
    }
    out
}

/// Nodes downstream of `start` (inclusive) by increasing topological order.
pub fn breadth_first<N: NodeId>(arbor: &Arbor<N>, start: N) -> Vec<N> {
    let successors = arbor.successors_cached();
    let mut out: Vec<N> = Vec::new();
    let mut queue: VecDeque<N> = VecDeque::new();
    queue.push_back(start);
    while let Some(v) = queue.pop_front() {
        out.push(v);
        if let Some(children) = successors.get(&v) {
            queue.extend(children.iter().copied());
        }
    }
    out
}
