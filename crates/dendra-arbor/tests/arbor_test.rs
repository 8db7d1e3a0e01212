use dendra_arbor::{Arbor, alg};

/// ```text
/// 1 ─ 2 ─ 3 ─ 4
///         └ 5 ─ 6
///           └ 7
/// ```
fn sample() -> Arbor<u64> {
    let mut a = Arbor::new();
    a.add_edges([(2, 1), (3, 2), (4, 3), (5, 3), (6, 5), (7, 5)]);
    a
}

#[test]
fn add_edges_derives_the_root() {
    let a = sample();
    assert_eq!(a.root(), Some(1));
    assert_eq!(a.count_nodes(), 7);
    assert!(a.contains(1));
    assert!(a.contains(7));
    assert!(!a.contains(8));
}

#[test]
fn add_path_sets_root_to_first_node() {
    let mut a: Arbor<u64> = Arbor::new();
    a.add_path(&[10, 11, 12]);
    assert_eq!(a.root(), Some(10));
    assert_eq!(a.parent(12), Some(11));
    assert_eq!(a.parent(11), Some(10));

    let mut b: Arbor<u64> = Arbor::new();
    b.add_path_reversed(&[12, 11, 10]);
    assert_eq!(a, b);
}

#[test]
fn successors_and_neighbors() {
    let a = sample();
    let succ = a.all_successors();
    assert_eq!(succ[&3], vec![4, 5]);
    assert_eq!(succ[&4], Vec::<u64>::new());
    assert_eq!(succ[&1], vec![2]);

    let neighbors = a.all_neighbors();
    let mut n3 = neighbors[&3].clone();
    n3.sort();
    assert_eq!(n3, vec![2, 4, 5]);
    assert_eq!(neighbors[&1], vec![2]);
    assert_eq!(neighbors[&7], vec![5]);
}

#[test]
fn isolated_root_has_empty_successors_and_neighbors() {
    let a: Arbor<u64> = Arbor::with_root(42);
    assert_eq!(a.all_successors()[&42], Vec::<u64>::new());
    assert_eq!(a.all_neighbors()[&42], Vec::<u64>::new());
    assert!(a.find_end_nodes().is_empty());
    assert!(a.partition().is_empty());
    assert_eq!(a.count_nodes(), 1);
}

#[test]
fn branch_and_end_nodes() {
    let a = sample();
    let be = a.find_branch_and_end_nodes();
    assert_eq!(be.ends, vec![4, 6, 7]);
    assert!(be.is_branch(3));
    assert!(be.is_branch(5));
    assert!(!be.is_branch(2));
    assert_eq!(be.branches[&3], 2);

    let mut branches = a.find_branch_nodes();
    branches.sort();
    assert_eq!(branches, vec![3, 5]);
}

#[test]
fn reroot_reverses_the_path_to_the_old_root() {
    let mut a = sample();
    a.reroot(6);
    assert_eq!(a.root(), Some(6));
    assert_eq!(a.parent(5), Some(6));
    assert_eq!(a.parent(3), Some(5));
    assert_eq!(a.parent(2), Some(3));
    assert_eq!(a.parent(1), Some(2));
    assert_eq!(a.parent(4), Some(3));
    assert_eq!(a.parent(6), None);
    assert_eq!(a.count_nodes(), 7);
    assert_eq!(a.find_root(), Some(6));
}

#[test]
fn sub_arbor_keeps_downstream_nodes_only() {
    let a = sample();
    let sub = a.sub_arbor(5);
    assert_eq!(sub.root(), Some(5));
    let mut nodes = sub.nodes_array();
    nodes.sort();
    assert_eq!(nodes, vec![5, 6, 7]);
    assert_eq!(sub.parent(6), Some(5));

    let leaf = a.sub_arbor(4);
    assert_eq!(leaf.nodes_array(), vec![4]);
}

#[test]
fn mutations_refresh_cached_successors() {
    let mut a = sample();
    assert_eq!(a.successors(7), Vec::<u64>::new());
    a.set_edge(8, 7);
    assert_eq!(a.successors(7), vec![8]);
}

#[test]
fn traversal_orders() {
    let a = sample();
    assert_eq!(alg::preorder(&a, 1), vec![1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(alg::postorder(&a, 1), vec![4, 6, 7, 5, 3, 2, 1]);
    assert_eq!(alg::breadth_first(&a, 3), vec![3, 4, 5, 6, 7]);
}

#[test]
fn cable_length_sums_edges() {
    let a = sample();
    assert_eq!(a.cable_length(|_, _| 2.5), 15.0);
}

#[test]
fn remove_edge_detaches_a_leaf() {
    let mut a = sample();
    assert_eq!(a.remove_edge(7), Some(5));
    assert_eq!(a.remove_edge(7), None);
    assert!(!a.contains(7));
    assert_eq!(a.successors(5), vec![6]);
    assert_eq!(a.root(), Some(1));
}
