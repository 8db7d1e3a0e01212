use dendra_arbor::{Arbor, HashSet};

fn y_shape() -> Arbor<u64> {
    // Root 1, trunk 1-2, long branch 2-3-4-5, short branch 2-6.
    let mut a = Arbor::new();
    a.add_edges([(2, 1), (3, 2), (4, 3), (5, 4), (6, 2)]);
    a
}

#[test]
fn first_partition_runs_from_deepest_end_to_root() {
    let partitions = y_shape().partition();
    assert_eq!(partitions[0], vec![5, 4, 3, 2, 1]);
    assert_eq!(partitions[1], vec![6, 2]);
}

#[test]
fn partition_sorted_is_shortest_first() {
    let partitions = y_shape().partition_sorted();
    assert_eq!(partitions, vec![vec![6, 2], vec![5, 4, 3, 2, 1]]);
}

#[test]
fn partitions_cover_every_edge_once() {
    let mut a: Arbor<u64> = Arbor::new();
    a.add_edges([
        (2, 1),
        (3, 2),
        (4, 3),
        (5, 3),
        (6, 5),
        (7, 5),
        (8, 2),
        (9, 8),
        (10, 1),
    ]);

    let mut edges: HashSet<(u64, u64)> = HashSet::default();
    for p in a.partition_sorted() {
        assert!(p.len() >= 2);
        for pair in p.windows(2) {
            assert_eq!(a.parent(pair[0]), Some(pair[1]));
            assert!(edges.insert((pair[0], pair[1])), "edge covered twice");
        }
    }
    assert_eq!(edges.len(), a.edge_count());
}

#[test]
fn equal_depth_ends_tie_by_node_id() {
    let mut a: Arbor<u64> = Arbor::new();
    a.add_edges([(30, 1), (20, 1)]);
    assert_eq!(a.partition(), vec![vec![20, 1], vec![30, 1]]);
}
