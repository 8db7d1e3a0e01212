use dendra::arbor::{Arbor, HashMap};
use dendra::{Positions, SynapseClustering, cluster_maps, cluster_sizes, clusters};
use nalgebra::Point3;

fn positions(entries: &[(u64, f64)]) -> Positions<u64> {
    entries
        .iter()
        .map(|&(n, x)| (n, Point3::new(x, 0.0, 0.0)))
        .collect()
}

fn synapses(entries: &[(u64, u32)]) -> HashMap<u64, u32> {
    entries.iter().copied().collect()
}

/// 1 - 2 - 3 - 4 - 5 rooted at 1, one unit apart.
fn line5() -> (Arbor<u64>, Positions<u64>) {
    let mut a = Arbor::new();
    a.add_path(&[1, 2, 3, 4, 5]);
    let p = positions(&[(1, 0.0), (2, 1.0), (3, 2.0), (4, 3.0), (5, 4.0)]);
    (a, p)
}

/// Root 10 with leaves 1 and 2 on either side.
fn star(edges: [(u64, u64); 2]) -> (Arbor<u64>, Positions<u64>) {
    let mut a = Arbor::new();
    a.add_edges(edges);
    let p = positions(&[(10, 0.0), (1, 1.0), (2, -1.0)]);
    (a, p)
}

#[test]
fn single_synapse_gives_a_single_cluster() {
    let mut a = Arbor::new();
    a.add_path(&[1, 2, 3]);
    let p = positions(&[(1, 0.0), (2, 1.0), (3, 2.0)]);
    let sc = SynapseClustering::new(&a, &p, &synapses(&[(3, 1)]), 1.0);
    let map = sc.density_hill_map();
    assert_eq!(map.len(), 3);
    assert!(map.values().all(|&c| c == 0));
}

#[test]
fn saddle_between_two_hills_splits_the_line() {
    let (a, p) = line5();
    let sc = SynapseClustering::new(&a, &p, &synapses(&[(1, 1), (5, 1)]), 1.0);
    let map = sc.density_hill_map();

    // Node 3 is the saddle; both uphill neighbors are equally steep, so it joins the lower ID.
    let c = clusters(&map);
    assert_eq!(c.len(), 2);
    assert_eq!(c[&0], vec![1, 2, 3]);
    assert_eq!(c[&1], vec![4, 5]);
}

#[test]
fn root_saddle_with_tied_gradients_joins_the_lowest_id() {
    let (a, p) = star([(1, 10), (2, 10)]);
    let sc = SynapseClustering::new(&a, &p, &synapses(&[(1, 1), (2, 1)]), 1.0);
    let map = sc.density_hill_map();
    assert_eq!(map[&10], 0);
    assert_eq!(map[&1], 0);
    assert_eq!(map[&2], 1);
}

#[test]
fn result_does_not_depend_on_edge_insertion_order() {
    let syn = synapses(&[(1, 1), (2, 1)]);
    let (a, p) = star([(1, 10), (2, 10)]);
    let (b, q) = star([(2, 10), (1, 10)]);
    let first = SynapseClustering::new(&a, &p, &syn, 1.0).density_hill_map();
    let second = SynapseClustering::new(&b, &q, &syn, 1.0).density_hill_map();
    assert_eq!(first, second);

    let sc = SynapseClustering::new(&a, &p, &syn, 1.0);
    assert_eq!(sc.density_hill_map(), sc.density_hill_map());
}

#[test]
fn no_synapses_leaves_everything_in_cluster_zero() {
    let (a, p) = line5();
    let sc = SynapseClustering::new(&a, &p, &HashMap::default(), 1.0);
    let map = sc.density_hill_map();
    assert_eq!(map.len(), 5);
    assert!(map.values().all(|&c| c == 0));
}

#[test]
fn isolated_root_is_cluster_zero() {
    let a: Arbor<u64> = Arbor::with_root(3);
    let p = positions(&[(3, 0.0)]);
    let map = SynapseClustering::new(&a, &p, &synapses(&[(3, 2)]), 1.0).density_hill_map();
    assert_eq!(map.len(), 1);
    assert_eq!(map[&3], 0);
}

#[test]
fn cluster_views_agree() {
    let (a, p) = line5();
    let sc = SynapseClustering::new(&a, &p, &synapses(&[(1, 1), (5, 1)]), 1.0);
    let map = sc.density_hill_map();

    let sizes = cluster_sizes(&map);
    assert_eq!(sizes.values().sum::<usize>(), a.count_nodes());
    assert_eq!(sizes[&0], 3);
    assert_eq!(sizes[&1], 2);

    let maps = cluster_maps(&map);
    assert!(maps[&1].contains(&4));
    assert!(maps[&1].contains(&5));
    assert!(!maps[&0].contains(&4));

    let lists = clusters(&map);
    assert!(lists.keys().eq(maps.keys()));
    assert!(lists.keys().eq(sizes.keys()));
    for (cluster, members) in &maps {
        assert_eq!(members.len(), sizes[cluster]);
        assert_eq!(lists[cluster].len(), sizes[cluster]);
    }
}

#[test]
fn density_sums_gaussian_contributions() {
    let (a, p) = line5();
    let sc = SynapseClustering::new(&a, &p, &synapses(&[(5, 1)]), 2.0);
    let density = sc.density();
    assert_eq!(density[&5], 1.0);
    assert!((density[&4] - (-0.25_f64).exp()).abs() < 1e-12);
    assert!(density[&4] > density[&3]);
}

#[test]
fn density_without_synapses_nearby_is_positive_zero() {
    let (a, p) = line5();
    let sc = SynapseClustering::new(&a, &p, &synapses(&[(5, 1)]), 0.1);
    let density = sc.density();
    assert!(sc.distance_map()[&1].is_empty());
    assert_eq!(density[&1], 0.0);
    assert!(density[&1].is_sign_positive());
}
