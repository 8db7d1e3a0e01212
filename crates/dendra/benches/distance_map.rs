use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use dendra::arbor::{Arbor, HashMap};
use dendra::{Positions, SynapseClustering};
use nalgebra::Point3;
use std::hint::black_box;
use std::time::Duration;

#[derive(Debug, Clone)]
struct CombSkeleton {
    arbor: Arbor<u64>,
    positions: Positions<u64>,
    synapses: HashMap<u64, u32>,
}

/// A comb: a backbone of `spine` nodes with a side branch of `branch_len` nodes every
/// `every` nodes, and a synapse every `synapse_every` nodes.
fn build_comb(spine: u64, every: u64, branch_len: u64, synapse_every: u64) -> CombSkeleton {
    let mut arbor = Arbor::new();
    let mut positions: Positions<u64> = HashMap::default();
    let mut synapses: HashMap<u64, u32> = HashMap::default();
    let mut next = spine;

    positions.insert(0, Point3::origin());
    for i in 1..spine {
        arbor.set_edge(i, i - 1);
        positions.insert(i, Point3::new(i as f64 * 100.0, 0.0, 0.0));
        if i % every == 0 {
            let mut parent = i;
            for j in 1..=branch_len {
                arbor.set_edge(next, parent);
                positions.insert(next, Point3::new(i as f64 * 100.0, j as f64 * 100.0, 0.0));
                parent = next;
                next += 1;
            }
        }
    }
    arbor.set_root(0);
    for node in arbor.nodes_array() {
        if node % synapse_every == 0 {
            synapses.insert(node, 1);
        }
    }

    CombSkeleton {
        arbor,
        positions,
        synapses,
    }
}

fn bench_synapse_clustering(c: &mut Criterion) {
    let mut group = c.benchmark_group("synapse_clustering");
    group.measurement_time(Duration::from_secs(10));

    let cases = [
        ("comb_1k", build_comb(1_000, 10, 20, 7)),
        ("comb_5k", build_comb(5_000, 25, 40, 11)),
    ];

    for (name, skeleton) in &cases {
        group.bench_with_input(BenchmarkId::new("new", name), skeleton, |b, skeleton| {
            b.iter(|| {
                let sc = SynapseClustering::new(
                    black_box(&skeleton.arbor),
                    &skeleton.positions,
                    &skeleton.synapses,
                    1000.0,
                );
                black_box(sc.distance_map().len());
            })
        });

        let sc = SynapseClustering::new(
            &skeleton.arbor,
            &skeleton.positions,
            &skeleton.synapses,
            1000.0,
        );
        group.bench_with_input(BenchmarkId::new("density_hill_map", name), &sc, |b, sc| {
            b.iter(|| black_box(sc.density_hill_map().len()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_synapse_clustering);
criterion_main!(benches);
