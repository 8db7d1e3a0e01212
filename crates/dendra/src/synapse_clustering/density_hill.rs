use super::{DensityHillMap, SynapseClustering, density};
use crate::arbor::{Arbor, HashMap, HashSet, NodeId, alg};
use crate::util::{timing_report, timing_start};

impl<N: NodeId> SynapseClustering<'_, N> {
    /// Assign every node to a density hill.
    ///
    /// Partitions are walked longest first, each from its tail (a branch node or the root, always
    /// visited already) toward its end node, so no hill is ever entered from two sides. A node
    /// with more than one strictly denser neighbor is a saddle: its children that are not downhill
    /// open new clusters, and the saddle plus its downhill neighbors join the cluster of the
    /// steepest uphill neighbor. Gradient ties go to the lowest node ID.
    ///
    /// Cluster indices are finally renumbered in breadth-first order from the root, so the root
    /// is in cluster 0 and indices are dense.
    pub fn density_hill_map(&self) -> DensityHillMap<N> {
        let start = timing_start();
        let density = density(&self.ds, self.lambda);
        let dens = |n: N| density.get(&n).copied().unwrap_or(0.0);
        let to_root = |n: N| self.distances_to_root.get(&n).copied().unwrap_or(0.0);

        let mut map: DensityHillMap<N> = HashMap::default();
        let Some(root) = self.arbor.root() else {
            return map;
        };
        map.insert(root, 0);

        let neighbors = self.arbor.all_neighbors();
        let mut visited: HashSet<N> = HashSet::default();
        let mut max_index = 0usize;
        let mut saddles = 0usize;

        for partition in self.partitions.iter().rev() {
            if partition.len() < 2 {
                continue;
            }
            let last = partition.len() - 1;
            let mut hill = map
                .get(&partition[last - 1])
                .or_else(|| map.get(&partition[last]))
                .copied()
                .unwrap_or(0);

            for index in (0..=last).rev() {
                let node = partition[index];
                // Tails were settled by the longer partition that passes through them.
                if !visited.insert(node) {
                    continue;
                }
                map.insert(node, hill);

                let adjacent = match neighbors.get(&node) {
                    Some(adjacent) if adjacent.len() > 1 => adjacent,
                    _ => continue,
                };
                let own = dens(node);
                let uphill = adjacent.iter().filter(|&&id| dens(id) - own > 0.0).count();
                if uphill < 2 {
                    continue;
                }
                saddles += 1;

                let parent = self.arbor.parent(node);
                for &id in adjacent {
                    if Some(id) == parent || dens(id) - own < 0.0 {
                        continue;
                    }
                    max_index += 1;
                    map.insert(id, max_index);
                }

                let here = to_root(node);
                let mut steepest: Option<(N, f64)> = None;
                for &id in adjacent {
                    let m = gradient(dens(id) - own, (to_root(id) - here).abs());
                    if m.is_nan() || m <= 0.0 {
                        continue;
                    }
                    let better = match steepest {
                        None => true,
                        Some((best, best_m)) => m > best_m || (m == best_m && id < best),
                    };
                    if better {
                        steepest = Some((id, m));
                    }
                }

                if let Some(cluster) = steepest.and_then(|(id, _)| map.get(&id).copied()) {
                    map.insert(node, cluster);
                    for &id in adjacent {
                        if dens(id) - own < 0.0 {
                            map.insert(id, cluster);
                        }
                    }
                }

                if index > 0 {
                    hill = map.get(&partition[index - 1]).copied().unwrap_or(hill);
                }
            }
        }

        let map = relabel_breadth_first(self.arbor, root, map);
        tracing::debug!(
            saddles,
            clusters = map.values().copied().max().map_or(0, |m| m + 1),
            "computed density hill map"
        );
        timing_report("density_hill_map", start);
        map
    }
}

/// Density change per unit of cable. A zero-length step uphill is infinitely steep.
fn gradient(delta: f64, run: f64) -> f64 {
    if run > 0.0 {
        delta / run
    } else if delta > 0.0 {
        f64::INFINITY
    } else {
        f64::NAN
    }
}

fn relabel_breadth_first<N: NodeId>(
    arbor: &Arbor<N>,
    root: N,
    map: DensityHillMap<N>,
) -> DensityHillMap<N> {
    let mut labels: HashMap<usize, usize> = HashMap::default();
    let mut out: DensityHillMap<N> = HashMap::default();
    for node in alg::breadth_first(arbor, root) {
        let Some(&old) = map.get(&node) else {
            continue;
        };
        let next = labels.len();
        out.insert(node, *labels.entry(old).or_insert(next));
    }
    out
}
