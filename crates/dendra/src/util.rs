//! Small helpers shared across modules.

use crate::{NodeId, Positions};
use std::time::Instant;

/// `DENDRA_TIMING=1` (or `true`) prints per-stage timings to stderr.
pub(crate) fn timing_start() -> Option<Instant> {
    let enabled = std::env::var("DENDRA_TIMING")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    enabled.then(Instant::now)
}

pub(crate) fn timing_report(stage: &str, start: Option<Instant>) {
    if let Some(start) = start {
        eprintln!("[dendra-timing] {stage}={:?}", start.elapsed());
    }
}

/// Euclidean distance between two nodes. Nodes without a position are treated as coincident.
pub(crate) fn node_distance<N: NodeId>(positions: &Positions<N>, a: N, b: N) -> f64 {
    match (positions.get(&a), positions.get(&b)) {
        (Some(pa), Some(pb)) => nalgebra::distance(pa, pb),
        _ => 0.0,
    }
}
