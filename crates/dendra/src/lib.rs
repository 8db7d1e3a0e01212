//! Synapse clustering and axon detection for neuron skeletons.
//!
//! Baseline: CATMAID's `synapse_clustering.js` and the axon helpers of `Arbor.js`.

pub use dendra_arbor as arbor;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod axon;
pub mod error;
pub mod options;
pub mod parser;
pub mod segregation;
pub mod synapse_clustering;

mod util;

pub use arbor::{Arbor, HashMap, HashSet, NodeId};
pub use axon::{
    ArborRegions, Axon, axon_segregation_index, find_arbor_regions, find_axon, find_axon_cut,
};
pub use error::{Error, Result};
pub use options::AnalysisOptions;
pub use parser::{ArborParser, ExportKind};
pub use segregation::{ClusterSynapses, segregation_index};
pub use synapse_clustering::{
    DensityHillMap, DistanceMap, SynapseClustering, cluster_maps, cluster_sizes, clusters,
    distance_map,
};

/// 3D position of every node of an arbor.
pub type Positions<N> = HashMap<N, nalgebra::Point3<f64>>;
