//! ecocluster groups ecoregions into clusters by the similarity of their
//! multi-decade climate statistics. It averages per-variable pairwise
//! distance matrices, selects unusually similar pairs, grows clusters from
//! them greedily and repairs the result into a partition of all ecoregions.

// Module declarations
pub mod error;
pub mod types;
pub mod config;
pub mod input;
pub mod cluster;
pub mod report;

// Re-exports
pub use error::{Error, Result};
pub use cluster::{run, ClusteringOutcome};
pub use input::{load_timeseries_dir, ClusterInput};
pub use types::{Cluster, ClusterList, Diagnostic, DistanceMatrix, EcoregionId, VariableMatrix};

// Re-export the config from config module
pub use config::EcoclusterConfig;
