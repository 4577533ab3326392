// cluster/mod.rs
pub mod distance;
pub mod pairs;
pub mod builder;
pub mod repair;
pub mod orphans;
pub mod pipeline;

use log::{debug, log_enabled, Level};
use crate::types::Cluster;

pub use self::pipeline::{run, ClusteringOutcome};

/// Logs every cluster with its 1-based index and sorted members.
pub fn list_clusters(clusters: &[Cluster]) {
    if !log_enabled!(Level::Debug) {
        return;
    }
    for (k, cluster) in clusters.iter().enumerate() {
        debug!("cluster {} contains {} ecoregions: {}", k + 1, cluster.len(), cluster);
    }
}
