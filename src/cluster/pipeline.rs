use log::info;
use crate::config::subsystems::ClusteringConfig;
use crate::error::Result;
use crate::input::ClusterInput;
use crate::types::{ClusterList, Diagnostic, SimilarPair, SimilarityThresholds};
use super::{builder, distance, list_clusters, orphans, pairs, repair};

#[derive(Debug, Clone)]
pub struct ClusteringOutcome {
    pub thresholds: SimilarityThresholds,
    pub pairs: Vec<SimilarPair>,
    pub clusters: ClusterList,
    pub diagnostics: Vec<Diagnostic>,
}

/// Runs every stage once, in order: aggregate distances, select similar
/// pairs, grow greedy clusters, repair them, then add orphan singletons.
pub fn run(input: &ClusterInput, config: &ClusteringConfig) -> Result<ClusteringOutcome> {
    input.validate()?;

    info!("analyzing overall paired ecoregion distance measures");
    let overall = distance::aggregate(&input.variables)?;
    let thresholds = distance::thresholds(&overall, config)?;

    let pairs = pairs::select_similar_pairs(&overall, &thresholds, &input.ecoregion_ids)?;

    info!("clustering according to pair similarity");
    let greedy = builder::build_clusters(&pairs);
    list_clusters(&greedy.clusters);

    let repaired = repair::repair(greedy.clusters);

    let clusters = orphans::assign_orphans(repaired.clusters, &input.ecoregion_ids);
    list_clusters(&clusters);
    info!("{} final clusters over {} ecoregions", clusters.len(), input.ecoregion_ids.len());

    let mut diagnostics = greedy.diagnostics;
    diagnostics.extend(repaired.diagnostics);

    Ok(ClusteringOutcome { thresholds, pairs, clusters, diagnostics })
}
