use log::{debug, info, warn};
use crate::types::{Cluster, ClusterList, Diagnostic, EcoregionId, SimilarPair};

/// Initial clusters plus any ambiguous assignments made while growing them.
#[derive(Debug, Clone, Default)]
pub struct GreedyClusters {
    pub clusters: ClusterList,
    pub diagnostics: Vec<Diagnostic>,
}

/// Grows clusters from pairs taken in ascending distance order.
///
/// A pair already held together by one cluster is skipped. Otherwise each
/// endpoint is appended to every cluster holding its partner but not
/// itself; when no cluster holds either endpoint the pair opens a new
/// cluster. An endpoint appended to more than one cluster is recorded as
/// an ambiguous assignment and kept in all of them.
pub fn build_clusters(pairs: &[SimilarPair]) -> GreedyClusters {
    let mut result = GreedyClusters::default();

    for pair in pairs {
        let (a, b) = (pair.first, pair.second);
        if result.clusters.iter().any(|c| c.contains(&a) && c.contains(&b)) {
            debug!("- ecoregions {} and {} already clustered together", a, b);
            continue;
        }

        let mut received_a = Vec::new();
        let mut received_b = Vec::new();
        for (k, cluster) in result.clusters.iter_mut().enumerate() {
            let has_a = cluster.contains(&a);
            let has_b = cluster.contains(&b);
            if has_b && !has_a {
                cluster.insert(a);
                received_a.push(k);
            } else if has_a && !has_b {
                cluster.insert(b);
                received_b.push(k);
            }
        }

        let unplaced = received_a.is_empty() && received_b.is_empty();
        record_ambiguity(&mut result.diagnostics, a, received_a);
        record_ambiguity(&mut result.diagnostics, b, received_b);

        if unplaced {
            debug!("- new cluster {} from ecoregions {} and {}", result.clusters.len() + 1, a, b);
            result.clusters.push(Cluster::pair(a, b));
        }
    }

    info!("{} initial clusters from {} similar pairs", result.clusters.len(), pairs.len());
    result
}

fn record_ambiguity(diagnostics: &mut Vec<Diagnostic>, ecoregion: EcoregionId, clusters: Vec<usize>) {
    if clusters.len() > 1 {
        let diagnostic = Diagnostic::AmbiguousAssignment { ecoregion, clusters };
        warn!("- {}", diagnostic);
        diagnostics.push(diagnostic);
    }
}
