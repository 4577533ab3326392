use ahash::AHashSet;
use log::info;
use crate::types::{Cluster, ClusterList, EcoregionId};

/// Appends a singleton cluster for every known ecoregion that no cluster
/// contains. Orphans are appended in the order of `known`.
pub fn assign_orphans(mut clusters: ClusterList, known: &[EcoregionId]) -> ClusterList {
    let clustered: AHashSet<EcoregionId> = clusters.iter()
        .flat_map(|c| c.iter().copied())
        .collect();

    let mut full_set: Vec<EcoregionId> = clustered.iter().copied().collect();
    full_set.sort_unstable();
    info!("full cluster set contains {} ecoregions: {:?}", full_set.len(),
        full_set.iter().map(|id| id.0).collect::<Vec<_>>());

    let missing: Vec<EcoregionId> = known.iter()
        .filter(|id| !clustered.contains(*id))
        .copied()
        .collect();
    info!("- missing {} ecoregions from total set: {:?}", missing.len(),
        missing.iter().map(|id| id.0).collect::<Vec<_>>());

    if !missing.is_empty() {
        info!("-- adding each as singleton clusters");
        clusters.extend(missing.into_iter().map(Cluster::singleton));
    }
    clusters
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(codes: &[u32]) -> Vec<EcoregionId> {
        codes.iter().map(|&c| EcoregionId(c)).collect()
    }

    #[test]
    fn missing_ecoregions_become_singletons() {
        let clusters = vec![ids(&[1, 2]).into_iter().collect::<Cluster>()];
        let out = assign_orphans(clusters, &ids(&[5, 1, 2, 3]));
        assert_eq!(out.len(), 3);
        assert_eq!(out[1], Cluster::singleton(EcoregionId(5)));
        assert_eq!(out[2], Cluster::singleton(EcoregionId(3)));
    }

    #[test]
    fn nothing_added_when_all_clustered() {
        let clusters = vec![ids(&[1, 2, 3]).into_iter().collect::<Cluster>()];
        let out = assign_orphans(clusters.clone(), &ids(&[1, 2, 3]));
        assert_eq!(out, clusters);
    }

    #[test]
    fn no_clusters_gives_all_singletons() {
        let out = assign_orphans(Vec::new(), &ids(&[4, 8]));
        assert_eq!(out, vec![Cluster::singleton(EcoregionId(4)), Cluster::singleton(EcoregionId(8))]);
    }
}
