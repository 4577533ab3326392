//! Cleanup passes over the greedy cluster list.
//!
//! Each pass runs exactly once, in the order deduplicate, remove subsets,
//! merge overlaps, split overlaps. Passes take the list by value and return
//! the rebuilt list; removals are collected over the full scan and applied
//! afterwards so that indices stay meaningful while comparing.

use std::collections::BTreeSet;
use log::{debug, info, warn};
use crate::types::{Cluster, ClusterList, Diagnostic};
use super::list_clusters;

#[derive(Debug, Clone, Default)]
pub struct RepairOutcome {
    pub clusters: ClusterList,
    pub diagnostics: Vec<Diagnostic>,
}

/// Runs the four passes in their fixed order and reports any overlap that
/// survives the split pass.
pub fn repair(clusters: ClusterList) -> RepairOutcome {
    info!("finding identical clusters");
    let clusters = deduplicate(clusters);
    list_clusters(&clusters);

    info!("finding subset clusters");
    let clusters = remove_subsets(clusters);
    list_clusters(&clusters);

    info!("finding combination possibilities based on overlap");
    let clusters = merge_overlapping(clusters);
    list_clusters(&clusters);

    info!("finding split possibilities based on overlap");
    let clusters = split_overlapping(clusters);
    list_clusters(&clusters);

    let diagnostics = residual_overlaps(&clusters);
    RepairOutcome { clusters, diagnostics }
}

/// Drops every cluster whose member set equals an earlier cluster's.
pub fn deduplicate(clusters: ClusterList) -> ClusterList {
    let mut to_remove = BTreeSet::new();
    for i in 0..clusters.len() {
        for j in (i + 1)..clusters.len() {
            if clusters[i] == clusters[j] {
                debug!("- cluster {} is identical to cluster {}", i + 1, j + 1);
                to_remove.insert(j);
            }
        }
    }
    info!("{} clusters to be removed: {:?}", to_remove.len(), to_remove);
    without(clusters, &to_remove)
}

/// Drops every cluster that is a strict subset of another cluster.
pub fn remove_subsets(clusters: ClusterList) -> ClusterList {
    let mut to_remove = BTreeSet::new();
    for i in 0..clusters.len() {
        for j in (i + 1)..clusters.len() {
            let len_i = clusters[i].len();
            let len_j = clusters[j].len();
            let union_len = clusters[i].union_len(&clusters[j]);
            if len_i == union_len && len_j < union_len {
                debug!("- cluster {} is a subset of cluster {}", j + 1, i + 1);
                to_remove.insert(j);
            } else if len_j == union_len && len_i < union_len {
                debug!("- cluster {} is a subset of cluster {}", i + 1, j + 1);
                to_remove.insert(i);
            }
        }
    }
    info!("{} clusters to be removed: {:?}", to_remove.len(), to_remove);
    without(clusters, &to_remove)
}

/// Merges pairs of clusters whose overlap is more than half of each.
///
/// Merge pairs are found on the incoming list and then applied in scan
/// order. A cluster absorbed by an earlier merge forwards later merges to
/// the cluster that absorbed it, and the surviving cluster is always the
/// one with the lower index.
pub fn merge_overlapping(clusters: ClusterList) -> ClusterList {
    let mut to_combine = Vec::new();
    for i in 0..clusters.len() {
        for j in (i + 1)..clusters.len() {
            let overlap = clusters[i].intersection_len(&clusters[j]);
            debug!("clusters {} and {} overlap on {} ecoregions", i + 1, j + 1, overlap);
            if 2 * overlap > clusters[i].len() && 2 * overlap > clusters[j].len() {
                to_combine.push((i, j));
            }
        }
    }
    info!(
        "{} cluster pairs to be combined: {:?}",
        to_combine.len(),
        to_combine.iter().map(|&(i, j)| (i + 1, j + 1)).collect::<Vec<_>>()
    );
    if to_combine.is_empty() {
        return clusters;
    }

    let mut absorbed_into: Vec<Option<usize>> = vec![None; clusters.len()];

    let mut merged = clusters;
    for (i, j) in to_combine {
        let ti = resolve(&absorbed_into, i);
        let tj = resolve(&absorbed_into, j);
        if ti == tj {
            continue;
        }
        let (keep, drop) = if ti < tj { (ti, tj) } else { (tj, ti) };
        merged[keep] = merged[keep].union(&merged[drop]);
        absorbed_into[drop] = Some(keep);
        debug!("- cluster {} merged into cluster {}", drop + 1, keep + 1);
    }

    merged.into_iter()
        .zip(absorbed_into)
        .filter_map(|(cluster, absorbed)| absorbed.is_none().then_some(cluster))
        .collect()
}

/// Moves every shared set of members out of both clusters into a cluster
/// of its own, appended to the end of the list.
///
/// Only clusters present at the start of the pass take the first position
/// of a comparison. Each one is compared with every later cluster that
/// exists when its turn starts, split-off clusters included, so later
/// comparisons see the effect of earlier splits. Split-off clusters never
/// take the first position, so two of them can still share members after
/// the pass. Clusters left empty are dropped at the end.
pub fn split_overlapping(clusters: ClusterList) -> ClusterList {
    let mut working = clusters;
    let original = working.len();

    for i in 0..original {
        let end = working.len();
        for j in (i + 1)..end {
            let overlap = working[i].intersection(&working[j]);
            debug!("clusters {} and {} overlap on {} ecoregions", i + 1, j + 1, overlap.len());
            if !overlap.is_empty() {
                debug!("- splitting {} from clusters {} and {}", overlap, i + 1, j + 1);
                working[i].remove_all(&overlap);
                working[j].remove_all(&overlap);
                working.push(overlap);
            }
        }
    }

    let before = working.len();
    let working: ClusterList = working.into_iter().filter(|c| !c.is_empty()).collect();
    if working.len() < before {
        info!("{} empty clusters removed after splitting", before - working.len());
    }
    working
}

/// Pairs of clusters that still share members.
pub fn residual_overlaps(clusters: &[Cluster]) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for i in 0..clusters.len() {
        for j in (i + 1)..clusters.len() {
            let shared = clusters[i].intersection(&clusters[j]);
            if !shared.is_empty() {
                let diagnostic = Diagnostic::ResidualOverlap { first: i, second: j, shared: shared.sorted() };
                warn!("- {}", diagnostic);
                diagnostics.push(diagnostic);
            }
        }
    }
    diagnostics
}

fn resolve(absorbed_into: &[Option<usize>], mut k: usize) -> usize {
    while let Some(next) = absorbed_into[k] {
        k = next;
    }
    k
}

fn without(clusters: ClusterList, to_remove: &BTreeSet<usize>) -> ClusterList {
    clusters.into_iter()
        .enumerate()
        .filter(|(k, _)| !to_remove.contains(k))
        .map(|(_, cluster)| cluster)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EcoregionId;

    fn cluster(codes: &[u32]) -> Cluster {
        codes.iter().map(|&c| EcoregionId(c)).collect()
    }

    fn list(groups: &[&[u32]]) -> ClusterList {
        groups.iter().map(|g| cluster(g)).collect()
    }

    #[test]
    fn deduplicate_keeps_first_copy() {
        let out = deduplicate(list(&[&[1, 2], &[3, 4], &[2, 1], &[1, 2]]));
        assert_eq!(out, list(&[&[1, 2], &[3, 4]]));
    }

    #[test]
    fn remove_subsets_drops_either_side() {
        let out = remove_subsets(list(&[&[1, 2], &[1, 2, 3], &[4, 5, 6], &[5, 6]]));
        assert_eq!(out, list(&[&[1, 2, 3], &[4, 5, 6]]));
    }

    #[test]
    fn remove_subsets_handles_nested_chain() {
        let out = remove_subsets(list(&[&[1], &[1, 2], &[1, 2, 3]]));
        assert_eq!(out, list(&[&[1, 2, 3]]));
    }

    #[test]
    fn merge_combines_majority_overlap() {
        let out = merge_overlapping(list(&[&[1, 2, 3], &[2, 3, 4]]));
        assert_eq!(out, list(&[&[1, 2, 3, 4]]));
    }

    #[test]
    fn merge_requires_more_than_half_of_both() {
        // overlap of 2 is exactly half of the 4-member cluster
        let input = list(&[&[1, 2, 3], &[2, 3, 4, 5]]);
        assert_eq!(merge_overlapping(input.clone()), input);
    }

    #[test]
    fn merge_follows_absorbed_clusters() {
        let out = merge_overlapping(list(&[&[1, 2, 3], &[9], &[2, 3, 4], &[2, 3, 5]]));
        assert_eq!(out, list(&[&[1, 2, 3, 4, 5], &[9]]));
    }

    #[test]
    fn split_moves_overlap_to_new_cluster() {
        let out = split_overlapping(list(&[&[1, 2, 3], &[3, 4, 5]]));
        assert_eq!(out, list(&[&[1, 2], &[4, 5], &[3]]));
        assert!(residual_overlaps(&out).is_empty());
    }

    #[test]
    fn split_drops_emptied_clusters() {
        let out = split_overlapping(list(&[&[1, 2], &[1, 2, 3], &[3, 4]]));
        // (1,2): {1,2} split off, cluster 1 empty; (2,3): {3} split off
        assert_eq!(out, list(&[&[4], &[1, 2], &[3]]));
    }

    #[test]
    fn split_off_clusters_are_compared_with_later_clusters() {
        let out = split_overlapping(list(&[&[1, 2], &[1, 3], &[1, 4]]));
        // (1,2) splits {1}; (3,4) then splits {1} out of cluster 3 again
        assert_eq!(out, list(&[&[2], &[3], &[4], &[1]]));
        assert!(residual_overlaps(&out).is_empty());
    }

    #[test]
    fn overlap_between_split_off_clusters_is_left_as_residual() {
        let out = split_overlapping(list(&[&[1, 2], &[1, 3], &[1, 4], &[1, 5]]));
        // {1} is split from (1,2) and again from (3,4); the two pieces are never compared
        assert_eq!(out, list(&[&[2], &[3], &[4], &[5], &[1], &[1]]));
        let residual = residual_overlaps(&out);
        assert_eq!(
            residual,
            vec![Diagnostic::ResidualOverlap { first: 4, second: 5, shared: vec![EcoregionId(1)] }]
        );
    }

    #[test]
    fn repaired_list_has_no_duplicates_or_subsets() {
        let outcome = repair(list(&[
            &[1, 2], &[2, 1], &[1, 2, 3], &[5, 6], &[6, 7], &[8, 9, 10], &[9, 10, 11],
        ]));
        let clusters = &outcome.clusters;
        for i in 0..clusters.len() {
            for j in 0..clusters.len() {
                if i == j {
                    continue;
                }
                assert_ne!(clusters[i], clusters[j]);
                let union = clusters[i].union_len(&clusters[j]);
                assert!(!(union == clusters[j].len() && clusters[i].len() < union));
            }
        }
        assert!(outcome.diagnostics.is_empty());
    }
}
