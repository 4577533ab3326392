use log::{debug, info};
use crate::error::{Error, Result};
use crate::types::{DistanceMatrix, EcoregionId, SimilarPair, SimilarityThresholds};

/// Every unordered pair of distinct ecoregions whose overall distance is
/// strictly below the lower threshold, sorted by ascending distance.
///
/// The upper triangle is scanned row-major and the sort is stable, so equal
/// distances keep their scan order.
pub fn select_similar_pairs(
    overall: &DistanceMatrix,
    thresholds: &SimilarityThresholds,
    ecoregion_ids: &[EcoregionId],
) -> Result<Vec<SimilarPair>> {
    let size = overall.size();
    if ecoregion_ids.len() != size {
        return Err(Error::shape(format!(
            "{} ecoregion IDs for a {}x{} distance matrix",
            ecoregion_ids.len(), size, size
        )));
    }

    let mut pairs = Vec::new();
    for i in 0..size {
        for j in (i + 1)..size {
            let distance = overall.get(i, j);
            if distance < thresholds.lower {
                debug!(
                    "- similarity: ecoregions {} and {} are overall similar with D = {:.3}",
                    ecoregion_ids[i], ecoregion_ids[j], distance
                );
                pairs.push(SimilarPair {
                    distance,
                    first: ecoregion_ids[i],
                    second: ecoregion_ids[j],
                });
            }
        }
    }

    pairs.sort_by(|a, b| a.distance.total_cmp(&b.distance));

    info!("{} similar pairs below lower threshold {:.3}", pairs.len(), thresholds.lower);
    for pair in &pairs {
        debug!("  ({:.3}, {}, {})", pair.distance, pair.first, pair.second);
    }
    Ok(pairs)
}
