//! Averaging of per-variable distance matrices and the similarity
//! thresholds derived from the result.
//!
//! Self-distances are zero by construction and carry no information about
//! similarity, so threshold statistics skip the diagonal. Any other entry
//! that is exactly zero is treated the same way (missing), which means a
//! genuinely identical off-diagonal pair does not contribute to the mean
//! or standard deviation.

use log::{debug, info, warn};
use crate::config::subsystems::ClusteringConfig;
use crate::error::{Error, Result};
use crate::types::{DistanceMatrix, SimilarityThresholds, VariableMatrix};

/// Element-wise arithmetic mean of all variable matrices, equal weights.
pub fn aggregate(variables: &[VariableMatrix]) -> Result<DistanceMatrix> {
    let first = variables.first()
        .ok_or_else(|| Error::empty("no distance variables supplied"))?;
    let size = first.matrix.size();
    if size == 0 {
        return Err(Error::empty("distance matrices have no ecoregions"));
    }

    let mut overall = DistanceMatrix::zeros(size);
    for variable in variables {
        if variable.matrix.size() != size {
            return Err(Error::shape(format!(
                "{} distance matrix is {}x{}, expected {}x{}",
                variable.name, variable.matrix.size(), variable.matrix.size(), size, size
            )));
        }
        debug!("- {}", variable.name);
        for i in 0..size {
            for j in 0..size {
                overall.set(i, j, overall.get(i, j) + variable.matrix.get(i, j));
            }
        }
    }

    let count = variables.len() as f64;
    for i in 0..size {
        for j in 0..size {
            overall.set(i, j, overall.get(i, j) / count);
        }
    }
    Ok(overall)
}

/// Mean and population standard deviation of the off-diagonal, non-zero
/// distances, and the lower/upper thresholds built from them. With no such
/// distances every value is NaN, which no distance compares below.
pub fn thresholds(overall: &DistanceMatrix, config: &ClusteringConfig) -> Result<SimilarityThresholds> {
    let size = overall.size();
    let mut sum = 0.0;
    let mut count = 0usize;
    for i in 0..size {
        for j in 0..size {
            let d = overall.get(i, j);
            if i != j && d != 0.0 {
                sum += d;
                count += 1;
            }
        }
    }
    if count == 0 {
        warn!("no non-zero off-diagonal distances; thresholds are undefined and no pairs will be selected");
        return Ok(SimilarityThresholds {
            mean: f64::NAN,
            std: f64::NAN,
            lower: f64::NAN,
            upper: f64::NAN,
        });
    }

    let mean = sum / count as f64;
    let mut sq = 0.0;
    for i in 0..size {
        for j in 0..size {
            let d = overall.get(i, j);
            if i != j && d != 0.0 {
                sq += (d - mean) * (d - mean);
            }
        }
    }
    let std = (sq / count as f64).sqrt();

    let thresholds = SimilarityThresholds {
        mean,
        std,
        lower: mean - config.lower_std_factor * std,
        upper: mean + config.upper_std_factor * std,
    };
    info!(
        "- distance overall mean = {:.3}  std = {:.3}  lower threshold = {:.3}  upper threshold = {:.3}",
        thresholds.mean, thresholds.std, thresholds.lower, thresholds.upper
    );
    Ok(thresholds)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str, rows: Vec<Vec<f64>>) -> VariableMatrix {
        VariableMatrix { name: name.to_string(), matrix: DistanceMatrix::from_rows(rows).unwrap() }
    }

    #[test]
    fn averages_element_wise() {
        let a = var("gdd", vec![vec![0.0, 0.2], vec![0.2, 0.0]]);
        let b = var("frost", vec![vec![0.0, 0.6], vec![0.6, 0.0]]);
        let overall = aggregate(&[a, b]).unwrap();
        assert!((overall.get(0, 1) - 0.4).abs() < 1e-12);
        assert!((overall.get(1, 0) - 0.4).abs() < 1e-12);
        assert_eq!(overall.get(0, 0), 0.0);
        assert_eq!(overall.get(1, 1), 0.0);
    }

    #[test]
    fn symmetric_inputs_give_symmetric_overall() {
        let a = var("a", vec![
            vec![0.0, 0.3, 0.7],
            vec![0.3, 0.0, 0.1],
            vec![0.7, 0.1, 0.0],
        ]);
        let b = var("b", vec![
            vec![0.0, 0.9, 0.2],
            vec![0.9, 0.0, 0.5],
            vec![0.2, 0.5, 0.0],
        ]);
        let overall = aggregate(&[a, b]).unwrap();
        assert_eq!(overall.max_asymmetry(), 0.0);
        for i in 0..3 {
            assert_eq!(overall.get(i, i), 0.0);
        }
    }

    #[test]
    fn rejects_mismatched_shapes() {
        let a = var("a", vec![vec![0.0, 1.0], vec![1.0, 0.0]]);
        let b = var("b", vec![vec![0.0]]);
        assert!(matches!(aggregate(&[a, b]), Err(Error::ShapeMismatch(_))));
    }

    #[test]
    fn rejects_empty_variable_list() {
        assert!(matches!(aggregate(&[]), Err(Error::EmptyInput(_))));
    }

    #[test]
    fn thresholds_ignore_diagonal_content() {
        let config = ClusteringConfig::default();
        let off = |i: usize, j: usize| if (i + j) % 2 == 0 { 0.2 } else { 0.8 };
        let mut zero_diag = DistanceMatrix::zeros(4);
        let mut noisy_diag = DistanceMatrix::zeros(4);
        for i in 0..4 {
            for j in 0..4 {
                if i == j {
                    noisy_diag.set(i, j, 5.0 + i as f64);
                } else {
                    zero_diag.set(i, j, off(i, j));
                    noisy_diag.set(i, j, off(i, j));
                }
            }
        }
        let a = thresholds(&zero_diag, &config).unwrap();
        let b = thresholds(&noisy_diag, &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn thresholds_use_population_std() {
        // off-diagonal entries: 0.1 twice, 0.9 four times
        let m = DistanceMatrix::from_rows(vec![
            vec![0.0, 0.1, 0.9],
            vec![0.1, 0.0, 0.9],
            vec![0.9, 0.9, 0.0],
        ]).unwrap();
        let t = thresholds(&m, &ClusteringConfig::default()).unwrap();
        let mean = (0.1 * 2.0 + 0.9 * 4.0) / 6.0;
        let var = (2.0 * (0.1_f64 - mean).powi(2) + 4.0 * (0.9_f64 - mean).powi(2)) / 6.0;
        assert!((t.mean - mean).abs() < 1e-12);
        assert!((t.std - var.sqrt()).abs() < 1e-12);
        assert!((t.lower - (mean - 1.7 * var.sqrt())).abs() < 1e-12);
        assert!((t.upper - (mean + var.sqrt())).abs() < 1e-12);
    }

    #[test]
    fn all_zero_matrix_gives_undefined_thresholds() {
        let m = DistanceMatrix::zeros(3);
        let t = thresholds(&m, &ClusteringConfig::default()).unwrap();
        assert!(t.mean.is_nan());
        assert!(t.lower.is_nan());
        assert!(t.upper.is_nan());
    }
}
