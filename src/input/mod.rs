//! The boundary between upstream time-series analysis and the clustering
//! engine: an ordered ecoregion list and one distance matrix per variable.

pub mod csv_dir;

use ahash::AHashSet;
use log::warn;
use crate::error::{Error, Result};
use crate::types::{EcoregionId, VariableMatrix};

pub use self::csv_dir::load_timeseries_dir;

// Mirrored entries further apart than this are reported as asymmetric
const ASYMMETRY_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Default)]
pub struct ClusterInput {
    pub ecoregion_ids: Vec<EcoregionId>,
    pub variables: Vec<VariableMatrix>,
}

impl ClusterInput {
    pub fn new(ecoregion_ids: Vec<EcoregionId>, variables: Vec<VariableMatrix>) -> Self {
        Self { ecoregion_ids, variables }
    }

    /// Checks everything the clustering stages rely on. Asymmetric
    /// matrices are only warned about.
    pub fn validate(&self) -> Result<()> {
        if self.ecoregion_ids.is_empty() {
            return Err(Error::empty("no ecoregion IDs"));
        }
        if self.variables.is_empty() {
            return Err(Error::empty("no distance variables"));
        }

        let mut seen = AHashSet::with_capacity(self.ecoregion_ids.len());
        for id in &self.ecoregion_ids {
            if !seen.insert(*id) {
                return Err(Error::parse(format!("duplicate ecoregion ID {}", id)));
            }
        }

        let n = self.ecoregion_ids.len();
        for variable in &self.variables {
            let size = variable.matrix.size();
            if size != n {
                return Err(Error::shape(format!(
                    "{} distance matrix is {}x{} but there are {} ecoregions",
                    variable.name, size, size, n
                )));
            }
            for i in 0..size {
                for j in 0..size {
                    let d = variable.matrix.get(i, j);
                    if !d.is_finite() || d < 0.0 {
                        return Err(Error::parse(format!(
                            "{} distance at ({}, {}) must be a finite non-negative number, got {}",
                            variable.name, i, j, d
                        )));
                    }
                }
            }
            let asymmetry = variable.matrix.max_asymmetry();
            if asymmetry > ASYMMETRY_TOLERANCE {
                warn!("{} distance matrix is not symmetric (max difference {:.3e})", variable.name, asymmetry);
            }
        }
        Ok(())
    }
}
