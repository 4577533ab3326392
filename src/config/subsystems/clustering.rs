// src/config/subsystems/clustering.rs

use serde::{Serialize, Deserialize};
use crate::error::{Error, Result};
use crate::config::FromIni;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusteringConfig {
    // lower threshold = mean - lower_std_factor * std
    pub lower_std_factor: f64,
    // upper threshold = mean + upper_std_factor * std (reported only)
    pub upper_std_factor: f64,
    // Leading variable names that label the time axis rather than name a distance matrix
    pub label_variables: usize,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            lower_std_factor: 1.7,
            upper_std_factor: 1.0,
            label_variables: 1,
        }
    }
}

fn parse_factor(key: &str, value: &str) -> Result<f64> {
    match value.parse::<f64>() {
        Ok(factor) if factor.is_finite() && factor >= 0.0 => Ok(factor),
        _ => Err(Error::Config(
            format!("Invalid {} (must be a finite number >= 0): {}", key, value)
        )),
    }
}

impl FromIni for ClusteringConfig {
    fn from_ini_section(&mut self, section_name: &str, key: &str, value: &str) -> Option<Result<()>> {
        if section_name != "clustering" {
            return None;
        }

        match key {
            "lower_std_factor" => Some(parse_factor(key, value).map(|f| self.lower_std_factor = f)),
            "upper_std_factor" => Some(parse_factor(key, value).map(|f| self.upper_std_factor = f)),
            "label_variables" => {
                match value.parse() {
                    Ok(count) => {
                        self.label_variables = count;
                        Some(Ok(()))
                    },
                    Err(_) => Some(Err(Error::Config(
                        format!("Invalid label_variables (must be >= 0): {}", value)
                    ))),
                }
            },
            _ => None,
        }
    }
}

impl ClusteringConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.lower_std_factor.is_finite() || self.lower_std_factor < 0.0 {
            return Err(Error::Config(
                format!("lower_std_factor must be >= 0, got {}", self.lower_std_factor)
            ));
        }
        if !self.upper_std_factor.is_finite() || self.upper_std_factor < 0.0 {
            return Err(Error::Config(
                format!("upper_std_factor must be >= 0, got {}", self.upper_std_factor)
            ));
        }
        Ok(())
    }

    pub fn describe(&self) -> String {
        format!(
            "Clustering configuration:\n\
             - Lower threshold: mean - {} * std\n\
             - Upper threshold: mean + {} * std\n\
             - Label variables skipped: {}",
            self.lower_std_factor,
            self.upper_std_factor,
            self.label_variables
        )
    }
}
