pub mod file;
pub mod subsystems;

use serde::{Serialize, Deserialize};
use std::path::Path;
use std::fs;
use crate::error::Result;
use log::{warn, trace};

pub trait FromIni {
    fn from_ini_section(&mut self, section_name: &str, key: &str, value: &str) -> Option<Result<()>>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EcoclusterConfig {
    // File paths and analysis period
    pub files: file::FileConfig,

    // Subsystem configs
    pub clustering: subsystems::ClusteringConfig,
    pub logging: subsystems::LoggingConfig,
}

impl EcoclusterConfig {
    pub fn validate(&self) -> Result<()> {
        self.files.validate()?;
        self.clustering.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    pub fn from_ini<P: AsRef<Path>>(path: P) -> Result<Self> {
        if !path.as_ref().exists() {
            return Err(crate::error::Error::InputNotFound(path.as_ref().to_path_buf()));
        }
        trace!("Loading configuration from: {:?}", path.as_ref());

        let content = fs::read_to_string(&path)?;
        let config = Self::from_ini_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses INI text on top of the defaults without validating.
    pub fn from_ini_str(content: &str) -> Result<Self> {
        let mut config = Self::default();
        let mut current_section = String::new();

        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                current_section = line[1..line.len()-1].trim().to_string();
                trace!("  Line {}: Found section: [{}]", line_num + 1, current_section);
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                let value = value.trim();

                if let Some(result) = match current_section.as_str() {
                    "files" => config.files.from_ini_section(&current_section, key, value),
                    "clustering" => config.clustering.from_ini_section(&current_section, key, value),
                    "logging" => config.logging.from_ini_section(&current_section, key, value),
                    _ => None,
                } {
                    if let Err(e) = result {
                        warn!("Error processing config key {}={}: {}", key, value, e);
                    }
                } else {
                    warn!("Unrecognized config key: {}={} in section [{}]", key, value, current_section);
                }
            } else {
                warn!("Ignoring malformed config line {}: {}", line_num + 1, line);
            }
        }

        Ok(config)
    }
}
