// src/config/file.rs

use serde::{Serialize, Deserialize};
use std::path::PathBuf;
use crate::error::{Error, Result};
use super::FromIni;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    pub analyses_dir: PathBuf,
    pub year_begin: i32,
    pub year_end: i32,
    // Write the JSON summary next to the text report
    pub write_summary: bool,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            analyses_dir: PathBuf::from("./analyses"),
            year_begin: 1984,
            year_end: 2013,
            write_summary: true,
        }
    }
}

impl FromIni for FileConfig {
    fn from_ini_section(&mut self, _section_name: &str, key: &str, value: &str) -> Option<Result<()>> {
        match key {
            "analyses_dir" => {
                self.analyses_dir = PathBuf::from(value.trim_matches('"'));
                Some(Ok(()))
            },
            "year_begin" => {
                match value.parse() {
                    Ok(year) => {
                        self.year_begin = year;
                        Some(Ok(()))
                    },
                    Err(_) => Some(Err(Error::Config(
                        format!("Invalid year_begin: {}", value)
                    ))),
                }
            },
            "year_end" => {
                match value.parse() {
                    Ok(year) => {
                        self.year_end = year;
                        Some(Ok(()))
                    },
                    Err(_) => Some(Err(Error::Config(
                        format!("Invalid year_end: {}", value)
                    ))),
                }
            },
            "write_summary" => {
                match value.parse() {
                    Ok(flag) => {
                        self.write_summary = flag;
                        Some(Ok(()))
                    },
                    Err(_) => Some(Err(Error::Config(
                        format!("Invalid write_summary value (must be true/false): {}", value)
                    ))),
                }
            },
            _ => None,
        }
    }
}

impl FileConfig {
    pub fn validate(&self) -> Result<()> {
        if self.year_end < self.year_begin {
            return Err(Error::Config(
                format!("year_end ({}) is before year_begin ({})", self.year_end, self.year_begin)
            ));
        }
        Ok(())
    }

    fn period(&self) -> String {
        format!("{}-{}", self.year_begin, self.year_end)
    }

    /// Directory holding the ID list, variable names and distance matrices.
    pub fn timeseries_dir(&self) -> PathBuf {
        self.analyses_dir.join(format!("{}_ecoregion_timeseries", self.period()))
    }

    pub fn report_path(&self) -> PathBuf {
        self.analyses_dir.join(format!("{}_ecoregion_clusters.txt", self.period()))
    }

    pub fn summary_path(&self) -> PathBuf {
        self.analyses_dir.join(format!("{}_ecoregion_clusters.json", self.period()))
    }
}
