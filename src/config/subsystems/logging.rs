// src/config/subsystems/logging.rs

use serde::{Serialize, Deserialize};
use std::path::PathBuf;
use crate::error::{Error, Result};
use crate::config::FromIni;
use log::LevelFilter;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    // Empty means log to stderr
    pub log_dir: Option<PathBuf>,
    #[serde(skip)]
    level_filter: Option<LevelFilter>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
            level_filter: Some(LevelFilter::Info),
        }
    }
}

pub fn parse_level(value: &str) -> Option<LevelFilter> {
    match value.trim().to_lowercase().as_str() {
        "error" => Some(LevelFilter::Error),
        "warn" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        "none" => Some(LevelFilter::Off),
        _ => None,
    }
}

impl FromIni for LoggingConfig {
    fn from_ini_section(&mut self, section_name: &str, key: &str, value: &str) -> Option<Result<()>> {
        if section_name != "logging" {
            return None;
        }

        match key {
            "level" => Some(self.set_level(value)),
            "log_dir" => {
                let dir = value.trim_matches('"');
                self.log_dir = if dir.is_empty() { None } else { Some(PathBuf::from(dir)) };
                Some(Ok(()))
            },
            _ => None,
        }
    }
}

impl LoggingConfig {
    pub fn set_level(&mut self, value: &str) -> Result<()> {
        match parse_level(value) {
            Some(filter) => {
                self.level = value.trim().to_lowercase();
                self.level_filter = Some(filter);
                Ok(())
            },
            None => Err(Error::Config(
                format!("Invalid log level '{}'. Must be one of: none, error, warn, info, debug, trace", value)
            )),
        }
    }

    pub fn get_log_level(&self) -> LevelFilter {
        if let Some(level) = self.level_filter {
            return level;
        }
        parse_level(&self.level).unwrap_or(LevelFilter::Info)
    }

    pub fn validate(&self) -> Result<()> {
        if parse_level(&self.level).is_none() {
            return Err(Error::Config(format!("Invalid log level '{}'", self.level)));
        }
        Ok(())
    }
}
