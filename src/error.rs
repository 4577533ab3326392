use thiserror::Error;
use std::io;
use std::path::PathBuf;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Input not found: {0:?}")]
    InputNotFound(PathBuf),

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// Type alias for Result
pub type Result<T> = std::result::Result<T, Error>;

// Helper functions for common error conversions
impl Error {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    pub fn shape<S: Into<String>>(msg: S) -> Self {
        Error::ShapeMismatch(msg.into())
    }

    pub fn empty<S: Into<String>>(msg: S) -> Self {
        Error::EmptyInput(msg.into())
    }

    pub fn parse<S: Into<String>>(msg: S) -> Self {
        Error::Parse(msg.into())
    }
}
