pub mod clustering;
pub mod logging;

pub use clustering::ClusteringConfig;
pub use logging::LoggingConfig;
