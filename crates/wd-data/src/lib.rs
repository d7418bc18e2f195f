//! Data handling for the wing-disc dashboard
//!
//! Loads the three tables produced by the upstream preparation pipeline:
//! per-disc morphometrics, long-form gradient profiles, and adult wing
//! landmark coordinates.

pub mod config;
pub mod schema;
pub mod sources;

use tokio::task::JoinError;
use thiserror::Error;

// Re-exports
pub use config::DashboardConfig;
pub use sources::{
    Curve, CurvePoint, DiscRecord, Landmark, LandmarkSource, LandmarkSpecimen, MorphometricsSource,
    ProfileSample, ProfileSource, ProfileTable, WING_CONNECTIONS,
};

/// Errors that can occur in data operations
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(String),

    #[error("Missing column '{column}' in {table}")]
    MissingColumn { table: &'static str, column: String },

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Join error: {0}")]
    Join(#[from] JoinError),
}

impl From<csv::Error> for DataError {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Io(io_err) => DataError::Io(std::io::Error::new(io_err.kind(), error.to_string())),
            _ => DataError::Csv(error.to_string()),
        }
    }
}
