use std::path::PathBuf;
use thiserror::Error;

pub type AnalysisResult<T> = Result<T, AnalysisError>;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Input that cannot be analysed, e.g. a non-positive lower bound.
    #[error("Invalid input for instance '{instance}': {message}")]
    InvalidInput { instance: String, message: String },

    #[error("Missing result file for instance '{instance}': {}", path.display())]
    MissingResult { instance: String, path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl AnalysisError {
    pub fn invalid_input(instance: impl Into<String>, message: impl Into<String>) -> Self {
        AnalysisError::InvalidInput {
            instance: instance.into(),
            message: message.into(),
        }
    }
}
