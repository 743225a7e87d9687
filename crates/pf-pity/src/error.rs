//! Error types for the probability engine

use thiserror::Error;

/// Probability engine errors
#[derive(Error, Debug)]
pub enum PityError {
    /// Bad user input, such as a negative item count
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A distribution's total mass is not exactly one.
    /// Always an arithmetic or indexing defect, never a runtime condition.
    #[error("Invariant violation in {stage}: probability mass is {mass}, expected exactly 1")]
    InvariantViolation { stage: String, mass: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Worker threads could not be started
    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}

impl PityError {
    /// True for errors caused by the caller rather than by the engine
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::InvalidConfig(_))
    }
}

impl From<serde_json::Error> for PityError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

impl From<rayon::ThreadPoolBuildError> for PityError {
    fn from(e: rayon::ThreadPoolBuildError) -> Self {
        Self::ThreadPool(e.to_string())
    }
}

impl From<serde_yml::Error> for PityError {
    fn from(e: serde_yml::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// Result type for engine operations
pub type PityResult<T> = Result<T, PityError>;
