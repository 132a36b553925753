// Central error type for query failures

use thiserror::Error;

/// Failure of a hardware, network or filesystem query
///
/// Command execution never produces this type: a command that cannot run is
/// reported through [`crate::domain::ExecutionResult`] instead.
#[derive(Error, Debug)]
pub enum HostError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl HostError {
    /// Wrap an IO error, mapping `NotFound` onto the dedicated variant
    pub fn from_io(context: impl std::fmt::Display, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            HostError::NotFound(format!("{}: {}", context, err))
        } else {
            HostError::Io(std::io::Error::new(
                err.kind(),
                format!("{}: {}", context, err),
            ))
        }
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            HostError::NotFound(_) => true,
            HostError::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

/// Result type alias using HostError
pub type Result<T> = std::result::Result<T, HostError>;
