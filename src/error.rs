use std::fmt;
use std::fmt::Display;
use std::io;

/// Failures surfaced at the kernel's fallible edges. A running simulation is
/// infallible; errors arise only while loading parameters or writing reports.
#[derive(Debug)]
pub enum EpisimError {
    IoError(io::Error),
    JsonError(serde_json::Error),
    CsvError(csv::Error),
    /// A parameter value failed validation.
    Validation(String),
}

impl From<io::Error> for EpisimError {
    fn from(error: io::Error) -> Self {
        EpisimError::IoError(error)
    }
}

impl From<serde_json::Error> for EpisimError {
    fn from(error: serde_json::Error) -> Self {
        EpisimError::JsonError(error)
    }
}

impl From<csv::Error> for EpisimError {
    fn from(error: csv::Error) -> Self {
        EpisimError::CsvError(error)
    }
}

impl Display for EpisimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EpisimError::IoError(error) => write!(f, "IO error: {error}"),
            EpisimError::JsonError(error) => write!(f, "JSON error: {error}"),
            EpisimError::CsvError(error) => write!(f, "CSV error: {error}"),
            EpisimError::Validation(message) => write!(f, "invalid parameters: {message}"),
        }
    }
}

impl std::error::Error for EpisimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EpisimError::IoError(error) => Some(error),
            EpisimError::JsonError(error) => Some(error),
            EpisimError::CsvError(error) => Some(error),
            EpisimError::Validation(_) => None,
        }
    }
}
