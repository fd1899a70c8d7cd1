//! Error types for the metadata pipeline.

use thiserror::Error;

/// Main error type for pipeline operations.
///
/// Everything here is fatal to the run. Per-row apply failures are *not*
/// errors in this sense; they are counted in the run report (see
/// [`crate::apply::ApplyFailure`]).
#[derive(Error, Debug)]
pub enum TabmetaError {
    /// Configuration error (invalid YAML, missing fields, malformed workdir, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The tabular source cannot be read or parsed.
    #[error("Source error: {0}")]
    Source(String),

    /// Object store error outside the per-row apply path (session setup,
    /// snapshot files, search during part resolution).
    #[error("Store error: {0}")]
    Store(String),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Process exit codes used by the CLI.
pub const EXIT_CONFIG_ERROR: u8 = 1;
/// At least one row failed to apply; the run itself completed.
pub const EXIT_PARTIAL_FAILURE: u8 = 2;
pub const EXIT_SOURCE_ERROR: u8 = 3;
pub const EXIT_STORE_ERROR: u8 = 4;
pub const EXIT_IO_ERROR: u8 = 7;

impl TabmetaError {
    /// Create a Config error.
    pub fn config(message: impl Into<String>) -> Self {
        TabmetaError::Config(message.into())
    }

    /// Create a Source error.
    pub fn source(message: impl Into<String>) -> Self {
        TabmetaError::Source(message.into())
    }

    /// Create a Store error.
    pub fn store(message: impl Into<String>) -> Self {
        TabmetaError::Store(message.into())
    }

    /// Format error with full details including error chain.
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }

    /// Map the error to a process exit code for the CLI.
    pub fn exit_code(&self) -> u8 {
        match self {
            TabmetaError::Config(_) | TabmetaError::Yaml(_) => EXIT_CONFIG_ERROR,
            TabmetaError::Source(_) => EXIT_SOURCE_ERROR,
            TabmetaError::Store(_) | TabmetaError::Json(_) => EXIT_STORE_ERROR,
            TabmetaError::Io(_) => EXIT_IO_ERROR,
        }
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, TabmetaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(TabmetaError::config("x").exit_code(), EXIT_CONFIG_ERROR);
        assert_eq!(TabmetaError::source("x").exit_code(), EXIT_SOURCE_ERROR);
        assert_eq!(TabmetaError::store("x").exit_code(), EXIT_STORE_ERROR);
        let io = TabmetaError::from(std::io::Error::other("gone"));
        assert_eq!(io.exit_code(), EXIT_IO_ERROR);
    }

    #[test]
    fn test_format_detailed_includes_message() {
        let err = TabmetaError::config("sheets must not be empty");
        let detailed = err.format_detailed();
        assert!(detailed.contains("Configuration error"));
        assert!(detailed.contains("sheets must not be empty"));
    }
}
