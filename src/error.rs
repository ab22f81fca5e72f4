//! Error types with actionable diagnostics.
//!
//! Every error names the file or field involved so a run can be fixed
//! without reading the loader.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::interpolate::InterpolationError;
use crate::config::overrides::OverrideError;
use crate::config::validate::ValidationError;

/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading, validating or deriving from a configuration.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file not found at the given path.
    #[error("Configuration file not found: {path}\n  → Create one with `iris-config init` or check the path")]
    ConfigNotFound { path: PathBuf },

    /// Configuration document has invalid syntax or shape.
    #[error("Invalid configuration in {path}:\n  {message}\n  → Check YAML syntax and key names at the indicated line")]
    ConfigParsing { path: PathBuf, message: String },

    /// `${...}` reference could not be resolved.
    #[error("Interpolation failed: {0}")]
    Interpolation(#[from] InterpolationError),

    /// Command-line override could not be applied.
    #[error("Override failed: {0}\n  → Use the form section.key=value")]
    Override(#[from] OverrideError),

    /// Configuration parsed but violates an invariant.
    #[error("Invalid config: {0}")]
    Validation(#[from] ValidationError),

    /// Run directory is not usable.
    #[error("Run directory error: {message}\n  → {suggestion}")]
    RunLayout { message: String, suggestion: String },

    /// IO error with context.
    #[error("IO error: {context}\n  Cause: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization error.
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl Error {
    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Check if this error is fixable by editing the configuration or arguments.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigNotFound { .. }
                | Self::ConfigParsing { .. }
                | Self::Interpolation(_)
                | Self::Override(_)
                | Self::Validation(_)
                | Self::RunLayout { .. }
        )
    }

    /// Get the error code for structured output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigNotFound { .. } => "E001",
            Self::ConfigParsing { .. } => "E002",
            Self::Validation(_) => "E003",
            Self::Interpolation(_) => "E004",
            Self::Override(_) => "E005",
            Self::RunLayout { .. } => "E010",
            Self::Io { .. } => "E050",
            Self::Serialization { .. } => "E051",
        }
    }
}
