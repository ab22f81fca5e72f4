//! Validation error types
//!
//! Defines all validation error variants for training run configurations.

/// Validation error type
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required key: {0}")]
    MissingKey(String),

    #[error("Invalid range for {field}: {value} (expected {constraint})")]
    InvalidRange {
        field: String,
        value: String,
        constraint: String,
    },

    #[error("Invalid sampling weights: sum is {sum} (expected 1.0)")]
    InvalidSamplingWeightsSum { sum: f64 },

    #[error("Invalid sampling weights: {len} entries (expected one per training phase, {expected})")]
    InvalidSamplingWeightsLen { len: usize, expected: usize },

    #[error("{field} is {value} but common.epochs is {epochs} (module would never run)")]
    StartAfterExceedsEpochs {
        field: String,
        value: u32,
        epochs: u32,
    },

    #[error("Mutually exclusive fields specified: {field1} and {field2}")]
    MutuallyExclusive { field1: String, field2: String },

    #[error("Exactly one of {field1} and {field2} must be set")]
    MissingOneOf { field1: String, field2: String },

    #[error("Neither training_settings.should nor evaluation_settings.should is enabled")]
    NothingToRun,

    #[error("common.resume is set but common.resume_path is missing")]
    MissingResumePath,

    #[error("Invalid device: {0} (must be one of: cpu, cuda, cuda:<index>, mps)")]
    InvalidDevice(String),
}

impl ValidationError {
    /// Dotted path of the offending field, when the error concerns one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingKey(field)
            | Self::InvalidRange { field, .. }
            | Self::StartAfterExceedsEpochs { field, .. } => Some(field),
            Self::MutuallyExclusive { field1, .. } | Self::MissingOneOf { field1, .. } => {
                Some(field1)
            }
            Self::InvalidSamplingWeightsSum { .. } | Self::InvalidSamplingWeightsLen { .. } => {
                Some("training_settings.sampling_weights")
            }
            Self::MissingResumePath => Some("common.resume_path"),
            Self::InvalidDevice(_) => Some("common.device"),
            Self::NothingToRun => None,
        }
    }
}
