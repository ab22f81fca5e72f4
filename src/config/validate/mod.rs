//! Configuration validation
//!
//! Validates training run configurations for correctness before execution.

mod error;
mod validator;

#[cfg(test)]
mod proptests;

pub use error::ValidationError;
pub use validator::{validate_config, validate_sampling_weights, SAMPLING_WEIGHTS_TOLERANCE};
