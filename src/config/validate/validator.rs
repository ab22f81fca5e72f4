//! Configuration validation logic
//!
//! Validates training run configurations for correctness before any
//! training resources are allocated.

use super::error::ValidationError;
use crate::config::schema::{
    CollectorConfig, CommonConfig, ComponentTraining, EvaluationSettings, TrainConfig,
    TrainingSettings, SAMPLING_PHASES,
};

/// Allowed deviation of the sampling weights sum from 1.0
pub const SAMPLING_WEIGHTS_TOLERANCE: f64 = 1e-6;

/// Device names accepted without an index
const VALID_DEVICES: &[&str] = &["cpu", "cuda", "mps"];

/// Validate a training run configuration
///
/// Checks, in order:
/// 1. Global run parameters (epochs, device, resume)
/// 2. Both collectors
/// 3. Training settings per module
/// 4. Evaluation settings per module
/// 5. Schedule consistency against `common.epochs`
///
/// Stops at the first violation.
pub fn validate_config(config: &TrainConfig) -> Result<(), ValidationError> {
    validate_common(&config.common)?;
    validate_collector(&config.collector_train, "collector_train")?;
    validate_collector(&config.collector_test, "collector_test")?;
    validate_training(&config.training_settings)?;
    validate_evaluation(&config.evaluation_settings)?;
    validate_schedule(config)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Shared range-check helpers
// ---------------------------------------------------------------------------

fn invalid_range(field: &str, value: impl ToString, constraint: &str) -> ValidationError {
    ValidationError::InvalidRange {
        field: field.to_string(),
        value: value.to_string(),
        constraint: constraint.to_string(),
    }
}

/// Validate that a count is at least 1
fn validate_nonzero(value: u32, field: &str) -> Result<(), ValidationError> {
    if value == 0 {
        return Err(invalid_range(field, value, ">= 1"));
    }
    Ok(())
}

/// Validate that a float is finite and >= 0
fn validate_non_negative(value: f64, field: &str) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid_range(field, value, ">= 0"));
    }
    Ok(())
}

/// Validate that a float is finite and > 0
fn validate_positive(value: f64, field: &str) -> Result<(), ValidationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid_range(field, value, "> 0"));
    }
    Ok(())
}

/// Validate that a float lies within the closed range [0, 1]
fn validate_unit_interval(value: f64, field: &str) -> Result<(), ValidationError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(invalid_range(field, value, "in [0, 1]"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Common
// ---------------------------------------------------------------------------

fn validate_common(common: &CommonConfig) -> Result<(), ValidationError> {
    validate_nonzero(common.epochs, "common.epochs")?;
    validate_nonzero(common.sequence_length, "common.sequence_length")?;
    validate_device(&common.device)?;

    if common.resume {
        let has_path = common
            .resume_path
            .as_ref()
            .is_some_and(|p| !p.as_os_str().is_empty());
        if !has_path {
            return Err(ValidationError::MissingResumePath);
        }
    }
    Ok(())
}

/// Validate a device identifier: `cpu`, `mps`, `cuda` or `cuda:<index>`
fn validate_device(device: &str) -> Result<(), ValidationError> {
    if VALID_DEVICES.contains(&device) {
        return Ok(());
    }
    let indexed = device
        .strip_prefix("cuda:")
        .is_some_and(|idx| !idx.is_empty() && idx.bytes().all(|b| b.is_ascii_digit()));
    if indexed {
        Ok(())
    } else {
        Err(ValidationError::InvalidDevice(device.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Collectors
// ---------------------------------------------------------------------------

fn validate_collector(collector: &CollectorConfig, section: &str) -> Result<(), ValidationError> {
    validate_nonzero(collector.num_env, &format!("{section}.num_env"))?;

    let params = &collector.config;
    validate_unit_interval(params.epsilon, &format!("{section}.config.epsilon"))?;
    validate_non_negative(params.temperature, &format!("{section}.config.temperature"))?;
    if params.should_sample && params.temperature == 0.0 {
        return Err(invalid_range(
            &format!("{section}.config.temperature"),
            params.temperature,
            "> 0 when should_sample is set",
        ));
    }

    match (params.num_steps, params.num_episodes) {
        (Some(_), Some(_)) => Err(ValidationError::MutuallyExclusive {
            field1: format!("{section}.config.num_steps"),
            field2: format!("{section}.config.num_episodes"),
        }),
        (None, None) => Err(ValidationError::MissingOneOf {
            field1: format!("{section}.config.num_steps"),
            field2: format!("{section}.config.num_episodes"),
        }),
        (Some(steps), None) => validate_nonzero(steps, &format!("{section}.config.num_steps")),
        (None, Some(episodes)) => {
            validate_nonzero(episodes, &format!("{section}.config.num_episodes"))
        }
    }
}

// ---------------------------------------------------------------------------
// Training
// ---------------------------------------------------------------------------

fn validate_training(training: &TrainingSettings) -> Result<(), ValidationError> {
    validate_positive(training.learning_rate, "training_settings.learning_rate")?;
    validate_sampling_weights(training.sampling_weights.as_deref())?;

    validate_component(
        &training.tokenizer.component,
        "training_settings.tokenizer",
    )?;
    validate_component(
        &training.world_model.component,
        "training_settings.world_model",
    )?;
    validate_non_negative(
        training.world_model.weight_decay,
        "training_settings.world_model.weight_decay",
    )?;

    let ac = &training.actor_critic;
    validate_component(&ac.component, "training_settings.actor_critic")?;
    validate_nonzero(
        ac.imagine_horizon,
        "training_settings.actor_critic.imagine_horizon",
    )?;
    // burn-in prefix plus the frame imagination starts from
    if ac.burn_in.checked_add(1).is_none() {
        return Err(ValidationError::InvalidRange {
            field: "training_settings.actor_critic.burn_in".to_string(),
            value: ac.burn_in.to_string(),
            constraint: format!("< {}", u32::MAX),
        });
    }
    validate_unit_interval(ac.gamma, "training_settings.actor_critic.gamma")?;
    validate_unit_interval(ac.lambda_, "training_settings.actor_critic.lambda_")?;
    validate_non_negative(
        ac.entropy_weight,
        "training_settings.actor_critic.entropy_weight",
    )?;
    Ok(())
}

/// Validate optimizer settings shared by every module
fn validate_component(component: &ComponentTraining, section: &str) -> Result<(), ValidationError> {
    validate_nonzero(
        component.batch_num_samples,
        &format!("{section}.batch_num_samples"),
    )?;
    validate_nonzero(component.grad_acc_steps, &format!("{section}.grad_acc_steps"))?;
    validate_nonzero(
        component.steps_per_epoch,
        &format!("{section}.steps_per_epoch"),
    )?;
    if let Some(max_grad_norm) = component.max_grad_norm {
        validate_positive(max_grad_norm, &format!("{section}.max_grad_norm"))?;
    }
    Ok(())
}

/// Validate one weight per training phase, each >= 0, summing to 1.0
pub fn validate_sampling_weights(weights: Option<&[f64]>) -> Result<(), ValidationError> {
    let Some(weights) = weights else {
        return Ok(());
    };

    if weights.len() != SAMPLING_PHASES {
        return Err(ValidationError::InvalidSamplingWeightsLen {
            len: weights.len(),
            expected: SAMPLING_PHASES,
        });
    }

    for (i, weight) in weights.iter().enumerate() {
        validate_non_negative(*weight, &format!("training_settings.sampling_weights[{i}]"))?;
    }

    let sum: f64 = weights.iter().sum();
    if (sum - 1.0).abs() > SAMPLING_WEIGHTS_TOLERANCE {
        return Err(ValidationError::InvalidSamplingWeightsSum { sum });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

fn validate_evaluation(evaluation: &EvaluationSettings) -> Result<(), ValidationError> {
    validate_nonzero(evaluation.every, "evaluation_settings.every")?;
    validate_nonzero(
        evaluation.tokenizer.batch_num_samples,
        "evaluation_settings.tokenizer.batch_num_samples",
    )?;
    validate_nonzero(
        evaluation.world_model.batch_num_samples,
        "evaluation_settings.world_model.batch_num_samples",
    )?;
    validate_nonzero(
        evaluation.actor_critic.horizon,
        "evaluation_settings.actor_critic.horizon",
    )?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Schedule consistency
// ---------------------------------------------------------------------------

fn validate_schedule(config: &TrainConfig) -> Result<(), ValidationError> {
    if !config.training_settings.should && !config.evaluation_settings.should {
        return Err(ValidationError::NothingToRun);
    }

    let epochs = config.common.epochs;
    for (field, value) in config.start_after_epochs() {
        if value > epochs {
            return Err(ValidationError::StartAfterExceedsEpochs {
                field: field.to_string(),
                value,
                epochs,
            });
        }
    }
    Ok(())
}
