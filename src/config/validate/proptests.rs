//! Property-based tests for configuration validation

use super::error::ValidationError;
use super::validator::{validate_config, validate_sampling_weights, SAMPLING_WEIGHTS_TOLERANCE};
use crate::config::schema::{TrainConfig, SAMPLING_PHASES};
use crate::config::templates::{generate_config, Template};
use proptest::prelude::*;

fn arb_valid_config() -> impl Strategy<Value = TrainConfig> {
    (
        1u32..1000,                         // epochs
        1u32..64,                           // sequence_length
        0.0f64..=1.0,                       // epsilon
        0.0f64..=1.0,                       // gamma
        0.0f64..=1.0,                       // lambda_
        1e-6f64..1.0,                       // learning_rate
        proptest::option::of(0.1f64..10.0), // max_grad_norm
        1u32..20,                           // evaluation every
    )
        .prop_flat_map(
            |(epochs, sequence_length, epsilon, gamma, lambda, lr, grad_norm, every)| {
                (
                    Just((epochs, sequence_length, epsilon, gamma, lambda, lr, grad_norm, every)),
                    proptest::collection::vec(0..=epochs, 6),
                )
            },
        )
        .prop_map(
            |((epochs, sequence_length, epsilon, gamma, lambda, lr, grad_norm, every), starts)| {
                let mut config = generate_config(Template::Default);
                config.common.epochs = epochs;
                config.common.sequence_length = sequence_length;
                config.collector_train.config.epsilon = epsilon;
                config.training_settings.learning_rate = lr;
                config.training_settings.actor_critic.gamma = gamma;
                config.training_settings.actor_critic.lambda_ = lambda;
                config.training_settings.world_model.component.max_grad_norm = grad_norm;
                config.evaluation_settings.every = every;

                let training = &mut config.training_settings;
                training.tokenizer.component.start_after_epochs = starts[0];
                training.world_model.component.start_after_epochs = starts[1];
                training.actor_critic.component.start_after_epochs = starts[2];
                let evaluation = &mut config.evaluation_settings;
                evaluation.tokenizer.start_after_epochs = starts[3];
                evaluation.world_model.start_after_epochs = starts[4];
                evaluation.actor_critic.start_after_epochs = starts[5];
                config
            },
        )
}

/// Non-negative weights normalized to sum to 1
fn arb_sampling_weights() -> impl Strategy<Value = Vec<f64>> {
    proptest::collection::vec(0.01f64..10.0, SAMPLING_PHASES).prop_map(|raw| {
        let total: f64 = raw.iter().sum();
        raw.into_iter().map(|w| w / total).collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_valid_config_passes(config in arb_valid_config()) {
        prop_assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn prop_epsilon_above_one_fails(config in arb_valid_config(), epsilon in 1.0001f64..100.0) {
        let mut config = config;
        config.collector_train.config.epsilon = epsilon;
        let is_epsilon_error = matches!(
            validate_config(&config),
            Err(ValidationError::InvalidRange { ref field, .. })
                if field == "collector_train.config.epsilon"
        );
        prop_assert!(is_epsilon_error);
    }

    #[test]
    fn prop_negative_gamma_fails(config in arb_valid_config(), gamma in -100.0f64..-1e-9) {
        let mut config = config;
        config.training_settings.actor_critic.gamma = gamma;
        prop_assert!(validate_config(&config).is_err());
    }

    #[test]
    fn prop_lambda_above_one_fails(config in arb_valid_config(), lambda in 1.0001f64..10.0) {
        let mut config = config;
        config.training_settings.actor_critic.lambda_ = lambda;
        prop_assert!(validate_config(&config).is_err());
    }

    #[test]
    fn prop_start_after_beyond_epochs_fails(
        config in arb_valid_config(),
        excess in 1u32..100,
        slot in 0usize..6
    ) {
        let mut config = config;
        let value = config.common.epochs + excess;
        match slot {
            0 => config.training_settings.tokenizer.component.start_after_epochs = value,
            1 => config.training_settings.world_model.component.start_after_epochs = value,
            2 => config.training_settings.actor_critic.component.start_after_epochs = value,
            3 => config.evaluation_settings.tokenizer.start_after_epochs = value,
            4 => config.evaluation_settings.world_model.start_after_epochs = value,
            _ => config.evaluation_settings.actor_critic.start_after_epochs = value,
        }
        let is_start_error = matches!(
            validate_config(&config),
            Err(ValidationError::StartAfterExceedsEpochs { value: v, .. }) if v == value
        );
        prop_assert!(is_start_error);
    }

    #[test]
    fn prop_normalized_weights_pass(weights in arb_sampling_weights()) {
        prop_assert!(validate_sampling_weights(Some(&weights)).is_ok());
    }

    #[test]
    fn prop_scaled_weights_fail(weights in arb_sampling_weights(), scale in 1.01f64..5.0) {
        let scaled: Vec<f64> = weights.iter().map(|w| w * scale).collect();
        let sum: f64 = scaled.iter().sum();
        prop_assume!((sum - 1.0).abs() > SAMPLING_WEIGHTS_TOLERANCE);
        let is_sum_error = matches!(
            validate_sampling_weights(Some(&scaled)),
            Err(ValidationError::InvalidSamplingWeightsSum { .. })
        );
        prop_assert!(is_sum_error);
    }

    #[test]
    fn prop_wrong_weight_count_fails(len in 0usize..12) {
        prop_assume!(len != SAMPLING_PHASES);
        let weights = vec![1.0 / len.max(1) as f64; len];
        let is_len_error = matches!(
            validate_sampling_weights(Some(&weights)),
            Err(ValidationError::InvalidSamplingWeightsLen { len: l, .. }) if l == len
        );
        prop_assert!(is_len_error);
    }

    #[test]
    fn prop_unknown_device_fails(config in arb_valid_config(), device in "[a-z]{1,8}") {
        prop_assume!(!["cpu", "cuda", "mps"].contains(&device.as_str()));
        let mut config = config;
        config.common.device = device.clone();
        prop_assert_eq!(
            validate_config(&config).unwrap_err(),
            ValidationError::InvalidDevice(device)
        );
    }

    #[test]
    fn prop_indexed_cuda_device_passes(config in arb_valid_config(), index in 0u32..16) {
        let mut config = config;
        config.common.device = format!("cuda:{index}");
        prop_assert!(validate_config(&config).is_ok());
    }
}
