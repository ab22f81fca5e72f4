//! Batch shapes each module samples from the episode datasets

use serde::Serialize;

use super::Phase;
use crate::config::TrainConfig;

/// Observations sampled when saving tokenizer reconstructions
pub const RECONSTRUCTION_SAMPLES: u32 = 3;

/// How a batch of episode segments is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SampleSpec {
    /// Segments per batch
    pub batch_num_samples: u32,
    /// Steps per segment
    pub sequence_length: u32,
    /// Align segments to episode starts instead of ends
    pub sample_from_start: bool,
}

/// Optimizer loop shape for one module
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrainingBatch {
    pub sample: SampleSpec,
    pub grad_acc_steps: u32,
    pub steps_per_epoch: u32,
    pub max_grad_norm: Option<f64>,
}

impl TrainingBatch {
    /// Samples contributing to one optimizer step
    pub fn effective_batch_size(&self) -> u64 {
        u64::from(self.sample.batch_num_samples) * u64::from(self.grad_acc_steps)
    }

    /// Samples drawn over a full training epoch, saturating at `u64::MAX`
    pub fn samples_per_epoch(&self) -> u64 {
        self.effective_batch_size()
            .saturating_mul(u64::from(self.steps_per_epoch))
    }
}

/// Training batch for `phase`
///
/// The tokenizer sees single frames, the world model full sequences, and
/// the actor-critic a burn-in prefix plus the frame imagination starts from.
pub fn training_batch(config: &TrainConfig, phase: Phase) -> TrainingBatch {
    let training = &config.training_settings;
    let (component, sequence_length, sample_from_start) = match phase {
        Phase::Tokenizer => (&training.tokenizer.component, 1, true),
        Phase::WorldModel => (
            &training.world_model.component,
            config.common.sequence_length,
            true,
        ),
        Phase::ActorCritic => (
            &training.actor_critic.component,
            training.actor_critic.burn_in.saturating_add(1),
            false,
        ),
    };

    TrainingBatch {
        sample: SampleSpec {
            batch_num_samples: component.batch_num_samples,
            sequence_length,
            sample_from_start,
        },
        grad_acc_steps: component.grad_acc_steps,
        steps_per_epoch: component.steps_per_epoch,
        max_grad_norm: component.max_grad_norm,
    }
}

/// Evaluation batch for `phase`
///
/// For the actor-critic this is the batch imagination starts from.
pub fn evaluation_batch(config: &TrainConfig, phase: Phase) -> SampleSpec {
    let evaluation = &config.evaluation_settings;
    match phase {
        Phase::Tokenizer => SampleSpec {
            batch_num_samples: evaluation.tokenizer.batch_num_samples,
            sequence_length: 1,
            sample_from_start: true,
        },
        Phase::WorldModel => SampleSpec {
            batch_num_samples: evaluation.world_model.batch_num_samples,
            sequence_length: config.common.sequence_length,
            sample_from_start: true,
        },
        Phase::ActorCritic => SampleSpec {
            batch_num_samples: evaluation.actor_critic.num_episodes_to_save,
            sequence_length: config
                .training_settings
                .actor_critic
                .burn_in
                .saturating_add(1),
            sample_from_start: false,
        },
    }
}

/// Batch drawn from the test dataset for tokenizer reconstructions
pub fn reconstruction_batch(config: &TrainConfig) -> SampleSpec {
    SampleSpec {
        batch_num_samples: RECONSTRUCTION_SAMPLES,
        sequence_length: config.common.sequence_length,
        sample_from_start: true,
    }
}
