//! Epoch-level schedule derived from a validated configuration
//!
//! The trainer gates every module on `start_after_epochs`, evaluates every
//! `evaluation_settings.every` epochs and stops collecting after
//! `collector_train.stop_after_epochs`. This module computes those decisions
//! up front so a run can be inspected before it starts.

mod batch;
mod plan;

#[cfg(test)]
mod tests;

pub use batch::{
    evaluation_batch, reconstruction_batch, training_batch, SampleSpec, TrainingBatch,
    RECONSTRUCTION_SAMPLES,
};
pub use plan::{imagination_episode_id, CheckpointMode, EpochPlan, Schedule};

use serde::Serialize;
use std::fmt;

use crate::config::TrainConfig;

/// Trainable module of the agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Tokenizer,
    WorldModel,
    ActorCritic,
}

impl Phase {
    /// All modules in the order the trainer visits them
    pub const ALL: [Phase; 3] = [Phase::Tokenizer, Phase::WorldModel, Phase::ActorCritic];

    /// Section name used in the configuration document
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Tokenizer => "tokenizer",
            Phase::WorldModel => "world_model",
            Phase::ActorCritic => "actor_critic",
        }
    }

    /// Last epoch before this module starts training
    pub fn training_start(&self, config: &TrainConfig) -> u32 {
        let training = &config.training_settings;
        match self {
            Phase::Tokenizer => training.tokenizer.component.start_after_epochs,
            Phase::WorldModel => training.world_model.component.start_after_epochs,
            Phase::ActorCritic => training.actor_critic.component.start_after_epochs,
        }
    }

    /// Last epoch before this module is evaluated
    pub fn evaluation_start(&self, config: &TrainConfig) -> u32 {
        let evaluation = &config.evaluation_settings;
        match self {
            Phase::Tokenizer => evaluation.tokenizer.start_after_epochs,
            Phase::WorldModel => evaluation.world_model.start_after_epochs,
            Phase::ActorCritic => evaluation.actor_critic.start_after_epochs,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Totals for one module over a whole run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseSummary {
    pub phase: Phase,
    /// Epochs in which the module is optimized
    pub training_epochs: u32,
    /// Optimizer steps across the run
    pub optimizer_steps: u64,
    /// Samples drawn across the run
    pub samples: u64,
    /// Evaluation epochs in which the module is evaluated
    pub evaluation_epochs: u32,
}

/// Totals over a whole run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub epochs: u32,
    /// Epochs that collect training episodes
    pub collection_epochs: u32,
    /// Epochs that run evaluation
    pub evaluation_epochs: u32,
    /// Epochs that write a checkpoint
    pub checkpoint_epochs: u32,
    pub phases: Vec<PhaseSummary>,
}

/// Summarize the schedule of a full run
pub fn summarize(config: &TrainConfig) -> RunSummary {
    let mut summary = RunSummary {
        epochs: config.common.epochs,
        collection_epochs: 0,
        evaluation_epochs: 0,
        checkpoint_epochs: 0,
        phases: Phase::ALL
            .into_iter()
            .map(|phase| PhaseSummary {
                phase,
                training_epochs: 0,
                optimizer_steps: 0,
                samples: 0,
                evaluation_epochs: 0,
            })
            .collect(),
    };

    for plan in Schedule::new(config) {
        summary.collection_epochs += u32::from(plan.collect_train);
        summary.evaluation_epochs += u32::from(plan.evaluate);
        summary.checkpoint_epochs += u32::from(plan.checkpoint.is_some());
        for entry in &mut summary.phases {
            if plan.train.contains(&entry.phase) {
                entry.training_epochs += 1;
            }
            if plan.eval.contains(&entry.phase) {
                entry.evaluation_epochs += 1;
            }
        }
    }

    for entry in &mut summary.phases {
        let batch = training_batch(config, entry.phase);
        entry.optimizer_steps =
            u64::from(entry.training_epochs) * u64::from(batch.steps_per_epoch);
        entry.samples = u64::from(entry.training_epochs).saturating_mul(batch.samples_per_epoch());
    }

    tracing::debug!(
        epochs = summary.epochs,
        evaluation_epochs = summary.evaluation_epochs,
        "schedule summarized"
    );
    summary
}
