//! Per-epoch plans derived from the training and evaluation gating

use serde::Serialize;

use super::Phase;
use crate::config::TrainConfig;

/// What a checkpoint at the end of an epoch contains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckpointMode {
    /// Agent weights, optimizer state, epoch counter and dataset
    Full,
    /// Agent weights only
    AgentOnly,
}

/// Everything the trainer does in one epoch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EpochPlan {
    /// 1-based epoch number
    pub epoch: u32,
    /// Collect fresh episodes into the training dataset
    pub collect_train: bool,
    /// Modules optimized this epoch, in training order
    pub train: Vec<Phase>,
    /// Evaluation epoch (the test dataset is refreshed)
    pub evaluate: bool,
    /// Modules evaluated; the actor-critic entry means imagination inspection
    pub eval: Vec<Phase>,
    /// Save tokenizer reconstructions
    pub save_reconstructions: bool,
    /// Checkpoint written at the end of the epoch
    pub checkpoint: Option<CheckpointMode>,
}

impl EpochPlan {
    /// Derive the plan for `epoch` (1-based)
    pub fn for_epoch(config: &TrainConfig, epoch: u32) -> Self {
        let training = &config.training_settings;
        let evaluation = &config.evaluation_settings;

        let train = if training.should {
            Phase::ALL
                .into_iter()
                .filter(|phase| epoch > phase.training_start(config))
                .collect()
        } else {
            Vec::new()
        };

        let collect_train = training.should
            && config
                .collector_train
                .stop_after_epochs
                .map_or(true, |stop| epoch <= stop);

        let evaluate = evaluation.should && epoch % evaluation.every == 0;
        let eval = if evaluate {
            Phase::ALL
                .into_iter()
                .filter(|phase| epoch > phase.evaluation_start(config))
                .collect()
        } else {
            Vec::new()
        };

        let checkpoint = training.should.then(|| {
            if config.common.do_checkpoint {
                CheckpointMode::Full
            } else {
                CheckpointMode::AgentOnly
            }
        });

        Self {
            epoch,
            collect_train,
            train,
            evaluate,
            eval,
            save_reconstructions: evaluate && evaluation.tokenizer.save_reconstructions,
            checkpoint,
        }
    }

    /// Nothing but a checkpoint happens this epoch
    pub fn is_idle(&self) -> bool {
        !self.collect_train && self.train.is_empty() && !self.evaluate
    }

    /// Whether the actor-critic imagines episodes this epoch
    ///
    /// Gated on the evaluation start, while [`imagination_episode_id`] counts
    /// from the training start. When evaluation starts earlier, the epochs in
    /// between inspect imagination but have no episode ids to save under.
    pub fn inspects_imagination(&self) -> bool {
        self.eval.contains(&Phase::ActorCritic)
    }
}

/// Iterator over the epoch plans of a run
#[derive(Debug, Clone)]
pub struct Schedule<'a> {
    config: &'a TrainConfig,
    next: u64,
    last: u64,
}

impl<'a> Schedule<'a> {
    /// Plans for a fresh run, epochs `1..=common.epochs`
    pub fn new(config: &'a TrainConfig) -> Self {
        Self::between(config, 1, config.common.epochs)
    }

    /// Plans for a run resumed after `completed_epoch` finished
    pub fn resume_after(config: &'a TrainConfig, completed_epoch: u32) -> Self {
        Self::between(
            config,
            completed_epoch.saturating_add(1),
            config.common.epochs,
        )
    }

    /// Plans for epochs `from..=to`, clamped to the run
    pub fn between(config: &'a TrainConfig, from: u32, to: u32) -> Self {
        Self {
            config,
            next: u64::from(from.max(1)),
            last: u64::from(to.min(config.common.epochs)),
        }
    }

    /// First epoch the schedule will yield, if any
    pub fn start_epoch(&self) -> Option<u32> {
        u32::try_from(self.next)
            .ok()
            .filter(|_| self.next <= self.last)
    }
}

impl Iterator for Schedule<'_> {
    type Item = EpochPlan;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next > self.last {
            return None;
        }
        let epoch = u32::try_from(self.next).ok()?;
        self.next += 1;
        Some(EpochPlan::for_epoch(self.config, epoch))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.last + 1).saturating_sub(self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Schedule<'_> {}

/// Id of the `index`-th imagined episode saved in `epoch`
///
/// Ids are contiguous across evaluation epochs starting from the first epoch
/// the actor-critic trains in. `None` before that epoch.
pub fn imagination_episode_id(
    config: &TrainConfig,
    epoch: u32,
    index: u32,
    batch_size: u32,
) -> Option<u64> {
    let start = config
        .training_settings
        .actor_critic
        .component
        .start_after_epochs;
    let offset = epoch.checked_sub(1)?.checked_sub(start)?;
    Some(u64::from(offset) * u64::from(batch_size) + u64::from(index))
}
