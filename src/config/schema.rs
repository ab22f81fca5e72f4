//! YAML schema definitions for world-model agent training runs
//!
//! The document is a tree of named sections consumed by an external trainer.
//! Sections and keys follow the trainer's naming (`collector_train`,
//! `training_settings`, `lambda_`, ...) so existing run files load unchanged.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Number of recency buckets the episode dataset samples from.
///
/// `training_settings.sampling_weights` carries one weight per bucket.
pub const SAMPLING_PHASES: usize = 4;

/// Dotted paths that must be present in every document.
///
/// Checked on the raw tree before deserialization so a missing section is
/// reported by name instead of as a generic parse failure.
pub const REQUIRED_KEYS: &[&str] = &[
    "common",
    "common.epochs",
    "common.device",
    "common.do_checkpoint",
    "common.sequence_length",
    "collector_train",
    "collector_train.num_env",
    "collector_train.num_episodes_to_save",
    "collector_train.config",
    "collector_test",
    "collector_test.num_env",
    "collector_test.num_episodes_to_save",
    "collector_test.config",
    "training_settings",
    "training_settings.should",
    "training_settings.learning_rate",
    "training_settings.tokenizer",
    "training_settings.world_model",
    "training_settings.actor_critic",
    "evaluation_settings",
    "evaluation_settings.should",
    "evaluation_settings.every",
    "evaluation_settings.tokenizer",
    "evaluation_settings.world_model",
    "evaluation_settings.actor_critic",
];

/// Complete training run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrainConfig {
    /// Experiment-tracking metadata
    #[serde(default)]
    pub wandb: WandbConfig,

    /// Global run parameters
    pub common: CommonConfig,

    /// Environment rollout settings for the training dataset
    pub collector_train: CollectorConfig,

    /// Environment rollout settings for the evaluation dataset
    pub collector_test: CollectorConfig,

    /// Optimizer and schedule settings per module
    pub training_settings: TrainingSettings,

    /// Periodic evaluation settings per module
    pub evaluation_settings: EvaluationSettings,
}

/// Experiment-tracking session metadata
///
/// Every field is nullable; the tracker fills in its own defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WandbConfig {
    /// Tracking mode ("online", "offline", "disabled")
    #[serde(default)]
    pub mode: Option<String>,

    /// Project name
    #[serde(default)]
    pub project: Option<String>,

    /// Team or user owning the project
    #[serde(default)]
    pub entity: Option<String>,

    /// Run display name
    #[serde(default)]
    pub name: Option<String>,

    /// Run group
    #[serde(default)]
    pub group: Option<String>,

    /// Free-form run tags
    #[serde(default)]
    pub tags: Option<Vec<String>>,

    /// Run notes
    #[serde(default)]
    pub notes: Option<String>,
}

/// Global run parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommonConfig {
    /// Total number of epochs (epochs are numbered from 1)
    pub epochs: u32,

    /// Compute device identifier ("cpu", "cuda", "cuda:0", "mps")
    pub device: String,

    /// Save optimizer and dataset state alongside the agent weights
    pub do_checkpoint: bool,

    /// Random seed; null leaves seeding to the trainer
    #[serde(default)]
    pub seed: Option<u64>,

    /// Sequence length sampled for world-model batches
    pub sequence_length: u32,

    /// Resume a previous run from `resume_path`
    #[serde(default)]
    pub resume: bool,

    /// Run directory of the run being resumed
    #[serde(default)]
    pub resume_path: Option<PathBuf>,
}

/// Environment interaction settings for one collector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectorConfig {
    /// Number of environments stepped in parallel
    pub num_env: u32,

    /// Stop collecting after this epoch; null collects every epoch
    #[serde(default)]
    pub stop_after_epochs: Option<u32>,

    /// Number of most recent episodes kept on disk
    pub num_episodes_to_save: u32,

    /// Per-call rollout parameters
    pub config: CollectionParams,
}

/// Rollout parameters handed to the collector on every call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectionParams {
    /// Probability of a uniformly random action
    pub epsilon: f64,

    /// Sample actions from the policy instead of taking the argmax
    pub should_sample: bool,

    /// Policy logits temperature
    pub temperature: f64,

    /// Number of environment steps per call (exclusive with `num_episodes`)
    #[serde(default)]
    pub num_steps: Option<u32>,

    /// Number of episodes per call (exclusive with `num_steps`)
    #[serde(default)]
    pub num_episodes: Option<u32>,

    /// Observations replayed to warm up the recurrent policy state
    pub burn_in: u32,
}

/// Optimizer settings shared by every trained module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentTraining {
    /// Samples per batch
    pub batch_num_samples: u32,

    /// Batches accumulated before each optimizer step
    pub grad_acc_steps: u32,

    /// Gradient norm clipping threshold; null disables clipping
    #[serde(default)]
    pub max_grad_norm: Option<f64>,

    /// Module trains only in epochs strictly after this one
    pub start_after_epochs: u32,

    /// Optimizer steps per epoch
    pub steps_per_epoch: u32,
}

/// Tokenizer training settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "TokenizerTrainingDoc")]
pub struct TokenizerTraining {
    #[serde(flatten)]
    pub component: ComponentTraining,
}

/// World-model training settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WorldModelTrainingDoc")]
pub struct WorldModelTraining {
    #[serde(flatten)]
    pub component: ComponentTraining,

    /// Decoupled weight decay for the transformer blocks
    pub weight_decay: f64,
}

/// Actor-critic training settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ActorCriticTrainingDoc")]
pub struct ActorCriticTraining {
    #[serde(flatten)]
    pub component: ComponentTraining,

    /// Imagined steps rolled out per update
    pub imagine_horizon: u32,

    /// Real observations used to warm up the policy before imagining
    pub burn_in: u32,

    /// Discount factor
    pub gamma: f64,

    /// Lambda-return mixing coefficient
    pub lambda_: f64,

    /// Entropy bonus weight
    pub entropy_weight: f64,
}

// Per-module blocks as written in the document. `flatten` ignores
// `deny_unknown_fields`, so the shared optimizer keys are spelled out here
// and regrouped into `ComponentTraining` after parsing.

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TokenizerTrainingDoc {
    batch_num_samples: u32,
    grad_acc_steps: u32,
    #[serde(default)]
    max_grad_norm: Option<f64>,
    start_after_epochs: u32,
    steps_per_epoch: u32,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct WorldModelTrainingDoc {
    batch_num_samples: u32,
    grad_acc_steps: u32,
    #[serde(default)]
    max_grad_norm: Option<f64>,
    start_after_epochs: u32,
    steps_per_epoch: u32,
    weight_decay: f64,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ActorCriticTrainingDoc {
    batch_num_samples: u32,
    grad_acc_steps: u32,
    #[serde(default)]
    max_grad_norm: Option<f64>,
    start_after_epochs: u32,
    steps_per_epoch: u32,
    imagine_horizon: u32,
    burn_in: u32,
    gamma: f64,
    lambda_: f64,
    entropy_weight: f64,
}

impl From<TokenizerTrainingDoc> for TokenizerTraining {
    fn from(doc: TokenizerTrainingDoc) -> Self {
        Self {
            component: ComponentTraining {
                batch_num_samples: doc.batch_num_samples,
                grad_acc_steps: doc.grad_acc_steps,
                max_grad_norm: doc.max_grad_norm,
                start_after_epochs: doc.start_after_epochs,
                steps_per_epoch: doc.steps_per_epoch,
            },
        }
    }
}

impl From<WorldModelTrainingDoc> for WorldModelTraining {
    fn from(doc: WorldModelTrainingDoc) -> Self {
        Self {
            component: ComponentTraining {
                batch_num_samples: doc.batch_num_samples,
                grad_acc_steps: doc.grad_acc_steps,
                max_grad_norm: doc.max_grad_norm,
                start_after_epochs: doc.start_after_epochs,
                steps_per_epoch: doc.steps_per_epoch,
            },
            weight_decay: doc.weight_decay,
        }
    }
}

impl From<ActorCriticTrainingDoc> for ActorCriticTraining {
    fn from(doc: ActorCriticTrainingDoc) -> Self {
        Self {
            component: ComponentTraining {
                batch_num_samples: doc.batch_num_samples,
                grad_acc_steps: doc.grad_acc_steps,
                max_grad_norm: doc.max_grad_norm,
                start_after_epochs: doc.start_after_epochs,
                steps_per_epoch: doc.steps_per_epoch,
            },
            imagine_horizon: doc.imagine_horizon,
            burn_in: doc.burn_in,
            gamma: doc.gamma,
            lambda_: doc.lambda_,
            entropy_weight: doc.entropy_weight,
        }
    }
}

/// Training settings for all modules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrainingSettings {
    /// Run training at all
    pub should: bool,

    /// Optimizer learning rate
    pub learning_rate: f64,

    /// Dataset sampling weights, one per recency bucket; null samples uniformly
    #[serde(default)]
    pub sampling_weights: Option<Vec<f64>>,

    pub tokenizer: TokenizerTraining,
    pub world_model: WorldModelTraining,
    pub actor_critic: ActorCriticTraining,
}

/// Tokenizer evaluation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenizerEvaluation {
    pub batch_num_samples: u32,
    pub start_after_epochs: u32,

    /// Write reconstructed observations to the media directory
    #[serde(default)]
    pub save_reconstructions: bool,
}

/// World-model evaluation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorldModelEvaluation {
    pub batch_num_samples: u32,
    pub start_after_epochs: u32,
}

/// Actor-critic evaluation (imagination inspection) settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActorCriticEvaluation {
    /// Imagined episodes saved per evaluation
    pub num_episodes_to_save: u32,

    /// Imagination horizon
    pub horizon: u32,

    pub start_after_epochs: u32,
}

/// Evaluation settings for all modules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvaluationSettings {
    /// Run evaluation at all
    pub should: bool,

    /// Evaluate every N epochs
    pub every: u32,

    pub tokenizer: TokenizerEvaluation,
    pub world_model: WorldModelEvaluation,
    pub actor_critic: ActorCriticEvaluation,
}

impl TrainConfig {
    /// `start_after_epochs` of every module, keyed by dotted path.
    pub fn start_after_epochs(&self) -> [(&'static str, u32); 6] {
        let train = &self.training_settings;
        let eval = &self.evaluation_settings;
        [
            (
                "training_settings.tokenizer.start_after_epochs",
                train.tokenizer.component.start_after_epochs,
            ),
            (
                "training_settings.world_model.start_after_epochs",
                train.world_model.component.start_after_epochs,
            ),
            (
                "training_settings.actor_critic.start_after_epochs",
                train.actor_critic.component.start_after_epochs,
            ),
            (
                "evaluation_settings.tokenizer.start_after_epochs",
                eval.tokenizer.start_after_epochs,
            ),
            (
                "evaluation_settings.world_model.start_after_epochs",
                eval.world_model.start_after_epochs,
            ),
            (
                "evaluation_settings.actor_critic.start_after_epochs",
                eval.actor_critic.start_after_epochs,
            ),
        ]
    }
}
