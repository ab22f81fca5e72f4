//! Template generation for training run configurations
//!
//! Generates starter documents for common scenarios.

use super::schema::{
    ActorCriticEvaluation, ActorCriticTraining, CollectionParams, CollectorConfig, CommonConfig,
    ComponentTraining, EvaluationSettings, TokenizerEvaluation, TokenizerTraining, TrainConfig,
    TrainingSettings, WandbConfig, WorldModelEvaluation, WorldModelTraining,
};

/// Annotated reference document, with interpolations left in place.
pub const DEFAULT_YAML: &str = include_str!("../../configs/trainer.yaml");

/// Template type for `init`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Template {
    /// Reference settings for Atari-scale runs
    #[default]
    Default,
    /// Tiny CPU run for smoke-testing a trainer
    Debug,
}

impl std::str::FromStr for Template {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "default" | "atari" => Ok(Template::Default),
            "debug" | "smoke" => Ok(Template::Debug),
            _ => Err(format!(
                "Unknown template: {s}. Valid templates: default, debug"
            )),
        }
    }
}

impl std::fmt::Display for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Template::Default => write!(f, "default"),
            Template::Debug => write!(f, "debug"),
        }
    }
}

/// Build the fully resolved configuration for a template
pub fn generate_config(template: Template) -> TrainConfig {
    match template {
        Template::Default => generate_default(),
        Template::Debug => generate_debug(),
    }
}

/// Render a template as YAML
///
/// The default template keeps its comments and `${...}` references.
pub fn generate_yaml(template: Template) -> String {
    match template {
        Template::Default => DEFAULT_YAML.to_string(),
        Template::Debug => serde_yaml::to_string(&generate_debug())
            .unwrap_or_else(|_err| "# Error generating YAML".to_string()),
    }
}

fn component(
    batch_num_samples: u32,
    start_after_epochs: u32,
    steps_per_epoch: u32,
) -> ComponentTraining {
    ComponentTraining {
        batch_num_samples,
        grad_acc_steps: 1,
        max_grad_norm: Some(10.0),
        start_after_epochs,
        steps_per_epoch,
    }
}

fn generate_default() -> TrainConfig {
    let sequence_length = 20;
    let burn_in = 20;

    TrainConfig {
        wandb: WandbConfig {
            mode: Some("online".to_string()),
            project: Some("iris".to_string()),
            ..Default::default()
        },
        common: CommonConfig {
            epochs: 600,
            device: "cuda:0".to_string(),
            do_checkpoint: true,
            seed: Some(0),
            sequence_length,
            resume: false,
            resume_path: None,
        },
        collector_train: CollectorConfig {
            num_env: 1,
            stop_after_epochs: Some(500),
            num_episodes_to_save: 10,
            config: CollectionParams {
                epsilon: 0.01,
                should_sample: true,
                temperature: 1.0,
                num_steps: Some(200),
                num_episodes: None,
                burn_in,
            },
        },
        collector_test: CollectorConfig {
            num_env: 8,
            stop_after_epochs: None,
            num_episodes_to_save: 10,
            config: CollectionParams {
                epsilon: 0.0,
                should_sample: true,
                temperature: 0.5,
                num_steps: None,
                num_episodes: Some(16),
                burn_in,
            },
        },
        training_settings: TrainingSettings {
            should: true,
            learning_rate: 1e-4,
            sampling_weights: Some(vec![0.125, 0.125, 0.25, 0.5]),
            tokenizer: TokenizerTraining {
                component: component(256, 5, 200),
            },
            world_model: WorldModelTraining {
                component: component(64, 25, 200),
                weight_decay: 0.01,
            },
            actor_critic: ActorCriticTraining {
                component: component(64, 50, 200),
                imagine_horizon: sequence_length,
                burn_in,
                gamma: 0.995,
                lambda_: 0.95,
                entropy_weight: 0.001,
            },
        },
        evaluation_settings: EvaluationSettings {
            should: true,
            every: 5,
            tokenizer: TokenizerEvaluation {
                batch_num_samples: 256,
                start_after_epochs: 5,
                save_reconstructions: true,
            },
            world_model: WorldModelEvaluation {
                batch_num_samples: 64,
                start_after_epochs: 25,
            },
            actor_critic: ActorCriticEvaluation {
                num_episodes_to_save: 64,
                horizon: sequence_length,
                start_after_epochs: 50,
            },
        },
    }
}

fn generate_debug() -> TrainConfig {
    let mut config = generate_default();

    config.wandb = WandbConfig {
        mode: Some("disabled".to_string()),
        ..Default::default()
    };
    config.common.epochs = 6;
    config.common.device = "cpu".to_string();
    config.common.do_checkpoint = false;
    config.common.sequence_length = 4;

    config.collector_train.stop_after_epochs = Some(4);
    config.collector_train.config.num_steps = Some(16);
    config.collector_train.config.burn_in = 2;
    config.collector_test.num_env = 1;
    config.collector_test.config.num_episodes = Some(1);
    config.collector_test.config.burn_in = 2;

    let training = &mut config.training_settings;
    training.tokenizer.component = component(4, 0, 2);
    training.world_model.component = component(2, 1, 2);
    training.actor_critic.component = component(2, 2, 2);
    training.actor_critic.imagine_horizon = 4;
    training.actor_critic.burn_in = 2;

    let evaluation = &mut config.evaluation_settings;
    evaluation.every = 2;
    evaluation.tokenizer.batch_num_samples = 4;
    evaluation.tokenizer.start_after_epochs = 0;
    evaluation.tokenizer.save_reconstructions = false;
    evaluation.world_model.batch_num_samples = 2;
    evaluation.world_model.start_after_epochs = 1;
    evaluation.actor_critic.num_episodes_to_save = 2;
    evaluation.actor_critic.horizon = 4;
    evaluation.actor_critic.start_after_epochs = 2;

    config
}
