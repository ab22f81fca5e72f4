//! Training run configuration
//!
//! Typed schema, loading with `${...}` references and `--set` overrides,
//! validation, starter templates and CLI argument types.

pub mod cli;
pub mod interpolate;
mod loader;
pub mod overrides;
mod schema;
mod templates;
pub mod validate;

pub use cli::{
    parse_args, Cli, Command, InfoArgs, InitArgs, OutputFormat, PlanArgs, ValidateArgs,
};
pub use loader::{
    check_required_keys, from_yaml_str, load_config, load_config_with_overrides, parse_document,
    save_config, to_json_string, to_yaml_string,
};
pub use schema::{
    ActorCriticEvaluation, ActorCriticTraining, CollectionParams, CollectorConfig, CommonConfig,
    ComponentTraining, EvaluationSettings, TokenizerEvaluation, TokenizerTraining, TrainConfig,
    TrainingSettings, WandbConfig, WorldModelEvaluation, WorldModelTraining, REQUIRED_KEYS,
    SAMPLING_PHASES,
};
pub use templates::{generate_config, generate_yaml, Template, DEFAULT_YAML};
pub use validate::{validate_config, ValidationError};
