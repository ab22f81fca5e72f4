//! CLI argument parsing
//!
//! # Usage
//!
//! ```bash
//! iris-config validate configs/trainer.yaml
//! iris-config validate configs/trainer.yaml --set common.epochs=100 --detailed
//! iris-config info configs/trainer.yaml --format json
//! iris-config init --template debug --output debug.yaml
//! iris-config plan configs/trainer.yaml --from 45 --to 55
//! ```

mod core;
mod types;

pub use self::core::{parse_args, Cli, Command, InfoArgs, InitArgs, PlanArgs, ValidateArgs};
pub use self::types::OutputFormat;
