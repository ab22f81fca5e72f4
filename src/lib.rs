//! # iris-config
//!
//! Configuration contract for training a world-model agent: a discrete
//! autoencoder tokenizer, a transformer world model and an actor-critic
//! trained in imagination.
//!
//! The crate loads the trainer's YAML document, resolves `${...}` references
//! and `--set` overrides, validates every invariant before any training
//! resource is allocated, and derives what a trainer needs from the document:
//! the per-epoch schedule, batch shapes and the run directory layout.
//!
//! # Example
//!
//! ```no_run
//! use iris_config::config::load_config;
//! use iris_config::schedule::Schedule;
//!
//! let config = load_config("configs/trainer.yaml")?;
//! for plan in Schedule::new(&config).filter(|plan| plan.evaluate) {
//!     println!("epoch {} evaluates {:?}", plan.epoch, plan.eval);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod layout;
pub mod schedule;

pub use error::{Error, Result};
