//! Validate command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{load_config_with_overrides, CollectorConfig, TrainConfig, ValidateArgs};

/// Format global run parameters as a string
pub fn format_common_info(config: &TrainConfig) -> String {
    let common = &config.common;
    let mut lines = vec![
        format!("  Epochs: {}", common.epochs),
        format!("  Device: {}", common.device),
        format!("  Sequence length: {}", common.sequence_length),
        format!("  Full checkpoints: {}", common.do_checkpoint),
    ];
    if let Some(seed) = common.seed {
        lines.push(format!("  Seed: {seed}"));
    }
    if common.resume {
        if let Some(path) = &common.resume_path {
            lines.push(format!("  Resume from: {}", path.display()));
        }
    }
    lines.join("\n")
}

/// Format one collector as a string
pub fn format_collector_info(name: &str, collector: &CollectorConfig) -> String {
    let params = &collector.config;
    let mut lines = vec![
        format!("  {name}:"),
        format!("    Environments: {}", collector.num_env),
        format!("    Episodes kept: {}", collector.num_episodes_to_save),
    ];
    if let Some(steps) = params.num_steps {
        lines.push(format!("    Steps per call: {steps}"));
    }
    if let Some(episodes) = params.num_episodes {
        lines.push(format!("    Episodes per call: {episodes}"));
    }
    if let Some(stop) = collector.stop_after_epochs {
        lines.push(format!("    Stops after epoch: {stop}"));
    }
    lines.push(format!(
        "    Epsilon: {}, temperature: {}, sampling: {}",
        params.epsilon, params.temperature, params.should_sample
    ));
    lines.join("\n")
}

/// Format training settings as a string
pub fn format_training_info(config: &TrainConfig) -> String {
    let training = &config.training_settings;
    if !training.should {
        return "  Training: disabled".to_string();
    }

    let mut lines = vec![format!("  Learning rate: {}", training.learning_rate)];
    if let Some(weights) = &training.sampling_weights {
        lines.push(format!("  Sampling weights: {weights:?}"));
    }
    for (name, component) in [
        ("Tokenizer", &training.tokenizer.component),
        ("World model", &training.world_model.component),
        ("Actor-critic", &training.actor_critic.component),
    ] {
        lines.push(format!(
            "  {name}: batch {} x {} acc, {} steps/epoch, starts after epoch {}",
            component.batch_num_samples,
            component.grad_acc_steps,
            component.steps_per_epoch,
            component.start_after_epochs
        ));
    }
    let ac = &training.actor_critic;
    lines.push(format!(
        "  Imagination: horizon {}, burn-in {}, gamma {}, lambda {}",
        ac.imagine_horizon, ac.burn_in, ac.gamma, ac.lambda_
    ));
    lines.join("\n")
}

/// Format evaluation settings as a string
pub fn format_evaluation_info(config: &TrainConfig) -> String {
    let evaluation = &config.evaluation_settings;
    if !evaluation.should {
        return "  Evaluation: disabled".to_string();
    }

    let mut lines = vec![format!("  Every {} epochs", evaluation.every)];
    if evaluation.tokenizer.save_reconstructions {
        lines.push("  Saves tokenizer reconstructions".to_string());
    }
    lines.push(format!(
        "  Imagined episodes saved: {} (horizon {})",
        evaluation.actor_critic.num_episodes_to_save, evaluation.actor_critic.horizon
    ));
    lines.join("\n")
}

/// Print detailed configuration summary
pub fn print_detailed_summary(config: &TrainConfig) {
    println!();
    println!("Configuration Summary:");
    println!("{}", format_common_info(config));
    println!();
    println!("Collectors:");
    println!(
        "{}",
        format_collector_info("Train", &config.collector_train)
    );
    println!("{}", format_collector_info("Test", &config.collector_test));
    println!();
    println!("Training:");
    println!("{}", format_training_info(config));
    println!();
    println!("Evaluation:");
    println!("{}", format_evaluation_info(config));
}

pub fn run_validate(args: ValidateArgs, level: LogLevel) -> Result<(), String> {
    log(
        level,
        LogLevel::Normal,
        &format!("Validating config: {}", args.config.display()),
    );

    let config = load_config_with_overrides(&args.config, &args.overrides)
        .map_err(|e| format!("Validation failed [{}]: {e}", e.code()))?;

    log(level, LogLevel::Normal, "Configuration is valid");

    if args.detailed && level != LogLevel::Quiet {
        print_detailed_summary(&config);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{generate_config, Template};
    use std::path::PathBuf;

    #[test]
    fn test_format_common_info() {
        let config = generate_config(Template::Default);
        let info = format_common_info(&config);
        assert!(info.contains("600"));
        assert!(info.contains("cuda:0"));
        assert!(info.contains("Seed: 0"));
        assert!(!info.contains("Resume"));
    }

    #[test]
    fn test_format_common_info_resume() {
        let mut config = generate_config(Template::Default);
        config.common.resume = true;
        config.common.resume_path = Some(PathBuf::from("output/run"));
        assert!(format_common_info(&config).contains("output/run"));
    }

    #[test]
    fn test_format_collector_info() {
        let config = generate_config(Template::Default);
        let train = format_collector_info("Train", &config.collector_train);
        assert!(train.contains("Steps per call: 200"));
        assert!(train.contains("Stops after epoch: 500"));
        assert!(!train.contains("Episodes per call"));

        let test = format_collector_info("Test", &config.collector_test);
        assert!(test.contains("Episodes per call: 16"));
        assert!(!test.contains("Stops after"));
    }

    #[test]
    fn test_format_training_info() {
        let config = generate_config(Template::Default);
        let info = format_training_info(&config);
        assert!(info.contains("0.0001"));
        assert!(info.contains("starts after epoch 50"));
        assert!(info.contains("gamma 0.995"));
    }

    #[test]
    fn test_format_training_info_disabled() {
        let mut config = generate_config(Template::Default);
        config.training_settings.should = false;
        assert_eq!(format_training_info(&config), "  Training: disabled");
    }

    #[test]
    fn test_format_evaluation_info() {
        let config = generate_config(Template::Default);
        let info = format_evaluation_info(&config);
        assert!(info.contains("Every 5 epochs"));
        assert!(info.contains("reconstructions"));

        let debug = generate_config(Template::Debug);
        assert!(!format_evaluation_info(&debug).contains("reconstructions"));
    }
}
