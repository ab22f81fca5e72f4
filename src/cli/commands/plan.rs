//! Plan command implementation

use serde::Serialize;

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{load_config_with_overrides, OutputFormat, PlanArgs};
use crate::schedule::{summarize, CheckpointMode, EpochPlan, Phase, RunSummary, Schedule};

/// Plan printed by `plan --format json|yaml`
#[derive(Debug, Serialize)]
pub struct PlanReport {
    pub summary: RunSummary,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub epochs: Vec<EpochPlan>,
}

fn phase_list(phases: &[Phase]) -> String {
    if phases.is_empty() {
        "-".to_string()
    } else {
        phases
            .iter()
            .map(Phase::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Format one epoch as a table row
pub fn format_plan_line(plan: &EpochPlan) -> String {
    let checkpoint = match plan.checkpoint {
        Some(CheckpointMode::Full) => "full",
        Some(CheckpointMode::AgentOnly) => "agent",
        None => "-",
    };
    let mut eval = if plan.evaluate {
        phase_list(&plan.eval)
    } else {
        "-".to_string()
    };
    if plan.save_reconstructions {
        eval.push_str(" +recon");
    }
    format!(
        "{:>6}  {:<7}  {:<36}  {:<36}  {}",
        plan.epoch,
        if plan.collect_train { "yes" } else { "no" },
        phase_list(&plan.train),
        eval,
        checkpoint
    )
}

pub fn run_plan(args: PlanArgs, level: LogLevel) -> Result<(), String> {
    let config = load_config_with_overrides(&args.config, &args.overrides)
        .map_err(|e| format!("Config error [{}]: {e}", e.code()))?;

    let from = args.from.unwrap_or(1);
    let to = args.to.unwrap_or(config.common.epochs);
    if from > config.common.epochs {
        return Err(format!(
            "--from {from} is beyond common.epochs ({})",
            config.common.epochs
        ));
    }
    if from > to {
        return Err(format!("--from {from} is after --to {to}"));
    }

    let summary = summarize(&config);
    let epochs: Vec<EpochPlan> = if args.summary {
        Vec::new()
    } else {
        Schedule::between(&config, from, to).collect()
    };

    match args.format {
        OutputFormat::Text => {
            log(
                level,
                LogLevel::Normal,
                &format!("Schedule for {}", args.config.display()),
            );
            if !epochs.is_empty() {
                println!(
                    "{:>6}  {:<7}  {:<36}  {:<36}  checkpoint",
                    "epoch", "collect", "train", "eval"
                );
                for plan in &epochs {
                    println!("{}", format_plan_line(plan));
                }
                println!();
            }
            println!("{}", super::info::format_run_summary(&summary));
        }
        OutputFormat::Json => {
            let report = PlanReport { summary, epochs };
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| format!("JSON serialization error: {e}"))?;
            println!("{json}");
        }
        OutputFormat::Yaml => {
            let report = PlanReport { summary, epochs };
            let yaml = serde_yaml::to_string(&report)
                .map_err(|e| format!("YAML serialization error: {e}"))?;
            print!("{yaml}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{generate_config, Template};

    #[test]
    fn test_format_plan_line_evaluation_epoch() {
        let config = generate_config(Template::Debug);
        let line = format_plan_line(&EpochPlan::for_epoch(&config, 4));
        assert!(line.trim_start().starts_with('4'));
        assert!(line.contains("tokenizer,world_model,actor_critic"));
        assert!(line.ends_with("agent"));
    }

    #[test]
    fn test_format_plan_line_quiet_epoch() {
        let mut config = generate_config(Template::Debug);
        config.training_settings.should = false;
        let line = format_plan_line(&EpochPlan::for_epoch(&config, 1));
        assert!(line.contains("no"));
        assert!(line.ends_with('-'));
    }

    #[test]
    fn test_format_plan_line_reconstructions() {
        let mut config = generate_config(Template::Debug);
        config.evaluation_settings.tokenizer.save_reconstructions = true;
        let line = format_plan_line(&EpochPlan::for_epoch(&config, 2));
        assert!(line.contains("+recon"));
    }

    #[test]
    fn test_plan_report_json_shape() {
        let config = generate_config(Template::Debug);
        let report = PlanReport {
            summary: summarize(&config),
            epochs: Schedule::between(&config, 1, 2).collect(),
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["epochs"].as_array().unwrap().len(), 2);
        assert_eq!(value["epochs"][1]["train"][1], "world_model");
        assert_eq!(value["epochs"][0]["checkpoint"], "agent_only");
        assert_eq!(value["summary"]["epochs"], 6);
    }
}
