//! Info command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{
    load_config_with_overrides, to_json_string, to_yaml_string, InfoArgs, OutputFormat,
    TrainConfig,
};
use crate::layout::RunLayout;
use crate::schedule::{summarize, RunSummary};

/// Format the run summary as a string
pub fn format_run_summary(summary: &RunSummary) -> String {
    let mut lines = vec![
        format!("Epochs: {}", summary.epochs),
        format!("Collection epochs: {}", summary.collection_epochs),
        format!("Evaluation epochs: {}", summary.evaluation_epochs),
        format!("Checkpoints written: {}", summary.checkpoint_epochs),
    ];
    for phase in &summary.phases {
        lines.push(format!(
            "{}: trains {} epochs ({} optimizer steps, {} samples), evaluated {} times",
            phase.phase,
            phase.training_epochs,
            phase.optimizer_steps,
            phase.samples,
            phase.evaluation_epochs
        ));
    }
    lines.join("\n")
}

fn print_text(config: &TrainConfig, level: LogLevel) -> Result<(), String> {
    log(level, LogLevel::Normal, "Configuration Info:");
    println!();
    if let Some(project) = &config.wandb.project {
        println!("Project: {project}");
    }
    println!("Device: {}", config.common.device);

    let layout = RunLayout::resolve(config, chrono::Local::now().naive_local())
        .map_err(|e| e.to_string())?;
    if layout.resumed {
        println!("Run directory: {} (resumed)", layout.base.display());
    } else {
        println!("Run directory: {}", layout.base.display());
    }
    println!();
    println!("{}", format_run_summary(&summarize(config)));
    Ok(())
}

pub fn run_info(args: InfoArgs, level: LogLevel) -> Result<(), String> {
    let config = load_config_with_overrides(&args.config, &args.overrides)
        .map_err(|e| format!("Config error [{}]: {e}", e.code()))?;

    match args.format {
        OutputFormat::Text => print_text(&config, level)?,
        OutputFormat::Json => {
            println!("{}", to_json_string(&config).map_err(|e| e.to_string())?);
        }
        OutputFormat::Yaml => {
            print!("{}", to_yaml_string(&config).map_err(|e| e.to_string())?);
        }
    }

    Ok(())
}
