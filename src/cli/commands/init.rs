//! Init command implementation

use std::fs;
use std::path::Path;

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{generate_yaml, InitArgs};

/// Write `content` to `path`, refusing to replace an existing file unless `force`
pub fn write_template(path: &Path, content: &str, force: bool) -> Result<(), String> {
    if path.exists() && !force {
        return Err(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        ));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
    }
    fs::write(path, content).map_err(|e| format!("Failed to write {}: {e}", path.display()))
}

pub fn run_init(args: InitArgs, level: LogLevel) -> Result<(), String> {
    let yaml = generate_yaml(args.template);

    match &args.output {
        Some(path) => {
            write_template(path, &yaml, args.force)?;
            log(
                level,
                LogLevel::Normal,
                &format!("Wrote {} template to {}", args.template, path.display()),
            );
        }
        None => print!("{yaml}"),
    }

    Ok(())
}
