//! Entry points for loading and saving run configurations

use super::interpolate;
use super::overrides::apply_overrides;
use super::schema::{TrainConfig, REQUIRED_KEYS};
use super::validate::{validate_config, ValidationError};
use crate::error::{Error, Result};
use serde_yaml::Value;
use std::fs;
use std::path::Path;

/// Origin reported for documents that did not come from a file
const INLINE_ORIGIN: &str = "<inline>";

/// Load, resolve and validate a configuration file
///
/// This is the main entry point for consumers. It:
/// 1. Reads the YAML (or JSON) document
/// 2. Checks that every required section and key is present
/// 3. Resolves `${...}` references
/// 4. Deserializes into [`TrainConfig`]
/// 5. Validates the result
///
/// # Example
///
/// ```no_run
/// use iris_config::config::load_config;
///
/// let config = load_config("configs/trainer.yaml")?;
/// println!("{} epochs on {}", config.common.epochs, config.common.device);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn load_config<P: AsRef<Path>>(config_path: P) -> Result<TrainConfig> {
    load_config_with_overrides::<P, &str>(config_path, &[])
}

/// Load a configuration file with `section.key=value` overrides applied
///
/// Overrides are applied to the raw document, before references are
/// resolved and before validation.
pub fn load_config_with_overrides<P: AsRef<Path>, S: AsRef<str>>(
    config_path: P,
    overrides: &[S],
) -> Result<TrainConfig> {
    let path = config_path.as_ref();
    let content = read_document(path)?;
    let config = build_config(&content, path, overrides)?;
    tracing::info!(path = %path.display(), epochs = config.common.epochs, "configuration loaded");
    Ok(config)
}

/// Parse, resolve and validate a configuration held in memory
pub fn from_yaml_str(content: &str) -> Result<TrainConfig> {
    build_config::<&str>(content, Path::new(INLINE_ORIGIN), &[])
}

/// Parse a document into its raw tree without resolving or validating it
pub fn parse_document(content: &str, origin: &Path) -> Result<Value> {
    serde_yaml::from_str(content).map_err(|e| Error::ConfigParsing {
        path: origin.to_path_buf(),
        message: e.to_string(),
    })
}

/// Report the first required key absent from `root`
pub fn check_required_keys(root: &Value) -> std::result::Result<(), ValidationError> {
    match REQUIRED_KEYS
        .iter()
        .find(|key| interpolate::lookup(root, key).is_none())
    {
        Some(key) => Err(ValidationError::MissingKey((*key).to_string())),
        None => Ok(()),
    }
}

fn read_document(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Error::io(format!("reading config file: {}", path.display()), e)
        }
    })
}

fn build_config<S: AsRef<str>>(
    content: &str,
    origin: &Path,
    overrides: &[S],
) -> Result<TrainConfig> {
    let mut root = parse_document(content, origin)?;
    apply_overrides(&mut root, overrides)?;
    check_required_keys(&root)?;

    let resolved = if interpolate::has_references(&root) {
        tracing::debug!(origin = %origin.display(), "resolving references");
        interpolate::resolve(&root)?
    } else {
        root
    };

    let config: TrainConfig =
        serde_yaml::from_value(resolved).map_err(|e| Error::ConfigParsing {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })?;

    validate_config(&config)?;
    Ok(config)
}

/// Serialize a configuration to YAML
pub fn to_yaml_string(config: &TrainConfig) -> Result<String> {
    serde_yaml::to_string(config).map_err(|e| Error::Serialization {
        message: format!("YAML serialization error: {e}"),
    })
}

/// Serialize a configuration to pretty-printed JSON
pub fn to_json_string(config: &TrainConfig) -> Result<String> {
    serde_json::to_string_pretty(config).map_err(|e| Error::Serialization {
        message: format!("JSON serialization error: {e}"),
    })
}

/// Save a configuration; `.json` paths get JSON, anything else YAML
pub fn save_config<P: AsRef<Path>>(config: &TrainConfig, path: P) -> Result<()> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let content = if is_json {
        to_json_string(config)?
    } else {
        to_yaml_string(config)?
    };

    fs::write(path, content)
        .map_err(|e| Error::io(format!("writing config file: {}", path.display()), e))?;
    tracing::debug!(path = %path.display(), "configuration saved");
    Ok(())
}
