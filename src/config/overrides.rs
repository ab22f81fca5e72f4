//! Command-line overrides (`section.key=value`) applied to a parsed document
//!
//! Overrides land before interpolation, so overriding
//! `common.sequence_length` also moves every key that references it.

use serde_yaml::{Mapping, Value};

/// Override errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OverrideError {
    #[error("Malformed override '{0}' (expected dotted.key=value)")]
    Malformed(String),

    #[error("Cannot override '{path}': '{parent}' is not a mapping")]
    NotAMapping { path: String, parent: String },
}

/// Parse one `dotted.key=value` item; the value is read as YAML.
pub fn parse_override(item: &str) -> Result<(String, Value), OverrideError> {
    let (key, raw) = item
        .split_once('=')
        .ok_or_else(|| OverrideError::Malformed(item.to_string()))?;
    let key = key.trim();

    if key.is_empty() || key.split('.').any(str::is_empty) {
        return Err(OverrideError::Malformed(item.to_string()));
    }

    // Anything YAML cannot read is taken as a plain string
    let value = serde_yaml::from_str::<Value>(raw.trim())
        .unwrap_or_else(|_| Value::String(raw.trim().to_string()));
    Ok((key.to_string(), value))
}

/// Apply overrides in order; later items win.
pub fn apply_overrides<S: AsRef<str>>(
    root: &mut Value,
    overrides: &[S],
) -> Result<(), OverrideError> {
    for item in overrides {
        let (path, value) = parse_override(item.as_ref())?;
        tracing::debug!(%path, "applying override");
        set_path(root, &path, value)?;
    }
    Ok(())
}

/// Set `path` to `value`, creating missing intermediate mappings.
pub fn set_path(root: &mut Value, path: &str, value: Value) -> Result<(), OverrideError> {
    let segments: Vec<&str> = path.split('.').collect();
    let (leaf, parents) = segments
        .split_last()
        .ok_or_else(|| OverrideError::Malformed(path.to_string()))?;

    let mut node = root;
    for (depth, segment) in parents.iter().enumerate() {
        let map = as_mapping(node, path, &segments[..depth])?;
        node = map
            .entry(Value::String((*segment).to_string()))
            .or_insert_with(|| Value::Mapping(Mapping::new()));
    }

    let map = as_mapping(node, path, parents)?;
    map.insert(Value::String((*leaf).to_string()), value);
    Ok(())
}

fn as_mapping<'a>(
    node: &'a mut Value,
    path: &str,
    parent: &[&str],
) -> Result<&'a mut Mapping, OverrideError> {
    if node.is_null() {
        *node = Value::Mapping(Mapping::new());
    }
    match node {
        Value::Mapping(map) => Ok(map),
        _ => Err(OverrideError::NotAMapping {
            path: path.to_string(),
            parent: if parent.is_empty() {
                "<root>".to_string()
            } else {
                parent.join(".")
            },
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::interpolate::lookup;

    fn parse(yaml: &str) -> Value {
        serde_yaml::from_str(yaml).expect("test YAML should parse")
    }

    #[test]
    fn test_parse_scalar_types() {
        assert_eq!(
            parse_override("common.epochs=10").unwrap(),
            ("common.epochs".to_string(), Value::Number(10.into()))
        );
        assert_eq!(
            parse_override("common.do_checkpoint=false").unwrap().1,
            Value::Bool(false)
        );
        assert_eq!(
            parse_override("common.device=cuda:1").unwrap().1,
            Value::String("cuda:1".to_string())
        );
        assert_eq!(parse_override("common.seed=null").unwrap().1, Value::Null);
    }

    #[test]
    fn test_parse_flow_sequence() {
        let (_, value) =
            parse_override("training_settings.sampling_weights=[0.25, 0.25, 0.25, 0.25]").unwrap();
        assert_eq!(value.as_sequence().map(Vec::len), Some(4));
    }

    #[test]
    fn test_malformed_overrides() {
        for item in ["common.epochs", "=3", "common..epochs=3", ".epochs=3"] {
            assert!(
                matches!(parse_override(item), Err(OverrideError::Malformed(_))),
                "{item} should be malformed"
            );
        }
    }

    #[test]
    fn test_override_existing_key() {
        let mut root = parse("common:\n  epochs: 600\n  device: cpu\n");
        apply_overrides(&mut root, &["common.epochs=3"]).unwrap();
        assert_eq!(lookup(&root, "common.epochs"), Some(&Value::Number(3.into())));
        assert_eq!(
            lookup(&root, "common.device"),
            Some(&Value::String("cpu".to_string()))
        );
    }

    #[test]
    fn test_override_creates_sections() {
        let mut root = parse("{}");
        apply_overrides(&mut root, &["wandb.project=demo"]).unwrap();
        assert_eq!(
            lookup(&root, "wandb.project"),
            Some(&Value::String("demo".to_string()))
        );
    }

    #[test]
    fn test_later_override_wins() {
        let mut root = parse("common:\n  seed: 0\n");
        apply_overrides(&mut root, &["common.seed=1", "common.seed=2"]).unwrap();
        assert_eq!(lookup(&root, "common.seed"), Some(&Value::Number(2.into())));
    }

    #[test]
    fn test_override_through_scalar_fails() {
        let mut root = parse("common:\n  epochs: 600\n");
        let err = apply_overrides(&mut root, &["common.epochs.value=1"]).unwrap_err();
        assert_eq!(
            err,
            OverrideError::NotAMapping {
                path: "common.epochs.value".to_string(),
                parent: "common.epochs".to_string(),
            }
        );
    }
}
