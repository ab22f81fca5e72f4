//! `${dotted.path}` interpolation over a parsed document
//!
//! A scalar that is exactly one reference takes the referenced node with its
//! type intact, so `horizon: ${common.sequence_length}` stays an integer.
//! References embedded in longer strings are substituted textually and must
//! point at scalars.

use serde_yaml::Value;

/// Interpolation errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InterpolationError {
    #[error("Unresolved reference ${{{reference}}}: no such key in the document")]
    Unresolved { reference: String },

    #[error("Reference cycle: {chain}")]
    Cycle { chain: String },

    #[error("Reference ${{{reference}}} points at a mapping or sequence and cannot be embedded in a string")]
    NotScalar { reference: String },

    #[error("Unterminated reference in value: {value}")]
    Unterminated { value: String },
}

/// Resolve every reference in `root`, returning a reference-free copy.
pub fn resolve(root: &Value) -> Result<Value, InterpolationError> {
    let mut stack = Vec::new();
    resolve_node(root, root, &mut stack)
}

/// Whether any string scalar under `node` carries a reference.
pub fn has_references(node: &Value) -> bool {
    match node {
        Value::String(s) => s.contains("${"),
        Value::Sequence(items) => items.iter().any(has_references),
        Value::Mapping(map) => map.values().any(has_references),
        Value::Tagged(tagged) => has_references(&tagged.value),
        _ => false,
    }
}

/// Look up a dotted path; numeric segments index into sequences.
pub fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(root, |node, segment| match node {
        Value::Sequence(_) => segment.parse::<usize>().ok().and_then(|i| node.get(i)),
        _ => node.get(segment),
    })
}

fn resolve_node(
    node: &Value,
    root: &Value,
    stack: &mut Vec<String>,
) -> Result<Value, InterpolationError> {
    match node {
        Value::Mapping(map) => {
            let mut out = serde_yaml::Mapping::with_capacity(map.len());
            for (key, value) in map {
                out.insert(key.clone(), resolve_node(value, root, stack)?);
            }
            Ok(Value::Mapping(out))
        }
        Value::Sequence(items) => items
            .iter()
            .map(|item| resolve_node(item, root, stack))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Sequence),
        Value::String(s) => {
            if let Some(reference) = whole_reference(s) {
                follow(reference, root, stack)
            } else if s.contains("${") {
                substitute(s, root, stack).map(Value::String)
            } else {
                Ok(node.clone())
            }
        }
        _ => Ok(node.clone()),
    }
}

/// Resolve the node a reference points at.
fn follow(
    reference: &str,
    root: &Value,
    stack: &mut Vec<String>,
) -> Result<Value, InterpolationError> {
    if stack.iter().any(|seen| seen == reference) {
        let mut chain = stack.clone();
        chain.push(reference.to_string());
        return Err(InterpolationError::Cycle {
            chain: chain.join(" -> "),
        });
    }

    let target = lookup(root, reference).ok_or_else(|| InterpolationError::Unresolved {
        reference: reference.to_string(),
    })?;

    stack.push(reference.to_string());
    let resolved = resolve_node(target, root, stack);
    stack.pop();
    resolved
}

/// Replace every embedded reference in `text` with its scalar rendering.
fn substitute(
    text: &str,
    root: &Value,
    stack: &mut Vec<String>,
) -> Result<String, InterpolationError> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after.find('}').ok_or_else(|| InterpolationError::Unterminated {
            value: text.to_string(),
        })?;
        let reference = &after[..end];

        match follow(reference, root, stack)? {
            Value::String(s) => out.push_str(&s),
            Value::Number(n) => out.push_str(&n.to_string()),
            Value::Bool(b) => out.push_str(&b.to_string()),
            Value::Null => out.push_str("null"),
            _ => {
                return Err(InterpolationError::NotScalar {
                    reference: reference.to_string(),
                })
            }
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

/// `Some(path)` when the whole string is a single `${path}` reference.
fn whole_reference(s: &str) -> Option<&str> {
    let inner = s.strip_prefix("${")?.strip_suffix('}')?;
    if inner.is_empty() || inner.contains(['$', '{', '}']) {
        return None;
    }
    Some(inner)
}
