/// Deprecated-field stripper for JSON documents (e.g. `OpenAPI` specs)
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde_json::Value;

/// Remove every object carrying `"deprecated": true`
///
/// Removed array elements disappear from the array and removed member values
/// drop their key. Returns `None` when `value` itself is deprecated.
pub fn strip_deprecated(value: Value) -> Option<Value> {
    match value {
        Value::Array(items) => Some(Value::Array(
            items.into_iter().filter_map(strip_deprecated).collect(),
        )),
        Value::Object(map) => {
            if map.get("deprecated") == Some(&Value::Bool(true)) {
                return None;
            }
            Some(Value::Object(
                map.into_iter()
                    .filter_map(|(key, val)| strip_deprecated(val).map(|v| (key, v)))
                    .collect(),
            ))
        }
        other => Some(other),
    }
}

/// Strip one file and rewrite it in place
fn strip_file(path: &Path) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value: Value = serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;

    let Some(cleaned) = strip_deprecated(value) else {
        bail!("{} is deprecated as a whole; refusing to empty it", path.display());
    };

    // replace the link target, not the link
    let target = std::fs::canonicalize(path)
        .with_context(|| format!("Failed to resolve {}", path.display()))?;
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(&dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    serde_json::to_writer(&mut tmp, &cleaned)?;
    tmp.flush()?;
    tmp.as_file()
        .set_permissions(std::fs::metadata(&target)?.permissions())
        .with_context(|| format!("Failed to copy permissions of {}", path.display()))?;
    tmp.persist(&target)
        .with_context(|| format!("Failed to replace {}", path.display()))?;

    Ok(())
}

pub fn strip_deprecated_command(files: &[PathBuf]) -> Result<()> {
    for path in files {
        strip_file(path)?;
        println!("Stripped deprecated entries from {}", path.display());
    }
    Ok(())
}
