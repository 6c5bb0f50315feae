//! Replay files: the resolved options of a run, saved as JSON
//!
//! ```json
//! { "cookiecutter": { "project_slug": "my_test_project", "use_docker": "y" } }
//! ```

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{Result, ScaffoldError};
use crate::options::OptionSet;

/// Write `options` under `namespace` to `path`
pub fn dump(path: &Path, namespace: &str, options: &OptionSet) -> Result<()> {
    let invalid = |e: serde_json::Error| ScaffoldError::Config {
        path: path.to_path_buf(),
        message: e.to_string(),
    };
    let mut root = Map::new();
    root.insert(
        namespace.to_string(),
        serde_json::to_value(options).map_err(invalid)?,
    );
    let json = serde_json::to_string_pretty(&Value::Object(root)).map_err(invalid)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ScaffoldError::io(parent, e))?;
    }
    fs::write(path, json + "\n").map_err(|e| ScaffoldError::io(path, e))
}

/// Read the option values stored under `namespace` in a replay file
pub fn load(path: &Path, namespace: &str) -> Result<BTreeMap<String, String>> {
    let invalid = |message: String| ScaffoldError::Config {
        path: path.to_path_buf(),
        message,
    };
    let contents = fs::read_to_string(path).map_err(|e| ScaffoldError::io(path, e))?;
    let value: Value = serde_json::from_str(&contents).map_err(|e| invalid(e.to_string()))?;
    let section = value
        .get(namespace)
        .and_then(Value::as_object)
        .ok_or_else(|| invalid(format!("no '{namespace}' object")))?;

    section
        .iter()
        .map(|(key, value)| match value {
            Value::String(s) => Ok((key.clone(), s.clone())),
            other => Err(invalid(format!("value of '{key}' is not a string: {other}"))),
        })
        .collect()
}
