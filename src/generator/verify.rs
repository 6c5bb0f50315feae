//! Post-render checks on a generated tree.

use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Result, ScaffoldError};

/// How many leading bytes the binary heuristic inspects
const BINARY_SNIFF_LEN: usize = 8192;

/// Content heuristic: a NUL byte near the start, or bytes that are not UTF-8
pub fn is_binary(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(BINARY_SNIFF_LEN)];
    head.contains(&0) || std::str::from_utf8(bytes).is_err()
}

/// Pattern of a placeholder left behind by rendering: `{{ namespace.key }}`
pub fn placeholder_pattern(namespace: &str) -> std::result::Result<Regex, regex::Error> {
    Regex::new(&format!(
        r"\{{\{{(\s?{})[.](.*?)\}}\}}",
        regex::escape(namespace)
    ))
}

/// First unresolved placeholder in the tree, as `(project-relative path, 1-based line)`
///
/// Binary files are skipped.
pub fn find_unresolved(project: &Path, namespace: &str) -> Result<Option<(PathBuf, usize)>> {
    let pattern = placeholder_pattern(namespace).map_err(|e| ScaffoldError::Manifest {
        path: project.to_path_buf(),
        message: format!("invalid namespace pattern: {e}"),
    })?;

    for entry in WalkDir::new(project).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(project).to_path_buf();
            ScaffoldError::io(path, e.into())
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let bytes = fs::read(entry.path()).map_err(|e| ScaffoldError::io(entry.path(), e))?;
        if is_binary(&bytes) {
            continue;
        }
        let text = String::from_utf8_lossy(&bytes);
        if let Some(idx) = text.lines().position(|line| pattern.is_match(line)) {
            let rel = entry
                .path()
                .strip_prefix(project)
                .unwrap_or(entry.path())
                .to_path_buf();
            return Ok(Some((rel, idx + 1)));
        }
    }
    Ok(None)
}

/// Fail with [`ScaffoldError::UnresolvedPlaceholder`] if any placeholder survived
pub fn verify_rendered(project: &Path, namespace: &str) -> Result<()> {
    match find_unresolved(project, namespace)? {
        Some((path, line)) => Err(ScaffoldError::UnresolvedPlaceholder { path, line }),
        None => Ok(()),
    }
}
