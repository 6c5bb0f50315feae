use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, ScaffoldError};
use crate::options::TemplateManifest;

/// A template directory: `template.yaml` plus one project root directory
///
/// ```text
/// template/
/// ├── template.yaml
/// └── {{cookiecutter.project_slug}}/
///     └── ...
/// ```
#[derive(Debug, Clone)]
pub struct Template {
    /// Template directory
    pub dir: PathBuf,
    /// Parsed manifest
    pub manifest: TemplateManifest,
    /// Unrendered name of the project root directory
    pub root: String,
}

impl Template {
    /// Load the template at `dir`
    ///
    /// # Errors
    ///
    /// Fails when the manifest is missing or malformed, or when the directory
    /// does not contain exactly one top-level directory with a placeholder in
    /// its name.
    pub fn load(dir: &Path) -> Result<Self> {
        let manifest = TemplateManifest::load(dir)?;
        let entries = fs::read_dir(dir).map_err(|e| ScaffoldError::io(dir, e))?;

        let mut roots = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ScaffoldError::io(dir, e))?;
            let is_dir = entry
                .file_type()
                .map_err(|e| ScaffoldError::io(entry.path(), e))?
                .is_dir();
            let name = entry.file_name().to_string_lossy().into_owned();
            if is_dir && name.contains("{{") && name.contains(&manifest.namespace) {
                roots.push(name);
            }
        }

        match roots.len() {
            1 => Ok(Self {
                dir: dir.to_path_buf(),
                manifest,
                root: roots.remove(0),
            }),
            0 => Err(ScaffoldError::Manifest {
                path: dir.to_path_buf(),
                message: format!(
                    "no project root directory (expected a name like {{{{{}.project_slug}}}})",
                    manifest.namespace
                ),
            }),
            _ => Err(ScaffoldError::Manifest {
                path: dir.to_path_buf(),
                message: format!("more than one project root directory: {}", roots.join(", ")),
            }),
        }
    }

    /// Path of the unrendered project root
    pub fn root_dir(&self) -> PathBuf {
        self.dir.join(&self.root)
    }
}
