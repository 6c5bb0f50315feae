//! Template manifest (`template.yaml`)
//!
//! The manifest declares every option the template understands, its default and
//! its domain, plus the rules that decide which paths of the tree are emitted.
//!
//! ```yaml
//! namespace: cookiecutter
//! variables:
//!   - name: project_name
//!     default: My Awesome Project
//!   - name: use_docker
//!     kind: flag
//!     default: "n"
//!   - name: ci_tool
//!     choices: ["None", "Travis", "Gitlab", "Github"]
//! conditional_paths:
//!   - when: "cookiecutter.use_docker == 'y'"
//!     paths: ["compose", "local.yml"]
//! ```

use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::{Result, ScaffoldError};

/// File name of the manifest inside a template directory
pub const MANIFEST_FILE: &str = "template.yaml";

fn default_namespace() -> String {
    "cookiecutter".to_string()
}

/// How an option's value is constrained
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    /// Free-form string
    #[default]
    Text,
    /// `y` or `n`
    Flag,
    /// One of an enumerated list of values
    Choice,
}

/// One declared option
#[derive(Debug, Clone, Deserialize)]
pub struct Variable {
    /// Option name, as referenced by `{{ namespace.name }}`
    pub name: String,
    #[serde(default)]
    kind: VariableKind,
    /// Default value; may itself be a template over earlier options
    #[serde(default)]
    pub default: Option<String>,
    /// Allowed values for a choice option, first one is the default
    #[serde(default)]
    pub choices: Vec<String>,
    /// Short description shown by `turbo-drf options`
    #[serde(default)]
    pub help: Option<String>,
}

impl Variable {
    /// Effective kind; a non-empty `choices` list always makes a choice option
    pub fn kind(&self) -> VariableKind {
        if self.choices.is_empty() {
            self.kind
        } else {
            VariableKind::Choice
        }
    }
}

/// Inclusion rule for part of the template tree
#[derive(Debug, Clone, Deserialize)]
pub struct PathRule {
    /// Expression over the namespace; the paths are kept only when it is true
    pub when: String,
    /// Project-relative paths (may contain placeholders); directories cover their subtree
    pub paths: Vec<String>,
}

/// Parsed `template.yaml`
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateManifest {
    /// Name under which options are exposed to templates
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Declared options, in resolution order
    pub variables: Vec<Variable>,
    /// Conditional inclusion rules
    #[serde(default)]
    pub conditional_paths: Vec<PathRule>,
}

impl TemplateManifest {
    /// Load and check the manifest of the template at `template_dir`
    pub fn load(template_dir: &Path) -> Result<Self> {
        let path = template_dir.join(MANIFEST_FILE);
        let contents =
            std::fs::read_to_string(&path).map_err(|e| ScaffoldError::io(&path, e))?;
        Self::parse(&contents, path)
    }

    /// Parse manifest text; `path` is only used for error reporting
    pub fn parse(contents: &str, path: PathBuf) -> Result<Self> {
        let manifest: TemplateManifest =
            serde_yaml::from_str(contents).map_err(|e| ScaffoldError::Manifest {
                path: path.clone(),
                message: e.to_string(),
            })?;
        manifest.check().map_err(|message| ScaffoldError::Manifest { path, message })?;
        Ok(manifest)
    }

    /// Look up a declared option
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }

    fn check(&self) -> std::result::Result<(), String> {
        if self.namespace.is_empty()
            || !self
                .namespace
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(format!("invalid namespace '{}'", self.namespace));
        }

        let mut seen = HashSet::new();
        for var in &self.variables {
            if !seen.insert(var.name.as_str()) {
                return Err(format!("option '{}' is declared twice", var.name));
            }
            match var.kind() {
                VariableKind::Choice => {
                    if var.choices.is_empty() {
                        return Err(format!("choice option '{}' has no choices", var.name));
                    }
                    if let Some(default) = &var.default {
                        if !var.choices.contains(default) {
                            return Err(format!(
                                "default '{default}' of '{}' is not one of its choices",
                                var.name
                            ));
                        }
                    }
                }
                VariableKind::Flag => match var.default.as_deref() {
                    Some("y") | Some("n") => {}
                    other => {
                        return Err(format!(
                            "flag option '{}' needs a default of \"y\" or \"n\", got {other:?}",
                            var.name
                        ))
                    }
                },
                VariableKind::Text => {}
            }
        }
        Ok(())
    }
}
