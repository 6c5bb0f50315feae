//! # Options Module
//!
//! Resolves the option set for one generation run.
//!
//! ## Sources
//!
//! Values come from, lowest precedence first:
//!
//! 1. defaults declared in `template.yaml`
//! 2. `default_context` of the user configuration file
//! 3. a replay file from an earlier run
//! 4. `key=value` extra context given on the command line
//!
//! Sources 2-4 are merged into a single override map with [`merge_overrides`]
//! before [`OptionSet::resolve`] walks the manifest.
//!
//! ## Derived defaults
//!
//! A default may reference earlier options, e.g. the slug:
//!
//! ```yaml
//! - name: project_slug
//!   default: "{{ cookiecutter.project_name|lower|replace(' ', '_') }}"
//! ```
//!
//! Defaults are rendered in declaration order, after overrides for earlier
//! options have been applied, so `project_name=Foo Bar` yields the slug `foo_bar`.

mod manifest;

pub use manifest::{PathRule, TemplateManifest, Variable, VariableKind, MANIFEST_FILE};

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::engine;
use crate::error::{Result, ScaffoldError, ValidationError};

/// Option name of the project slug
pub const PROJECT_SLUG: &str = "project_slug";

/// Merge override layers; later layers win
pub fn merge_overrides<'a, I>(layers: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = &'a BTreeMap<String, String>>,
{
    let mut merged = BTreeMap::new();
    for layer in layers {
        for (key, value) in layer {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

/// Parse `key=value` extra context arguments
pub fn parse_extra_context<S: AsRef<str>>(args: &[S]) -> Result<BTreeMap<String, String>> {
    let mut map = BTreeMap::new();
    for arg in args {
        let arg = arg.as_ref();
        let malformed = |reason: &str| ValidationError::InvalidValue {
            option: arg.to_string(),
            value: String::new(),
            reason: reason.to_string(),
        };
        let (key, value) = arg
            .split_once('=')
            .ok_or_else(|| malformed("extra context must be given as key=value"))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(malformed("empty option name").into());
        }
        map.insert(key.to_string(), value.to_string());
    }
    Ok(map)
}

/// The resolved option values of one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OptionSet {
    values: BTreeMap<String, String>,
}

impl OptionSet {
    /// Build an option set directly from values, without a manifest
    pub fn from_values(values: BTreeMap<String, String>) -> Self {
        Self { values }
    }

    /// Resolve defaults from `manifest` and apply `overrides`
    ///
    /// Flag values are lowercased. Overrides for names the manifest does not
    /// declare are kept (templates can still use them) but logged.
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::Template`] if a derived default fails to render.
    pub fn resolve(
        manifest: &TemplateManifest,
        overrides: &BTreeMap<String, String>,
    ) -> Result<Self> {
        let env = engine::environment();
        let mut values = BTreeMap::new();

        for (name, value) in overrides {
            if manifest.variable(name).is_none() {
                warn!(option = %name, "override for an option the template does not declare");
                values.insert(name.clone(), value.clone());
            }
        }

        for var in &manifest.variables {
            let value = match overrides.get(&var.name) {
                Some(value) => value.clone(),
                None => match &var.default {
                    Some(default) => {
                        let ctx = engine::context(&manifest.namespace, &values);
                        env.render_str(default, ctx).map_err(|e| {
                            ScaffoldError::template(
                                format!("{MANIFEST_FILE}: default of {}", var.name),
                                e,
                            )
                        })?
                    }
                    None => var.choices.first().cloned().unwrap_or_default(),
                },
            };
            let value = match var.kind() {
                VariableKind::Flag => value.trim().to_lowercase(),
                _ => value,
            };
            debug!(option = %var.name, value = %value, "resolved option");
            values.insert(var.name.clone(), value);
        }

        Ok(Self { values })
    }

    /// Value of an option
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Value of an option, or the empty string when unset
    pub fn value(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }

    /// Whether a flag option is set to `y`
    pub fn flag(&self, name: &str) -> bool {
        self.get(name)
            .map(|v| v.eq_ignore_ascii_case("y"))
            .unwrap_or(false)
    }

    /// The project slug (output directory name)
    pub fn slug(&self) -> &str {
        self.value(PROJECT_SLUG)
    }

    /// Set or replace a value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// All values, sorted by name
    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    /// Iterate `(name, value)` pairs, sorted by name
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
