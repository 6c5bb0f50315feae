//! # Configuration
//!
//! Two layers of configuration feed a run besides command-line flags.
//!
//! ## User configuration file
//!
//! TOML (`.toml`) or YAML (`.yml` / `.yaml`), located via `--config-file` or
//! the `TURBO_DRF_CONFIG` environment variable:
//!
//! ```toml
//! output_dir = "/home/me/projects"
//!
//! [default_context]
//! author_name = "Jane Doe"
//! email = "jane@example.com"
//! use_docker = "y"
//! ```
//!
//! `default_context` values override the template's own defaults but are in
//! turn overridden by replay files and command-line extra context.
//!
//! ## Environment variables
//!
//! | variable | meaning |
//! |---|---|
//! | `TURBO_DRF_TEMPLATE` | template directory (default: the bundled `template/`) |
//! | `TURBO_DRF_CONFIG` | user configuration file |
//! | `TURBO_DRF_LOG_LEVEL` | see [`crate::logging`] |
//! | `TURBO_DRF_LOG_FORMAT` | see [`crate::logging`] |

use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Result, ScaffoldError};

/// Environment variable naming the template directory
pub const TEMPLATE_ENV: &str = "TURBO_DRF_TEMPLATE";
/// Environment variable naming the user configuration file
pub const CONFIG_ENV: &str = "TURBO_DRF_CONFIG";

/// Contents of the user configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserConfig {
    /// Option values applied on top of the template defaults
    #[serde(default)]
    pub default_context: BTreeMap<String, String>,
    /// Directory the project is generated into when `--output-dir` is not given
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

impl UserConfig {
    /// Load a configuration file, choosing the parser from its extension
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ScaffoldError::io(path, e))?;
        let is_yaml = path
            .extension()
            .map(|ext| ext == "yaml" || ext == "yml")
            .unwrap_or(false);
        let parsed = if is_yaml {
            serde_yaml::from_str(&contents).map_err(|e| e.to_string())
        } else {
            toml::from_str(&contents).map_err(|e| e.to_string())
        };
        parsed.map_err(|message| ScaffoldError::Config {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Load the configuration named explicitly or by `TURBO_DRF_CONFIG`
    ///
    /// With neither set, an empty configuration is returned.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        match explicit
            .map(Path::to_path_buf)
            .or_else(|| env::var_os(CONFIG_ENV).map(PathBuf::from))
        {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }
}

/// Template shipped with the crate
pub fn bundled_template_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("template")
}

/// Resolve the template directory
///
/// Priority:
/// 1. explicitly provided path (via CLI)
/// 2. `TURBO_DRF_TEMPLATE`
/// 3. the bundled template
pub fn resolve_template_dir(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| env::var_os(TEMPLATE_ENV).map(PathBuf::from))
        .unwrap_or_else(bundled_template_dir)
}
