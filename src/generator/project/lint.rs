use std::path::Path;
use std::process::Command;
use tracing::info;

use crate::error::{Result, ScaffoldError};

/// A linter invocation run inside a generated project
#[derive(Debug, Clone)]
pub struct LintCommand {
    /// Display name
    pub tool: &'static str,
    /// Environment variable that overrides the binary
    pub bin_env: &'static str,
    /// Default binary
    pub default_bin: &'static str,
    /// Arguments
    pub args: &'static [&'static str],
}

/// flake8, then black in check mode
pub const LINTERS: &[LintCommand] = &[
    LintCommand {
        tool: "flake8",
        bin_env: "TURBO_DRF_FLAKE8_BIN",
        default_bin: "flake8",
        args: &[],
    },
    LintCommand {
        tool: "black",
        bin_env: "TURBO_DRF_BLACK_BIN",
        default_bin: "black",
        args: &["--check", "--diff", "--exclude", "migrations", "."],
    },
];

/// Run every linter in [`LINTERS`] in `dir`, stopping at the first failure
///
/// # Errors
///
/// [`ScaffoldError::Lint`] when a linter exits non-zero, or
/// [`ScaffoldError::Io`] when it cannot be started.
pub fn lint_project(dir: &Path) -> Result<()> {
    for linter in LINTERS {
        // Allow tests to override the binary path without mutating PATH
        let bin = std::env::var(linter.bin_env).unwrap_or_else(|_| linter.default_bin.to_string());

        let status = Command::new(&bin)
            .args(linter.args)
            .current_dir(dir)
            .status()
            .map_err(|e| ScaffoldError::io(&bin, e))?;
        if !status.success() {
            return Err(ScaffoldError::Lint {
                tool: linter.tool.to_string(),
                status: status.to_string(),
            });
        }
        info!(tool = linter.tool, "lint passed");
    }
    Ok(())
}
