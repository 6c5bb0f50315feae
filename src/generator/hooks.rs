//! Post-generation hooks
//!
//! Hooks run against the staged project after rendering and before the
//! placeholder scan. A failing hook aborts the run and the staged project is
//! discarded.

use rand::Rng;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, info};
use walkdir::WalkDir;

use super::verify::is_binary;
use crate::error::{Result, ScaffoldError};
use crate::options::OptionSet;

/// A step run on the generated project before it is committed
pub trait PostGenHook {
    /// Short name used in logs and errors
    fn name(&self) -> &'static str;

    /// Run the hook on the staged project directory
    fn run(&self, project: &Path, options: &OptionSet) -> Result<()>;
}

/// Hooks run by a default generation, in order
pub fn default_hooks() -> Vec<Box<dyn PostGenHook>> {
    vec![Box::new(SecretsHook), Box::new(GitignoreHook)]
}

/// Value used for every secret when `debug = y`
pub const DEBUG_VALUE: &str = "debug";

const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

#[allow(clippy::expect_used)]
fn marker_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"!!!SET ([A-Z][A-Z0-9_]*)!!!").expect("valid marker pattern"))
}

fn random_string(charset: &[u8], len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| charset[rng.gen_range(0..charset.len())] as char)
        .collect()
}

/// Value for a `!!!SET <NAME>!!!` marker
pub fn secret_for(name: &str, debug: bool) -> String {
    match name {
        "DJANGO_ADMIN_URL" if debug => format!("{DEBUG_VALUE}/"),
        "DJANGO_ADMIN_URL" => format!("{}/", random_string(ALPHANUMERIC, 32)),
        _ if debug => DEBUG_VALUE.to_string(),
        _ if name.ends_with("_USER") => random_string(LETTERS, 32),
        _ => random_string(ALPHANUMERIC, 64),
    }
}

/// Replaces `!!!SET <NAME>!!!` markers with generated secrets
///
/// Within one file every occurrence of a name gets the same value; each file
/// gets fresh values.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecretsHook;

impl PostGenHook for SecretsHook {
    fn name(&self) -> &'static str {
        "secrets"
    }

    fn run(&self, project: &Path, options: &OptionSet) -> Result<()> {
        let debug_mode = options.flag("debug");
        let pattern = marker_pattern();
        let mut replaced = 0usize;

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
            if !pattern.is_match(&text) {
                continue;
            }
            let mut secrets: HashMap<String, String> = HashMap::new();
            let updated = pattern.replace_all(&text, |caps: &Captures<'_>| {
                replaced += 1;
                secrets
                    .entry(caps[1].to_string())
                    .or_insert_with(|| secret_for(&caps[1], debug_mode))
                    .clone()
            });
            fs::write(entry.path(), updated.as_bytes())
                .map_err(|e| ScaffoldError::io(entry.path(), e))?;
            debug!(path = %entry.path().display(), "secrets set");
        }

        info!(count = replaced, debug_mode, "secret markers replaced");
        Ok(())
    }
}

/// Keeps environment files out of version control
///
/// Applies when `.envs/` is generated (Docker or Heroku): appends `.env` and
/// `.envs/*`, then re-includes `.envs/.local/` when `keep_local_envs_in_vcs = y`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitignoreHook;

impl PostGenHook for GitignoreHook {
    fn name(&self) -> &'static str {
        "gitignore"
    }

    fn run(&self, project: &Path, options: &OptionSet) -> Result<()> {
        if !options.flag("use_docker") && !options.flag("use_heroku") {
            return Ok(());
        }
        let path = project.join(".gitignore");
        let existing = fs::read_to_string(&path).map_err(|_| ScaffoldError::Hook {
            hook: self.name(),
            message: format!("{} is missing from the generated project", path.display()),
        })?;

        let mut lines = vec![".env", ".envs/*"];
        if options.flag("keep_local_envs_in_vcs") {
            lines.push("!.envs/.local/");
        }

        let mut file = fs::OpenOptions::new()
            .append(true)
            .open(&path)
            .map_err(|e| ScaffoldError::io(&path, e))?;
        let mut block = String::new();
        if !existing.is_empty() && !existing.ends_with('\n') {
            block.push('\n');
        }
        for line in lines {
            block.push_str(line);
            block.push('\n');
        }
        file.write_all(block.as_bytes())
            .map_err(|e| ScaffoldError::io(&path, e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use std::collections::BTreeMap;

    fn options(pairs: &[(&str, &str)]) -> OptionSet {
        OptionSet::from_values(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
        )
    }

    #[test]
    fn test_secret_shapes() {
        let key = secret_for("DJANGO_SECRET_KEY", false);
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_alphanumeric()));

        let url = secret_for("DJANGO_ADMIN_URL", false);
        assert_eq!(url.len(), 33);
        assert!(url.ends_with('/'));

        let user = secret_for("POSTGRES_USER", false);
        assert_eq!(user.len(), 32);
        assert!(user.chars().all(|c| c.is_ascii_alphabetic()));

        assert_eq!(secret_for("POSTGRES_PASSWORD", true), "debug");
        assert_eq!(secret_for("DJANGO_ADMIN_URL", true), "debug/");
    }

    #[test]
    fn test_secrets_hook_replaces_markers() {
        let dir = tempfile::tempdir().expect("tempdir");
        let envs = dir.path().join(".envs").join(".production");
        fs::create_dir_all(&envs).unwrap();
        fs::write(
            envs.join(".django"),
            "DJANGO_SECRET_KEY=!!!SET DJANGO_SECRET_KEY!!!\nDJANGO_ADMIN_URL=!!!SET DJANGO_ADMIN_URL!!!\n",
        )
        .unwrap();

        SecretsHook
            .run(dir.path(), &options(&[("debug", "n")]))
            .unwrap();

        let text = fs::read_to_string(envs.join(".django")).unwrap();
        assert!(!text.contains("!!!SET"));
        let key = text
            .lines()
            .find_map(|l| l.strip_prefix("DJANGO_SECRET_KEY="))
            .unwrap();
        assert_eq!(key.len(), 64);
    }

    #[test]
    fn test_repeated_marker_shares_value_within_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let marker = "!!!SET POSTGRES_PASSWORD!!!";
        fs::write(dir.path().join(".postgres"), format!("A={marker}\nB={marker}\n")).unwrap();
        fs::write(dir.path().join(".other"), format!("C={marker}\n")).unwrap();

        SecretsHook
            .run(dir.path(), &options(&[("debug", "n")]))
            .unwrap();

        let text = fs::read_to_string(dir.path().join(".postgres")).unwrap();
        let value = |key: &str| {
            text.lines()
                .find_map(|l| l.strip_prefix(key))
                .unwrap()
                .to_string()
        };
        assert_eq!(value("A="), value("B="));
        assert_eq!(value("A=").len(), 64);

        let other = fs::read_to_string(dir.path().join(".other")).unwrap();
        assert_ne!(other.trim_end().strip_prefix("C=").unwrap(), value("A="));
    }

    #[test]
    fn test_secrets_hook_debug_values() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join("test.py"),
            "SECRET_KEY = \"!!!SET DJANGO_SECRET_KEY!!!\"\n",
        )
        .unwrap();
        SecretsHook
            .run(dir.path(), &options(&[("debug", "y")]))
            .unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("test.py")).unwrap(),
            "SECRET_KEY = \"debug\"\n"
        );
    }

    #[test]
    fn test_gitignore_hook_appends_env_rules() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join(".gitignore"), "*.pyc").unwrap();
        GitignoreHook
            .run(
                dir.path(),
                &options(&[("use_docker", "y"), ("keep_local_envs_in_vcs", "y")]),
            )
            .unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join(".gitignore")).unwrap(),
            "*.pyc\n.env\n.envs/*\n!.envs/.local/\n"
        );
    }

    #[test]
    fn test_gitignore_hook_skips_without_envs() {
        let dir = tempfile::tempdir().expect("tempdir");
        GitignoreHook
            .run(dir.path(), &options(&[("use_docker", "n"), ("use_heroku", "n")]))
            .unwrap();
        assert!(!dir.path().join(".gitignore").exists());
    }

    #[test]
    fn test_gitignore_hook_requires_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = GitignoreHook
            .run(dir.path(), &options(&[("use_heroku", "y")]))
            .unwrap_err();
        assert!(matches!(err, ScaffoldError::Hook { hook: "gitignore", .. }));
    }
}
