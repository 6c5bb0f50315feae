use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{Result, ScaffoldError};
use crate::generator::hooks::{default_hooks, PostGenHook};
use crate::generator::render::{RenderStats, Renderer};
use crate::generator::replay;
use crate::generator::template::Template;
use crate::generator::verify::verify_rendered;
use crate::options::OptionSet;
use crate::validator::validate;

/// Prefix of the hidden staging directory created next to the project
pub const STAGING_PREFIX: &str = ".turbo-drf-";

/// Name an overwritten project is moved to inside the staging directory
const REPLACED_DIR: &str = ".replaced";

/// Settings for one generation run
#[derive(Debug, Clone)]
pub struct GenerateSettings {
    /// Directory the project directory is created in
    pub output_dir: PathBuf,
    /// Replace an existing project directory instead of failing
    pub overwrite: bool,
    /// Write the resolved options to this replay file after success
    pub dump_replay: Option<PathBuf>,
}

impl GenerateSettings {
    /// Settings generating into `output_dir`, no overwrite, no replay
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            overwrite: false,
            dump_replay: None,
        }
    }
}

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct GeneratedProject {
    /// The committed project directory
    pub project_dir: PathBuf,
    /// The options it was generated with
    pub options: OptionSet,
    /// Render counters
    pub stats: RenderStats,
}

/// Resolve options, validate them and generate the project
///
/// # Errors
///
/// Any [`ScaffoldError`]. On error no project directory exists afterwards
/// (unless one existed before and `overwrite` was not set).
pub fn generate_project(
    template: &Template,
    overrides: &BTreeMap<String, String>,
    settings: &GenerateSettings,
) -> Result<GeneratedProject> {
    let options = OptionSet::resolve(&template.manifest, overrides)?;
    generate_from_options(template, options, settings, &default_hooks())
}

/// Generate a project from an already resolved option set
///
/// Steps: validate, render into a staging directory, run `hooks`, scan for
/// leftover placeholders, then rename the staged project into place. Nothing
/// is written before validation succeeds; the staging directory is removed
/// whatever the outcome.
pub fn generate_from_options(
    template: &Template,
    options: OptionSet,
    settings: &GenerateSettings,
    hooks: &[Box<dyn PostGenHook>],
) -> Result<GeneratedProject> {
    validate(&template.manifest, &options)?;

    let renderer = Renderer::new(template, &options)?;
    let target = settings.output_dir.join(renderer.project_name()?);
    if target.exists() && !settings.overwrite {
        return Err(ScaffoldError::OutputExists(target));
    }

    fs::create_dir_all(&settings.output_dir)
        .map_err(|e| ScaffoldError::io(&settings.output_dir, e))?;
    let staging = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempdir_in(&settings.output_dir)
        .map_err(|e| ScaffoldError::io(&settings.output_dir, e))?;
    debug!(staging = %staging.path().display(), "rendering into staging directory");

    let (staged, stats) = renderer.render_into(staging.path())?;
    for hook in hooks {
        info!(hook = hook.name(), "running post-generation hook");
        hook.run(&staged, &options)?;
    }
    verify_rendered(&staged, &template.manifest.namespace)?;

    commit(&staged, staging.path(), &target, settings.overwrite)?;
    info!(
        project = %target.display(),
        rendered = stats.rendered,
        copied = stats.copied,
        skipped = stats.skipped,
        "project generated"
    );

    if let Some(path) = &settings.dump_replay {
        replay::dump(path, &template.manifest.namespace, &options)?;
        debug!(replay = %path.display(), "replay written");
    }

    Ok(GeneratedProject {
        project_dir: target,
        options,
        stats,
    })
}

/// Move the staged project to `target`
///
/// An existing `target` is first moved aside into `staging` and only goes
/// away when the staging directory is dropped; if the final rename fails it
/// is moved back.
fn commit(staged: &Path, staging: &Path, target: &Path, overwrite: bool) -> Result<()> {
    let previous = staging.join(REPLACED_DIR);
    let replacing = overwrite && target.exists();
    if replacing {
        info!(project = %target.display(), "replacing existing project directory");
        fs::rename(target, &previous).map_err(|e| ScaffoldError::io(target, e))?;
    }
    if let Err(err) = fs::rename(staged, target) {
        if replacing {
            if let Err(restore) = fs::rename(&previous, target) {
                warn!(project = %target.display(), error = %restore, "failed to restore previous project");
            }
        }
        return Err(ScaffoldError::io(target, err));
    }
    Ok(())
}
