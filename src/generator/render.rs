use minijinja::{Environment, Value};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

use super::template::Template;
use super::verify::is_binary;
use crate::engine;
use crate::error::{Result, ScaffoldError};
use crate::options::{OptionSet, MANIFEST_FILE};

/// Counters reported after a render
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Text files rendered
    pub rendered: usize,
    /// Binary files copied verbatim
    pub copied: usize,
    /// Directories created (including the project root)
    pub directories: usize,
    /// Entries left out by path rules or empty names
    pub skipped: usize,
}

/// Renders a template tree for one option set
pub struct Renderer<'a> {
    template: &'a Template,
    env: Environment<'static>,
    ctx: Value,
    excluded: Vec<PathBuf>,
}

impl<'a> Renderer<'a> {
    /// Prepare a renderer, evaluating the manifest's path rules
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::Template`] when a rule expression or path fails
    /// to compile or evaluate.
    pub fn new(template: &'a Template, options: &OptionSet) -> Result<Self> {
        let env = engine::environment();
        let ctx = engine::context(&template.manifest.namespace, options.values());

        let mut excluded = Vec::new();
        for (idx, rule) in template.manifest.conditional_paths.iter().enumerate() {
            let label = format!("{MANIFEST_FILE}: conditional_paths[{idx}]");
            let keep = env
                .render_str(&format!("{{% if {} %}}y{{% endif %}}", rule.when), &ctx)
                .map_err(|e| ScaffoldError::template(&label, e))?;
            if keep == "y" {
                continue;
            }
            for path in &rule.paths {
                let rendered = env
                    .render_str(path, &ctx)
                    .map_err(|e| ScaffoldError::template(&label, e))?;
                debug!(path = %rendered, when = %rule.when, "path excluded");
                excluded.push(PathBuf::from(rendered));
            }
        }

        Ok(Self {
            template,
            env,
            ctx,
            excluded,
        })
    }

    /// Whether a project-relative path is removed by a path rule
    pub fn is_excluded(&self, rel: &Path) -> bool {
        self.excluded.iter().any(|ex| rel.starts_with(ex))
    }

    /// Render a single name or path segment
    fn render_name(&self, name: &str, label: &Path) -> Result<String> {
        if !name.contains("{{") && !name.contains("{%") {
            return Ok(name.to_string());
        }
        let rendered = self
            .env
            .render_str(name, &self.ctx)
            .map_err(|e| ScaffoldError::template(label.display().to_string(), e))?;
        let mut components = Path::new(&rendered).components();
        match (components.next(), components.next()) {
            (None, _) => Ok(String::new()),
            (Some(Component::Normal(_)), None) => Ok(rendered),
            _ => Err(ScaffoldError::Manifest {
                path: label.to_path_buf(),
                message: format!("name renders to '{rendered}', which is not a single path segment"),
            }),
        }
    }

    /// Name of the project directory this option set renders to
    pub fn project_name(&self) -> Result<String> {
        let root_name = self.render_name(&self.template.root, Path::new(&self.template.root))?;
        if root_name.is_empty() {
            return Err(ScaffoldError::Manifest {
                path: self.template.root_dir(),
                message: "project root renders to an empty name".to_string(),
            });
        }
        Ok(root_name)
    }

    /// Render the project into `dest_parent`, returning the project directory
    ///
    /// `dest_parent` must exist. The project directory itself must not.
    pub fn render_into(&self, dest_parent: &Path) -> Result<(PathBuf, RenderStats)> {
        let mut stats = RenderStats::default();
        let root_src = self.template.root_dir();
        let project = dest_parent.join(self.project_name()?);
        fs::create_dir(&project).map_err(|e| ScaffoldError::io(&project, e))?;
        copy_permissions(&root_src, &project)?;
        stats.directories += 1;

        let mut walker = WalkDir::new(&root_src)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter();
        while let Some(entry) = walker.next() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(&root_src).to_path_buf();
                ScaffoldError::io(path, e.into())
            })?;
            let src_rel = entry.path().strip_prefix(&root_src).unwrap_or(entry.path());
            let is_dir = entry.file_type().is_dir();

            let Some(rel) = self.render_relative(src_rel)? else {
                trace!(path = %src_rel.display(), "empty name, skipped");
                stats.skipped += 1;
                if is_dir {
                    walker.skip_current_dir();
                }
                continue;
            };
            if self.is_excluded(&rel) {
                trace!(path = %rel.display(), "excluded by path rule");
                stats.skipped += 1;
                if is_dir {
                    walker.skip_current_dir();
                }
                continue;
            }

            let dest = project.join(&rel);
            if is_dir {
                fs::create_dir_all(&dest).map_err(|e| ScaffoldError::io(&dest, e))?;
                copy_permissions(entry.path(), &dest)?;
                stats.directories += 1;
            } else if entry.file_type().is_file() {
                if self.write_file(entry.path(), src_rel, &dest)? {
                    stats.copied += 1;
                } else {
                    stats.rendered += 1;
                }
            } else {
                debug!(path = %src_rel.display(), "not a regular file or directory, skipped");
                stats.skipped += 1;
            }
        }

        Ok((project, stats))
    }

    /// Render every segment of a template-relative path; `None` when a segment is empty
    fn render_relative(&self, src_rel: &Path) -> Result<Option<PathBuf>> {
        let mut rel = PathBuf::new();
        for component in src_rel.components() {
            let segment = component.as_os_str().to_string_lossy();
            let rendered = self.render_name(&segment, src_rel)?;
            if rendered.is_empty() {
                return Ok(None);
            }
            rel.push(rendered);
        }
        Ok(Some(rel))
    }

    /// Write one file; returns `true` when it was copied as binary
    fn write_file(&self, src: &Path, src_rel: &Path, dest: &Path) -> Result<bool> {
        let bytes = fs::read(src).map_err(|e| ScaffoldError::io(src, e))?;
        let binary = is_binary(&bytes);
        if binary {
            fs::write(dest, &bytes).map_err(|e| ScaffoldError::io(dest, e))?;
        } else {
            let source = String::from_utf8_lossy(&bytes);
            let rendered = self
                .env
                .render_str(&source, &self.ctx)
                .map_err(|e| ScaffoldError::template(src_rel.display().to_string(), e))?;
            fs::write(dest, rendered).map_err(|e| ScaffoldError::io(dest, e))?;
        }
        copy_permissions(src, dest)?;
        Ok(binary)
    }
}

fn copy_permissions(src: &Path, dest: &Path) -> Result<()> {
    let permissions = fs::metadata(src)
        .map_err(|e| ScaffoldError::io(src, e))?
        .permissions();
    fs::set_permissions(dest, permissions).map_err(|e| ScaffoldError::io(dest, e))
}
