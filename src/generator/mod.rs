//! # Generator Module
//!
//! Turns a template directory and a validated option set into a project
//! directory.
//!
//! ## Pipeline
//!
//! ```text
//! options → validate → render (staging dir) → hooks → placeholder scan → rename
//! ```
//!
//! 1. **Validate** - [`crate::validator::validate`] runs before anything is written
//! 2. **Render** - [`Renderer`] walks the template root, renders every path
//!    segment and text file with minijinja, copies binary files verbatim and
//!    drops paths excluded by the manifest's `conditional_paths`
//! 3. **Hooks** - [`PostGenHook`]s finish the staged project (secrets,
//!    `.gitignore` rules)
//! 4. **Verify** - [`verify_rendered`] fails on any `{{ cookiecutter.* }}` left behind
//! 5. **Commit** - the staged directory is renamed to `<output>/<slug>`
//!
//! A failure at any step leaves no project directory behind: the staging
//! directory lives in a [`tempfile::TempDir`] that is removed when the run ends.
//!
//! ## Template Layout
//!
//! ```text
//! template/
//! ├── template.yaml                   # options and path rules
//! └── {{cookiecutter.project_slug}}/  # project root
//!     ├── config/settings/...
//!     └── {{cookiecutter.project_slug}}/users/...
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::collections::BTreeMap;
//! use turbo_drf::generator::{generate_project, GenerateSettings, Template};
//!
//! let template = Template::load("template".as_ref())?;
//! let generated = generate_project(&template, &BTreeMap::new(), &GenerateSettings::new("."))?;
//! println!("{}", generated.project_dir.display());
//! ```

pub mod hooks;
mod project;
mod render;
pub mod replay;
mod template;
mod verify;

pub use hooks::{default_hooks, GitignoreHook, PostGenHook, SecretsHook};
pub use project::*;
pub use render::{RenderStats, Renderer};
pub use template::Template;
pub use verify::{find_unresolved, is_binary, placeholder_pattern, verify_rendered};
