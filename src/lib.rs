//! # turbo-drf
//!
//! **turbo-drf** generates production-ready Django REST Framework projects from a
//! parameterized template tree.
//!
//! ## Overview
//!
//! A run takes a set of string options (project name, slug, feature flags,
//! provider choices), rejects invalid or incompatible combinations before
//! touching the filesystem, renders the template into `<output>/<project_slug>/`
//! and finishes the project with post-generation hooks. Either the whole
//! project appears or nothing does.
//!
//! ## Architecture
//!
//! - **[`options`]** - template manifest (`template.yaml`) and option resolution
//! - **[`validator`]** - slug, value-domain and compatibility checks
//! - **[`generator`]** - rendering, hooks, placeholder scan, atomic commit, replay, lint
//! - **[`engine`]** - the minijinja environment shared by every render
//! - **[`config`]** - user configuration file and template discovery
//! - **[`logging`]** - tracing subscriber setup
//! - **[`error`]** - [`ScaffoldError`] and [`ValidationError`]
//! - **[`cli`]** - the `turbo-drf` command line
//!
//! ### Generation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant User
//!     participant CLI as CLI<br/>(turbo-drf)
//!     participant Options as options::OptionSet
//!     participant Validator as validator::validate
//!     participant Generator as generator
//!     participant FS as File System
//!
//!     User->>CLI: turbo-drf generate use_docker=y
//!     CLI->>Options: resolve(manifest, overrides)
//!     Options-->>CLI: OptionSet
//!     CLI->>Validator: validate(manifest, options)
//!     Validator-->>CLI: Ok or ValidationError (exit 2, nothing written)
//!     CLI->>Generator: generate_project(...)
//!     Generator->>FS: render into .turbo-drf-XXXX/<slug>
//!     Generator->>FS: run hooks, scan placeholders
//!     Generator->>FS: rename to <output>/<slug>
//!     Generator-->>CLI: GeneratedProject
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! turbo-drf options
//! turbo-drf generate project_name="Shop API" use_docker=y ci_tool=Github
//! ```
//!
//! ## Programmatic Usage
//!
//! ```rust,ignore
//! use std::collections::BTreeMap;
//! use turbo_drf::config::bundled_template_dir;
//! use turbo_drf::generator::{generate_project, GenerateSettings, Template};
//!
//! let template = Template::load(&bundled_template_dir())?;
//! let mut overrides = BTreeMap::new();
//! overrides.insert("project_slug".to_string(), "shop".to_string());
//! let generated = generate_project(&template, &overrides, &GenerateSettings::new("out"))?;
//! assert!(generated.project_dir.ends_with("shop"));
//! ```

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod generator;
pub mod logging;
pub mod options;
pub mod validator;

pub use error::{ScaffoldError, ValidationError};
pub use generator::{generate_project, GenerateSettings, GeneratedProject, Template};
pub use options::OptionSet;
