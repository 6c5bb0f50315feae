//! # CLI Module
//!
//! Command-line interface of the `turbo-drf` binary.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! Resolve options, validate them and render the project:
//!
//! ```bash
//! turbo-drf generate project_name="Shop API" use_docker=y ci_tool=Github --output-dir ~/src
//! ```
//!
//! Options:
//! - `EXTRA_CONTEXT...` - `key=value` overrides (highest precedence)
//! - `--template <DIR>` - template directory
//! - `--output-dir <DIR>` - where `<project_slug>/` is created
//! - `--config-file <FILE>` - user configuration with `default_context`
//! - `--replay <FILE>` / `--dump-replay <FILE>` - reuse or save resolved options
//! - `--overwrite` - replace an existing project directory
//! - `--lint` - run flake8 and black on the result
//!
//! ### `validate`
//!
//! Resolve and validate options, print them, write nothing:
//!
//! ```bash
//! turbo-drf validate cloud_provider=GCP mail_service="Amazon SES"
//! ```
//!
//! ### `options`
//!
//! List the options the template declares, with defaults and choices.
//!
//! ### `lint`
//!
//! Run the lint acceptance step on an existing project directory.
//!
//! ## Exit Codes
//!
//! | code | meaning |
//! |---|---|
//! | 0 | success |
//! | 1 | any failure other than validation |
//! | 2 | the option set was rejected; nothing was written |
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use clap::Parser;
//! use turbo_drf::cli::{run_cli, Cli};
//!
//! let cli = Cli::parse();
//! run_cli(cli)?;
//! ```

mod commands;


pub use commands::{run_cli, Cli, Commands, OptionSources};
