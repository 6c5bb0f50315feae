use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::{resolve_template_dir, UserConfig};
use crate::generator::{generate_project, lint_project, replay, GenerateSettings, Template};
use crate::options::{merge_overrides, parse_extra_context, OptionSet, VariableKind};
use crate::validator::validate;

/// Command-line interface for turbo-drf
///
/// Generates Django REST Framework projects from a template directory.
#[derive(Debug, Parser)]
#[command(name = "turbo-drf", version)]
#[command(about = "Generate production-ready Django REST Framework projects", long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Where option overrides come from, shared by `generate` and `validate`
#[derive(Debug, Clone, Default, clap::Args)]
pub struct OptionSources {
    /// Option overrides as key=value (e.g. project_slug=shop use_docker=y)
    #[arg(value_name = "EXTRA_CONTEXT")]
    pub extra_context: Vec<String>,

    /// Template directory (default: $TURBO_DRF_TEMPLATE or the bundled template)
    #[arg(short, long)]
    pub template: Option<PathBuf>,

    /// User configuration file, TOML or YAML (default: $TURBO_DRF_CONFIG)
    #[arg(long)]
    pub config_file: Option<PathBuf>,

    /// Replay file written by an earlier --dump-replay
    #[arg(long)]
    pub replay: Option<PathBuf>,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a project
    Generate {
        #[command(flatten)]
        sources: OptionSources,

        /// Directory the project is created in (default: config output_dir, then ".")
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Replace an existing project directory
        #[arg(long, default_value_t = false)]
        overwrite: bool,

        /// Write the resolved options to this file after a successful run
        #[arg(long)]
        dump_replay: Option<PathBuf>,

        /// Run flake8 and black on the generated project
        #[arg(long, default_value_t = false)]
        lint: bool,
    },
    /// Resolve and validate options without writing anything
    Validate {
        #[command(flatten)]
        sources: OptionSources,
    },
    /// List the options a template declares
    Options {
        /// Template directory (default: $TURBO_DRF_TEMPLATE or the bundled template)
        #[arg(short, long)]
        template: Option<PathBuf>,
    },
    /// Run flake8 and black on an existing project
    Lint {
        /// Project directory
        project_dir: PathBuf,
    },
}

/// Execute a parsed command line
///
/// # Errors
///
/// Returns the underlying [`crate::error::ScaffoldError`] wrapped in
/// [`anyhow::Error`]; callers can downcast it to pick an exit code.
pub fn run_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate {
            sources,
            output_dir,
            overwrite,
            dump_replay,
            lint,
        } => {
            let template = load_template(sources.template.as_deref())?;
            let (config, overrides) = collect_overrides(&template, &sources)?;
            let output_dir = output_dir
                .or(config.output_dir)
                .unwrap_or_else(|| PathBuf::from("."));

            let settings = GenerateSettings {
                output_dir,
                overwrite,
                dump_replay,
            };
            let generated = generate_project(&template, &overrides, &settings)?;
            println!("✅ Generated project at {}", generated.project_dir.display());

            if lint {
                lint_project(&generated.project_dir).with_context(|| {
                    format!("linting {} failed", generated.project_dir.display())
                })?;
                println!("✅ Lint passed");
            }
            Ok(())
        }
        Commands::Validate { sources } => {
            let template = load_template(sources.template.as_deref())?;
            let (_, overrides) = collect_overrides(&template, &sources)?;
            let options = OptionSet::resolve(&template.manifest, &overrides)?;
            validate(&template.manifest, &options)?;
            for (name, value) in options.iter() {
                println!("{name} = {value}");
            }
            println!("✅ Options are valid");
            Ok(())
        }
        Commands::Options { template } => {
            let template = load_template(template.as_deref())?;
            for var in &template.manifest.variables {
                let kind = match var.kind() {
                    VariableKind::Text => "text",
                    VariableKind::Flag => "flag",
                    VariableKind::Choice => "choice",
                };
                let default = var
                    .default
                    .as_deref()
                    .or_else(|| var.choices.first().map(String::as_str))
                    .unwrap_or_default();
                println!("{} ({kind}) default: {default}", var.name);
                if !var.choices.is_empty() {
                    println!("    choices: {}", var.choices.join(" | "));
                }
                if let Some(help) = &var.help {
                    println!("    {help}");
                }
            }
            Ok(())
        }
        Commands::Lint { project_dir } => {
            lint_project(&project_dir)?;
            println!("✅ Lint passed");
            Ok(())
        }
    }
}

fn load_template(explicit: Option<&Path>) -> anyhow::Result<Template> {
    let dir = resolve_template_dir(explicit);
    info!(template = %dir.display(), "loading template");
    Ok(Template::load(&dir)?)
}

/// Merge config defaults, replay values and extra context, in that order
fn collect_overrides(
    template: &Template,
    sources: &OptionSources,
) -> anyhow::Result<(UserConfig, BTreeMap<String, String>)> {
    let config = UserConfig::discover(sources.config_file.as_deref())?;
    let replayed = match &sources.replay {
        Some(path) => replay::load(path, &template.manifest.namespace)?,
        None => BTreeMap::new(),
    };
    let extra = parse_extra_context(&sources.extra_context)?;
    debug!(
        config = config.default_context.len(),
        replay = replayed.len(),
        extra = extra.len(),
        "collected option overrides"
    );
    let overrides = merge_overrides([&config.default_context, &replayed, &extra]);
    Ok((config, overrides))
}
