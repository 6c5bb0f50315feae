mod generate;
mod lint;

pub use generate::{
    generate_from_options, generate_project, GenerateSettings, GeneratedProject, STAGING_PREFIX,
};
pub use lint::{lint_project, LintCommand, LINTERS};
