//! # Option Validation
//!
//! Decides whether an option set may be generated. Runs before any directory is
//! created, so a rejected run leaves the filesystem untouched.
//!
//! Checks, in order, stopping at the first failure:
//!
//! 1. `project_slug` is usable as a directory and Python package name
//! 2. every declared option holds a value from its domain
//! 3. the fixed [`RULES`] list of compatibility rules

use tracing::debug;

use crate::error::{SlugProblem, ValidationError};
use crate::options::{OptionSet, TemplateManifest, VariableKind, PROJECT_SLUG};

/// A predicate that must hold for generation to proceed
#[derive(Debug)]
pub struct CompatibilityRule {
    /// Stable identifier, reported in errors
    pub id: &'static str,
    /// Options the rule looks at (reported with their values on failure)
    pub options: &'static [&'static str],
    /// Why the combination is rejected
    pub reason: &'static str,
    holds: fn(&OptionSet) -> bool,
}

impl CompatibilityRule {
    /// Whether `options` satisfies this rule
    pub fn holds(&self, options: &OptionSet) -> bool {
        (self.holds)(options)
    }
}

/// Known-incompatible option combinations
pub const RULES: &[CompatibilityRule] = &[
    CompatibilityRule {
        id: "static_files_need_server",
        options: &["cloud_provider", "use_whitenoise"],
        reason: "You should either use Whitenoise or select a Cloud Provider to serve static files",
        holds: |o| !(o.value("cloud_provider") == "None" && !o.flag("use_whitenoise")),
    },
    CompatibilityRule {
        id: "ses_requires_aws_gcp",
        options: &["cloud_provider", "mail_service"],
        reason: "You should either use AWS or select a different Mail Service for sending emails",
        holds: |o| !(o.value("cloud_provider") == "GCP" && o.value("mail_service") == "Amazon SES"),
    },
    CompatibilityRule {
        id: "ses_requires_aws_none",
        options: &["cloud_provider", "mail_service"],
        reason: "You should either use AWS or select a different Mail Service for sending emails",
        holds: |o| {
            !(o.value("cloud_provider") == "None" && o.value("mail_service") == "Amazon SES")
        },
    },
];

/// Validate a resolved option set against the template manifest
///
/// # Errors
///
/// - [`ValidationError::InvalidSlug`] when the slug is unusable
/// - [`ValidationError::InvalidValue`] when an option is outside its domain
/// - [`ValidationError::IncompatibleOptions`] when a rule in [`RULES`] fails
pub fn validate(manifest: &TemplateManifest, options: &OptionSet) -> Result<(), ValidationError> {
    check_slug(options.slug())?;
    check_domains(manifest, options)?;
    check_compatibility(options)?;
    debug!(slug = %options.slug(), "option set accepted");
    Ok(())
}

/// Check a project slug
///
/// Rejects whitespace and uppercase letters, then anything that is not a
/// Python identifier.
pub fn check_slug(slug: &str) -> Result<(), ValidationError> {
    let problem = if slug.chars().any(char::is_whitespace) {
        Some(SlugProblem::Whitespace)
    } else if slug.chars().any(char::is_uppercase) {
        Some(SlugProblem::Uppercase)
    } else if !is_identifier(slug) {
        Some(SlugProblem::NotIdentifier)
    } else {
        None
    };
    match problem {
        Some(problem) => Err(ValidationError::InvalidSlug {
            slug: slug.to_string(),
            problem,
        }),
        None => Ok(()),
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Check every declared option against its kind
pub fn check_domains(
    manifest: &TemplateManifest,
    options: &OptionSet,
) -> Result<(), ValidationError> {
    for var in &manifest.variables {
        if var.name == PROJECT_SLUG {
            continue;
        }
        let value = options.value(&var.name);
        match var.kind() {
            VariableKind::Flag if value != "y" && value != "n" => {
                return Err(ValidationError::InvalidValue {
                    option: var.name.clone(),
                    value: value.to_string(),
                    reason: "expected \"y\" or \"n\"".to_string(),
                });
            }
            VariableKind::Choice if !var.choices.iter().any(|c| c == value) => {
                return Err(ValidationError::InvalidValue {
                    option: var.name.clone(),
                    value: value.to_string(),
                    reason: format!("expected one of: {}", var.choices.join(", ")),
                });
            }
            _ => {}
        }
    }

    let author = options.value("author_name");
    if author.contains('\\') {
        return Err(ValidationError::InvalidValue {
            option: "author_name".to_string(),
            value: author.to_string(),
            reason: "backslashes are not allowed in the author name".to_string(),
        });
    }
    Ok(())
}

/// Evaluate [`RULES`] in order, failing on the first violated rule
pub fn check_compatibility(options: &OptionSet) -> Result<(), ValidationError> {
    match RULES.iter().find(|rule| !rule.holds(options)) {
        Some(rule) => Err(ValidationError::IncompatibleOptions {
            rule: rule.id,
            values: rule
                .options
                .iter()
                .map(|name| (name.to_string(), options.value(name).to_string()))
                .collect(),
            reason: rule.reason,
        }),
        None => Ok(()),
    }
}
