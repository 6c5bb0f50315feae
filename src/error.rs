//! # Error Types
//!
//! Every failure a generation run can produce is a [`ScaffoldError`]. Option
//! problems detected before anything touches the filesystem are grouped under
//! [`ValidationError`] so callers can tell "fix your options" apart from I/O or
//! template failures.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Why a project slug was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlugProblem {
    /// The slug contains a space or other whitespace
    Whitespace,
    /// The slug contains uppercase letters
    Uppercase,
    /// The slug is not usable as a Python package name
    NotIdentifier,
}

impl fmt::Display for SlugProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlugProblem::Whitespace => write!(f, "it contains whitespace"),
            SlugProblem::Uppercase => write!(f, "it contains uppercase letters"),
            SlugProblem::NotIdentifier => write!(
                f,
                "it is not a valid Python identifier (use lowercase letters, digits and underscores, not starting with a digit)"
            ),
        }
    }
}

/// Option set rejected before generation
///
/// Returned by [`crate::validator::validate`]. No file or directory has been
/// created when one of these is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// `project_slug` cannot be used as a directory and package name
    InvalidSlug {
        /// The rejected slug
        slug: String,
        /// What is wrong with it
        problem: SlugProblem,
    },
    /// The option set violates a compatibility rule
    IncompatibleOptions {
        /// Identifier of the violated rule
        rule: &'static str,
        /// The option values that triggered the rule, as `(name, value)` pairs
        values: Vec<(String, String)>,
        /// Human-readable explanation
        reason: &'static str,
    },
    /// A single option holds a value outside its domain
    InvalidValue {
        /// Option name
        option: String,
        /// The rejected value
        value: String,
        /// Human-readable explanation
        reason: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidSlug { slug, problem } => {
                write!(f, "invalid project_slug '{slug}': {problem}")
            }
            ValidationError::IncompatibleOptions {
                rule,
                values,
                reason,
            } => {
                let pairs: Vec<String> = values.iter().map(|(k, v)| format!("{k}={v}")).collect();
                write!(
                    f,
                    "incompatible options [{}] ({rule}): {reason}",
                    pairs.join(", ")
                )
            }
            ValidationError::InvalidValue {
                option,
                value,
                reason,
            } => write!(f, "invalid value '{value}' for {option}: {reason}"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors produced while resolving options or generating a project
#[derive(Debug)]
pub enum ScaffoldError {
    /// The option set was rejected before generation
    Validation(ValidationError),
    /// `template.yaml` is missing or malformed, or the template tree is not laid out as expected
    Manifest {
        /// Manifest or template path
        path: PathBuf,
        /// What went wrong
        message: String,
    },
    /// A template failed to render
    Template {
        /// Template-relative path (or a short label for non-file templates)
        path: String,
        /// Underlying engine error
        source: minijinja::Error,
    },
    /// Filesystem failure
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },
    /// The destination project directory already exists
    OutputExists(PathBuf),
    /// A placeholder survived rendering
    UnresolvedPlaceholder {
        /// Project-relative path of the offending file
        path: PathBuf,
        /// 1-based line number
        line: usize,
    },
    /// A post-generation hook failed
    Hook {
        /// Hook name
        hook: &'static str,
        /// What went wrong
        message: String,
    },
    /// A user configuration or replay file could not be loaded
    Config {
        /// File path
        path: PathBuf,
        /// What went wrong
        message: String,
    },
    /// A linter reported problems in a generated project
    Lint {
        /// Linter that failed
        tool: String,
        /// Exit status description
        status: String,
    },
}

impl ScaffoldError {
    /// Wrap an I/O error with the path it concerns
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ScaffoldError::Io {
            path: path.into(),
            source,
        }
    }

    /// Wrap a template engine error with the template it concerns
    pub fn template(path: impl Into<String>, source: minijinja::Error) -> Self {
        ScaffoldError::Template {
            path: path.into(),
            source,
        }
    }

    /// Whether this error was raised by option validation
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, ScaffoldError::Validation(_))
    }
}

impl fmt::Display for ScaffoldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScaffoldError::Validation(err) => write!(f, "{err}"),
            ScaffoldError::Manifest { path, message } => {
                write!(f, "template error in {}: {message}", path.display())
            }
            ScaffoldError::Template { path, source } => {
                write!(f, "failed to render {path}: {source}")
            }
            ScaffoldError::Io { path, source } => write!(f, "{}: {source}", path.display()),
            ScaffoldError::OutputExists(path) => write!(
                f,
                "output directory {} already exists (use --overwrite to replace it)",
                path.display()
            ),
            ScaffoldError::UnresolvedPlaceholder { path, line } => write!(
                f,
                "unresolved template variable in {}:{line}",
                path.display()
            ),
            ScaffoldError::Hook { hook, message } => {
                write!(f, "post-generation hook '{hook}' failed: {message}")
            }
            ScaffoldError::Config { path, message } => {
                write!(f, "invalid configuration in {}: {message}", path.display())
            }
            ScaffoldError::Lint { tool, status } => write!(f, "{tool} failed ({status})"),
        }
    }
}

impl std::error::Error for ScaffoldError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScaffoldError::Validation(err) => Some(err),
            ScaffoldError::Template { source, .. } => Some(source),
            ScaffoldError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ValidationError> for ScaffoldError {
    fn from(err: ValidationError) -> Self {
        ScaffoldError::Validation(err)
    }
}

/// Result alias used across the crate
pub type Result<T, E = ScaffoldError> = std::result::Result<T, E>;
