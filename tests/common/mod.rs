#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

//! Shared fixtures for the integration tests

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use turbo_drf::config::bundled_template_dir;
use turbo_drf::generator::{generate_project, is_binary, GenerateSettings, GeneratedProject, Template};
use turbo_drf::ScaffoldError;

pub type Combination = &'static [(&'static str, &'static str)];

/// Option combinations that must generate cleanly
pub const SUPPORTED_COMBINATIONS: &[Combination] = &[
    &[("open_source_license", "MIT")],
    &[("open_source_license", "BSD")],
    &[("open_source_license", "GPLv3")],
    &[("open_source_license", "Apache Software License 2.0")],
    &[("open_source_license", "Not open source")],
    &[("windows", "y")],
    &[("windows", "n")],
    &[("use_docker", "y")],
    &[("use_docker", "n")],
    &[("postgresql_version", "14.1")],
    &[("postgresql_version", "13.5")],
    &[("postgresql_version", "12.9")],
    &[("postgresql_version", "11.14")],
    &[("postgresql_version", "10.19")],
    &[("cloud_provider", "AWS"), ("use_whitenoise", "y")],
    &[("cloud_provider", "AWS"), ("use_whitenoise", "n")],
    &[("cloud_provider", "GCP"), ("use_whitenoise", "y")],
    &[("cloud_provider", "GCP"), ("use_whitenoise", "n")],
    &[("cloud_provider", "None"), ("use_whitenoise", "y"), ("mail_service", "Mailgun")],
    &[("cloud_provider", "None"), ("use_whitenoise", "y"), ("mail_service", "Mailjet")],
    &[("cloud_provider", "None"), ("use_whitenoise", "y"), ("mail_service", "Mandrill")],
    &[("cloud_provider", "None"), ("use_whitenoise", "y"), ("mail_service", "Postmark")],
    &[("cloud_provider", "None"), ("use_whitenoise", "y"), ("mail_service", "Sendgrid")],
    &[("cloud_provider", "None"), ("use_whitenoise", "y"), ("mail_service", "SendinBlue")],
    &[("cloud_provider", "None"), ("use_whitenoise", "y"), ("mail_service", "SparkPost")],
    &[("cloud_provider", "None"), ("use_whitenoise", "y"), ("mail_service", "Other SMTP")],
    &[("cloud_provider", "AWS"), ("mail_service", "Mailgun")],
    &[("cloud_provider", "AWS"), ("mail_service", "Amazon SES")],
    &[("cloud_provider", "AWS"), ("mail_service", "Mailjet")],
    &[("cloud_provider", "AWS"), ("mail_service", "Mandrill")],
    &[("cloud_provider", "AWS"), ("mail_service", "Postmark")],
    &[("cloud_provider", "AWS"), ("mail_service", "Sendgrid")],
    &[("cloud_provider", "AWS"), ("mail_service", "SendinBlue")],
    &[("cloud_provider", "AWS"), ("mail_service", "SparkPost")],
    &[("cloud_provider", "AWS"), ("mail_service", "Other SMTP")],
    &[("cloud_provider", "GCP"), ("mail_service", "Mailgun")],
    &[("cloud_provider", "GCP"), ("mail_service", "Mailjet")],
    &[("cloud_provider", "GCP"), ("mail_service", "Mandrill")],
    &[("cloud_provider", "GCP"), ("mail_service", "Postmark")],
    &[("cloud_provider", "GCP"), ("mail_service", "Sendgrid")],
    &[("cloud_provider", "GCP"), ("mail_service", "SendinBlue")],
    &[("cloud_provider", "GCP"), ("mail_service", "SparkPost")],
    &[("cloud_provider", "GCP"), ("mail_service", "Other SMTP")],
    &[("use_async", "y")],
    &[("use_async", "n")],
    &[("use_celery", "y")],
    &[("use_celery", "n")],
    &[("use_mailhog", "y")],
    &[("use_mailhog", "n")],
    &[("use_sentry", "y")],
    &[("use_sentry", "n")],
    &[("use_whitenoise", "y")],
    &[("use_whitenoise", "n")],
    &[("use_heroku", "y")],
    &[("use_heroku", "n")],
    &[("ci_tool", "None")],
    &[("ci_tool", "Travis")],
    &[("ci_tool", "Gitlab")],
    &[("ci_tool", "Github")],
    &[("keep_local_envs_in_vcs", "y")],
    &[("keep_local_envs_in_vcs", "n")],
    &[("debug", "y")],
    &[("debug", "n")],
];

/// Option combinations the validator must reject
pub const UNSUPPORTED_COMBINATIONS: &[Combination] = &[
    &[("cloud_provider", "None"), ("use_whitenoise", "n")],
    &[("cloud_provider", "GCP"), ("mail_service", "Amazon SES")],
    &[("cloud_provider", "None"), ("mail_service", "Amazon SES")],
];

/// Base overrides every generation test starts from
pub fn context() -> BTreeMap<String, String> {
    [
        ("project_name", "My Test Project"),
        ("project_slug", "my_test_project"),
        ("author_name", "Test Author"),
        ("email", "test@example.com"),
        ("description", "A short description of the project."),
        ("domain_name", "example.com"),
        ("version", "0.1.0"),
        ("timezone", "UTC"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// The base context with `combination` applied on top
pub fn context_with(combination: &[(&str, &str)]) -> BTreeMap<String, String> {
    let mut ctx = context();
    for (key, value) in combination {
        ctx.insert((*key).to_string(), (*value).to_string());
    }
    ctx
}

/// Readable label for a combination, used in assertion messages
pub fn combination_id(combination: &[(&str, &str)]) -> String {
    combination
        .iter()
        .map(|(k, v)| format!("{k}:{v}"))
        .collect::<Vec<_>>()
        .join("-")
}

/// The template shipped in `template/`
pub fn bundled_template() -> Template {
    Template::load(&bundled_template_dir()).expect("bundled template loads")
}

/// Generate into a fresh temporary directory
///
/// The directory is returned alongside the result so it outlives the assertions.
pub fn bake(overrides: &BTreeMap<String, String>) -> (TempDir, Result<GeneratedProject, ScaffoldError>) {
    let out = TempDir::new().expect("create output dir");
    let result = generate_project(&bundled_template(), overrides, &GenerateSettings::new(out.path()));
    (out, result)
}

/// Every regular file under `root`, sorted
pub fn files_under(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .into_iter()
        .map(|entry| entry.expect("walk generated project"))
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    files
}

/// Contents of every non-binary file under `root`
pub fn text_files_under(root: &Path) -> Vec<(PathBuf, String)> {
    files_under(root)
        .into_iter()
        .filter_map(|path| {
            let bytes = fs::read(&path).expect("read generated file");
            if is_binary(&bytes) {
                return None;
            }
            let text = String::from_utf8(bytes).expect("text file is utf-8");
            Some((path, text))
        })
        .collect()
}

/// Entries directly under `dir` (names only)
pub fn entries(dir: &Path) -> Vec<String> {
    match fs::read_dir(dir) {
        Ok(read) => read
            .map(|e| e.expect("read dir entry").file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => Vec::new(),
    }
}
