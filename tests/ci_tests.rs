#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use std::fs;
use std::path::Path;

use common::{bake, context_with};
use serde_yaml::Value;

const DOCKER_PYTEST: &str = "docker-compose -f local.yml run django pytest";

fn expected_test_script(use_docker: &str) -> &'static str {
    if use_docker == "y" {
        DOCKER_PYTEST
    } else {
        "pytest"
    }
}

fn load_yaml(path: &Path) -> Value {
    let contents = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()));
    serde_yaml::from_str(&contents)
        .unwrap_or_else(|e| panic!("{} is not valid YAML: {e}", path.display()))
}

fn script(value: &Value) -> Vec<String> {
    value
        .as_sequence()
        .expect("script is a list")
        .iter()
        .map(|line| line.as_str().expect("script line is a string").to_string())
        .collect()
}

#[test]
fn test_travis_invokes_flake8_and_pytest() {
    for use_docker in ["n", "y"] {
        let (_out, result) = bake(&context_with(&[("ci_tool", "Travis"), ("use_docker", use_docker)]));
        let project = result.unwrap();
        assert!(project.project_dir.ends_with("my_test_project"));

        let travis = load_yaml(&project.project_dir.join(".travis.yml"));
        let jobs = &travis["jobs"]["include"];
        assert_eq!(script(&jobs[0]["script"]), vec!["flake8"], "use_docker={use_docker}");
        assert_eq!(
            script(&jobs[1]["script"]),
            vec![expected_test_script(use_docker)],
            "use_docker={use_docker}"
        );
    }
}

#[test]
fn test_gitlab_invokes_flake8_and_pytest() {
    for use_docker in ["n", "y"] {
        let (_out, result) = bake(&context_with(&[("ci_tool", "Gitlab"), ("use_docker", use_docker)]));
        let project = result.unwrap();

        let gitlab = load_yaml(&project.project_dir.join(".gitlab-ci.yml"));
        assert_eq!(script(&gitlab["flake8"]["script"]), vec!["flake8"]);
        assert_eq!(
            script(&gitlab["pytest"]["script"]),
            vec![expected_test_script(use_docker)],
            "use_docker={use_docker}"
        );
    }
}

#[test]
fn test_github_invokes_linter_and_pytest() {
    for use_docker in ["n", "y"] {
        let (_out, result) = bake(&context_with(&[("ci_tool", "Github"), ("use_docker", use_docker)]));
        let project = result.unwrap();

        let github = load_yaml(&project.project_dir.join(".github/workflows/ci.yml"));
        let steps = |job: &str| {
            github["jobs"][job]["steps"]
                .as_sequence()
                .unwrap_or_else(|| panic!("job {job} has no steps"))
                .clone()
        };

        let linter_present = steps("linter").iter().any(|step| {
            step.get("uses")
                .and_then(Value::as_str)
                .is_some_and(|uses| uses.starts_with("pre-commit"))
        });
        assert!(linter_present, "use_docker={use_docker}");

        let expected = expected_test_script(use_docker);
        let pytest_present = steps("pytest")
            .iter()
            .any(|step| step.get("run").and_then(Value::as_str) == Some(expected));
        assert!(pytest_present, "use_docker={use_docker}: no step runs {expected}");
    }
}

#[test]
fn test_only_selected_ci_config_is_generated() {
    let cases = [
        ("None", None),
        ("Travis", Some(".travis.yml")),
        ("Gitlab", Some(".gitlab-ci.yml")),
        ("Github", Some(".github")),
    ];
    for (ci_tool, present) in cases {
        let (_out, result) = bake(&context_with(&[("ci_tool", ci_tool)]));
        let project = result.unwrap();
        for candidate in [".travis.yml", ".gitlab-ci.yml", ".github"] {
            assert_eq!(
                project.project_dir.join(candidate).exists(),
                present == Some(candidate),
                "ci_tool={ci_tool}: {candidate}"
            );
        }
    }
}
