//! Template engine setup shared by option resolution, path rules and the renderer.

use minijinja::{Environment, UndefinedBehavior, Value};
use std::collections::BTreeMap;

/// Build the template environment used for every render in a run
///
/// Undefined variables are errors rather than empty strings, so a typo in a
/// template fails the run instead of silently producing a broken file.
/// Trailing newlines are kept and block tags swallow their own line.
pub fn environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_keep_trailing_newline(true);
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env
}

/// Wrap option values under `namespace` (`{{ cookiecutter.key }}`)
pub fn context(namespace: &str, values: &BTreeMap<String, String>) -> Value {
    let mut root = BTreeMap::new();
    root.insert(namespace, values);
    Value::from_serialize(&root)
}
