// src/discover/targets.rs

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

/// Display-name prefix for every discovered target.
const NAME_PREFIX: &str = "Gulp";

/// The task name every gulp setup conventionally has. It sorts first in a
/// result set and is the fallback when extraction fails outright.
pub const DEFAULT_TASK: &str = "default";

/// A runnable build target handed to the host's build orchestration.
///
/// Pure function of (task name, resolved executable); never mutated after
/// creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetDescriptor {
    /// Display label, e.g. `"Gulp: watch"`.
    pub name: String,
    /// Resolved gulp binary (project-local install preferred).
    pub exec: String,
    /// The binary is invoked directly, never through a shell.
    pub sh: bool,
    /// Exactly one element: the raw task name to run.
    pub args: Vec<String>,
    /// Environment overrides for the spawned build process.
    pub env: BTreeMap<String, String>,
}

impl TargetDescriptor {
    pub fn new(task: &str, exec: &str) -> Self {
        let mut env = BTreeMap::new();
        // Force colors even though stdout is a pipe, and keep the host's
        // mode flag from leaking into the user's build.
        env.insert("FORCE_COLOR".to_string(), "1".to_string());
        env.insert("NODE_ENV".to_string(), String::new());

        Self {
            name: format!("{NAME_PREFIX}: {task}"),
            exec: exec.to_string(),
            sh: false,
            args: vec![task.to_string()],
            env,
        }
    }
}

/// Resolve the gulp executable for a project: a locally installed copy under
/// `node_modules/.bin` wins over whatever is on the search path.
pub fn resolve_executable(dir: &Path) -> String {
    let binary = if cfg!(windows) { "gulp.cmd" } else { "gulp" };
    let local = dir.join("node_modules").join(".bin").join(binary);
    if local.exists() {
        local.to_string_lossy().into_owned()
    } else {
        binary.to_string()
    }
}

/// Order task names for presentation: `default` always first, the rest by
/// plain string comparison.
pub fn sort_task_names(names: &mut [String]) {
    names.sort_by(|a, b| match (a == DEFAULT_TASK, b == DEFAULT_TASK) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.cmp(b),
    });
}
