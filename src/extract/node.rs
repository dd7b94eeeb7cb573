// src/extract/node.rs

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::extract::{ExtractorReport, TaskExtractor};

/// Script evaluated by the child `node` process. It loads the project-local
/// gulp, evaluates the gulpfile so its registration side effects land, and
/// prints a single JSON report to stdout.
const EXTRACT_SCRIPT: &str = include_str!("extract_tasks.js");

/// Variables stripped from the child environment so the gulpfile behaves as
/// it would under a plain terminal invocation. `NODE_ENV` carries the host's
/// mode, `NODE_PATH` would redirect module resolution into the host's tree.
const STRIPPED_ENV_VARS: &[&str] = &["NODE_ENV", "NODE_PATH"];

/// [`TaskExtractor`] backed by a fresh `node` child process per scan.
///
/// Each scan spawns, evaluates, reports, and exits; nothing is reused, so
/// whatever state the gulpfile left behind dies with the child.
pub struct NodeExtractor {
    node_binary: String,
    reply_timeout: Duration,
}

impl NodeExtractor {
    pub fn new(reply_timeout: Duration) -> Self {
        Self {
            node_binary: "node".to_string(),
            reply_timeout,
        }
    }

    /// Use a different interpreter binary (path or name on the search path).
    pub fn with_node_binary(mut self, binary: impl Into<String>) -> Self {
        self.node_binary = binary.into();
        self
    }

    async fn run(&self, dir: &Path, gulpfile: &Path) -> ExtractorReport {
        // `require()` treats a bare relative string as a module name, not a
        // path, so the child must be handed absolute paths. Best-effort: a
        // vanished directory surfaces as a spawn error below.
        let dir = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
        let gulpfile = gulpfile
            .canonicalize()
            .unwrap_or_else(|_| gulpfile.to_path_buf());

        let mut cmd = Command::new(&self.node_binary);
        cmd.arg("-e")
            .arg(EXTRACT_SCRIPT)
            .arg("--")
            .arg(&dir)
            .arg(&gulpfile)
            .current_dir(&dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Copy-and-filter per invocation; the host environment is shared
        // across providers and must never be mutated to talk to a child.
        for var in STRIPPED_ENV_VARS {
            cmd.env_remove(var);
        }

        let output = match cmd.output().await {
            Ok(output) => output,
            Err(err) => {
                return ExtractorReport::failure(format!(
                    "launching {}: {err}",
                    self.node_binary
                ));
            }
        };

        debug!(
            exit = ?output.status.code(),
            stdout_bytes = output.stdout.len(),
            "extractor process exited"
        );

        parse_report(&output.stdout)
    }
}

#[async_trait]
impl TaskExtractor for NodeExtractor {
    async fn extract(&self, dir: &Path, gulpfile: &Path) -> ExtractorReport {
        match timeout(self.reply_timeout, self.run(dir, gulpfile)).await {
            Ok(report) => report,
            // Dropping the timed-out future kills the child (kill_on_drop).
            Err(_) => {
                warn!(
                    gulpfile = ?gulpfile,
                    timeout = ?self.reply_timeout,
                    "extractor did not reply in time, killing it"
                );
                ExtractorReport::failure(format!(
                    "extractor timed out after {:?} evaluating {:?}",
                    self.reply_timeout, gulpfile
                ))
            }
        }
    }
}

/// Parse the child's stdout into a report.
///
/// The gulpfile may print whatever it likes while loading; the report is the
/// last non-empty line. A child that died before printing anything (crash,
/// OOM kill) yields no parseable line, which is just another failure as far
/// as the provider is concerned.
fn parse_report(stdout: &[u8]) -> ExtractorReport {
    let report_line = stdout
        .split(|b| *b == b'\n')
        .rev()
        .find(|line| !line.iter().all(u8::is_ascii_whitespace));

    let Some(line) = report_line else {
        return ExtractorReport::failure("extractor produced no report");
    };

    match serde_json::from_slice(line) {
        Ok(report) => report,
        Err(err) => ExtractorReport::failure(format!("unreadable extractor report: {err}")),
    }
}
