// src/discover/mod.rs

//! Target discovery bound to one project directory.
//!
//! [`GulpProvider`] is the stateful side of the crate: it detects whether a
//! gulpfile exists, drives the out-of-process extractor, applies the
//! ordering and fallback policy, and keeps the (single) watch subscription
//! that tells its owner when a rescan is worthwhile.

pub mod targets;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::discover::targets::{
    DEFAULT_TASK, TargetDescriptor, resolve_executable, sort_task_names,
};
use crate::extract::{ExtractorReport, NodeExtractor, TaskExtractor};
use crate::watch::{DEBOUNCE_WINDOW, WatchSubscription, spawn_subscription};

/// Candidate gulpfile names, in priority order. First existing match wins.
pub const GULPFILE_CANDIDATES: &[&str] =
    &["gulpfile.js", "gulpfile.coffee", "gulpfile.babel.js"];

/// Notification sent to whoever owns the provider. Carries no payload; the
/// owner is expected to call [`GulpProvider::targets`] again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderEvent {
    Refresh,
}

/// Discovers gulp tasks in one project directory.
pub struct GulpProvider {
    dir: PathBuf,
    /// Gulpfile recorded by the last eligibility check.
    gulpfile: Option<PathBuf>,
    extractor: Arc<dyn TaskExtractor>,
    events_tx: mpsc::Sender<ProviderEvent>,
    /// At most one live subscription; replaced wholesale on every
    /// successful scan.
    subscription: Option<WatchSubscription>,
}

impl GulpProvider {
    /// Provider backed by the real `node` extractor with a 10 second reply
    /// timeout. Refresh signals go to `events_tx`.
    pub fn new(dir: impl Into<PathBuf>, events_tx: mpsc::Sender<ProviderEvent>) -> Self {
        Self::with_extractor(
            dir,
            events_tx,
            Arc::new(NodeExtractor::new(Duration::from_secs(10))),
        )
    }

    pub fn with_extractor(
        dir: impl Into<PathBuf>,
        events_tx: mpsc::Sender<ProviderEvent>,
        extractor: Arc<dyn TaskExtractor>,
    ) -> Self {
        Self {
            dir: dir.into(),
            gulpfile: None,
            extractor,
            events_tx,
            subscription: None,
        }
    }

    /// Check for a recognised gulpfile in the bound directory, recording the
    /// first candidate that exists (and clearing the record on a miss).
    ///
    /// A missing directory is "not eligible", never an error.
    pub fn is_eligible(&mut self) -> bool {
        self.gulpfile = GULPFILE_CANDIDATES
            .iter()
            .map(|name| self.dir.join(name))
            .find(|path| path.exists());

        debug!(dir = ?self.dir, gulpfile = ?self.gulpfile, "eligibility check");
        self.gulpfile.is_some()
    }

    /// Path of the gulpfile recorded by the last eligibility check.
    pub fn gulpfile(&self) -> Option<&Path> {
        self.gulpfile.as_deref()
    }

    /// Run one scan and produce the ordered target list.
    ///
    /// Never fails: extraction problems of any kind (gulp not installed,
    /// gulpfile broken, extractor crashed or timed out) degrade to a single
    /// default target so the user can still attempt the conventional build.
    /// Expects a prior successful [`Self::is_eligible`] call; without one it
    /// also degrades to the default target.
    pub async fn targets(&mut self) -> Vec<TargetDescriptor> {
        let exec = resolve_executable(&self.dir);

        let Some(gulpfile) = self.gulpfile.clone() else {
            warn!(dir = ?self.dir, "targets requested without a recorded gulpfile");
            return vec![TargetDescriptor::new(DEFAULT_TASK, &exec)];
        };

        match self.extractor.extract(&self.dir, &gulpfile).await {
            ExtractorReport::Failure { error } => {
                // No subscription here: failure may mean the file is not
                // even loadable, so there is nothing to watch reliably yet.
                info!(
                    message = %error.message,
                    "extraction failed, falling back to the default target"
                );
                vec![TargetDescriptor::new(DEFAULT_TASK, &exec)]
            }
            ExtractorReport::Tasks { mut tasks } => {
                self.install_subscription(&gulpfile);
                sort_task_names(&mut tasks);
                tasks
                    .iter()
                    .map(|task| TargetDescriptor::new(task, &exec))
                    .collect()
            }
        }
    }

    fn install_subscription(&mut self, gulpfile: &Path) {
        // Close the previous subscription before installing its replacement.
        self.subscription.take();

        match spawn_subscription(gulpfile, DEBOUNCE_WINDOW, self.events_tx.clone()) {
            Ok(sub) => self.subscription = Some(sub),
            Err(err) => warn!(error = %err, "failed to watch {:?}", gulpfile),
        }
    }

    /// Tear down the watch subscription. Idempotent; also happens on drop.
    pub fn close(&mut self) {
        self.subscription.take();
    }
}
