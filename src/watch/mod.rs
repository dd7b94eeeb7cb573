// src/watch/mod.rs

//! Debounced file watching for the detected gulpfile.
//!
//! After a successful scan the provider installs a single subscription on
//! the gulpfile. Filesystem events on it are rate-limited through a
//! [`DebounceGate`] and surface to the provider's owner as refresh signals.
//! The subscription does not rescan by itself; the owner decides when to
//! call back into the provider.

use std::path::Path;
use std::time::{Duration, Instant};

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::discover::ProviderEvent;
use crate::errors::Result;

/// Minimum gap between consecutive refresh signals. Editors often write a
/// file several times per save; without this gap every save would fan out
/// into a burst of rescans.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_secs(3);

/// Rate limiter for refresh signals.
///
/// The timestamp starts at install time, so events observed while the first
/// window is still open (including the write that triggered the scan that
/// installed this gate) are swallowed. Each emit starts a new window.
#[derive(Debug)]
pub struct DebounceGate {
    window: Duration,
    last_refresh: Instant,
}

impl DebounceGate {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_refresh: Instant::now(),
        }
    }

    /// Whether a refresh should be emitted for an event observed at `now`.
    /// Advances the gate on emit so the next window starts there.
    pub fn should_emit(&mut self, now: Instant) -> bool {
        if now.duration_since(self.last_refresh) >= self.window {
            self.last_refresh = now;
            true
        } else {
            false
        }
    }
}

/// Live watch on a single gulpfile.
///
/// Exists mainly so the underlying `RecommendedWatcher` stays alive for as
/// long as needed. Dropping it stops watching and ends the forwarding task.
pub struct WatchSubscription {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatchSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchSubscription").finish()
    }
}

/// Install a debounced watch on `path`, forwarding at most one
/// [`ProviderEvent::Refresh`] per `window` to `events_tx`.
///
/// Must be called from within a tokio runtime (the forwarding loop is a
/// spawned task).
pub fn spawn_subscription(
    path: &Path,
    window: Duration,
    events_tx: mpsc::Sender<ProviderEvent>,
) -> Result<WatchSubscription> {
    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                let _ = event_tx.send(event);
            }
            Err(err) => {
                warn!(error = %err, "file watch error");
            }
        },
        Config::default(),
    )?;

    watcher.watch(path, RecursiveMode::NonRecursive)?;
    debug!("watch subscription installed on {:?}", path);

    let watched = path.to_path_buf();
    tokio::spawn(async move {
        let mut gate = DebounceGate::new(window);

        while let Some(event) = event_rx.recv().await {
            debug!(?event, "gulpfile change event");

            if !gate.should_emit(Instant::now()) {
                continue;
            }
            if events_tx.send(ProviderEvent::Refresh).await.is_err() {
                // Owner went away; no point keeping the loop alive.
                return;
            }
            debug!("refresh signalled for {:?}", watched);
        }

        debug!("watch forwarding loop ended for {:?}", watched);
    });

    Ok(WatchSubscription { _inner: watcher })
}
