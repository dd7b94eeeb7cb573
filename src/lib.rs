// src/lib.rs

pub mod cli;
pub mod discover;
pub mod errors;
pub mod extract;
pub mod logging;
pub mod watch;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::info;

use crate::cli::CliArgs;
use crate::discover::targets::TargetDescriptor;
use crate::discover::{GulpProvider, ProviderEvent};
use crate::errors::Result;
use crate::extract::NodeExtractor;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - the discovery provider for the requested directory
/// - the `node`-backed extractor with the CLI-chosen timeout
/// - (optional) the watch loop that rescans on refresh signals
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let dir = PathBuf::from(&args.dir);
    let (events_tx, mut events_rx) = mpsc::channel::<ProviderEvent>(16);

    let extractor = Arc::new(NodeExtractor::new(Duration::from_secs(args.timeout_secs)));
    let mut provider = GulpProvider::with_extractor(dir.clone(), events_tx, extractor);

    if !provider.is_eligible() {
        println!("no gulpfile found in {}", dir.display());
        return Ok(());
    }

    let targets = provider.targets().await;
    print_targets(&targets, args.json)?;

    if !args.watch {
        provider.close();
        return Ok(());
    }

    info!("watching {:?} for gulpfile changes (Ctrl-C to exit)", dir);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown requested");
                break;
            }
            event = events_rx.recv() => match event {
                Some(ProviderEvent::Refresh) => {
                    info!("gulpfile changed, re-running discovery");
                    if provider.is_eligible() {
                        let targets = provider.targets().await;
                        print_targets(&targets, args.json)?;
                    } else {
                        println!("gulpfile disappeared from {}", dir.display());
                    }
                }
                None => break,
            },
        }
    }

    provider.close();
    Ok(())
}

fn print_targets(targets: &[TargetDescriptor], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(targets)?);
        return Ok(());
    }

    println!("targets ({}):", targets.len());
    for target in targets {
        println!("  - {}", target.name);
        println!("      exec: {} {}", target.exec, target.args.join(" "));
    }
    Ok(())
}
