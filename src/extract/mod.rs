// src/extract/mod.rs

//! Out-of-process gulpfile evaluation.
//!
//! The only way to learn which tasks a gulpfile defines is to evaluate it:
//! registration with the gulp library is a side effect of loading the file.
//! A gulpfile is arbitrary user script though, so evaluation happens in a
//! disposable child process that either reports the registered task names or
//! a structured failure, then exits. Nothing the gulpfile does (throw, hang,
//! clobber globals) can reach this process.
//!
//! - [`report`] defines the wire shape of the child's single JSON reply.
//! - [`node`] spawns the `node` child that does the actual evaluation.

pub mod node;
pub mod report;

pub use node::NodeExtractor;
pub use report::{ExtractorError, ExtractorReport};

use std::path::Path;

use async_trait::async_trait;

/// Contract between the discovery provider and the isolated evaluation unit.
///
/// Implementations take (project directory, gulpfile path) and come back with
/// exactly one [`ExtractorReport`]. They never return a Rust error and never
/// panic; every failure mode is folded into the report's failure variant so
/// the provider can pattern-match its way to a fallback.
#[async_trait]
pub trait TaskExtractor: Send + Sync {
    async fn extract(&self, dir: &Path, gulpfile: &Path) -> ExtractorReport;
}
