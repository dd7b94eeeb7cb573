use std::error::Error;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use gulp_targets::discover::{GulpProvider, ProviderEvent};
use gulp_targets::extract::{ExtractorReport, TaskExtractor};

type TestResult = Result<(), Box<dyn Error>>;

/// Extractor stub that replies with a canned report, standing in for the
/// `node` child so the provider's policy can be tested hermetically.
struct FixedExtractor(ExtractorReport);

#[async_trait]
impl TaskExtractor for FixedExtractor {
    async fn extract(&self, _dir: &Path, _gulpfile: &Path) -> ExtractorReport {
        self.0.clone()
    }
}

fn provider_with_report(
    dir: &Path,
    report: ExtractorReport,
) -> (GulpProvider, mpsc::Receiver<ProviderEvent>) {
    let (tx, rx) = mpsc::channel::<ProviderEvent>(8);
    let provider = GulpProvider::with_extractor(dir, tx, Arc::new(FixedExtractor(report)));
    (provider, rx)
}

fn make_project(dir: &Path, with_local_gulp: bool) -> TestResult {
    fs::write(dir.join("gulpfile.js"), "// empty")?;
    if with_local_gulp {
        let binary = if cfg!(windows) { "gulp.cmd" } else { "gulp" };
        let bin_dir = dir.join("node_modules").join(".bin");
        fs::create_dir_all(&bin_dir)?;
        fs::write(bin_dir.join(binary), "#!/bin/sh\n")?;
    }
    Ok(())
}

#[tokio::test]
async fn successful_report_yields_ordered_targets() -> TestResult {
    let dir = tempfile::tempdir()?;
    make_project(dir.path(), true)?;

    let report = ExtractorReport::tasks(["watch", "default", "dev build"]);
    let (mut provider, _rx) = provider_with_report(dir.path(), report);
    assert!(provider.is_eligible());

    let targets = provider.targets().await;
    let names: Vec<&str> = targets.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Gulp: default", "Gulp: dev build", "Gulp: watch"]);

    let binary = if cfg!(windows) { "gulp.cmd" } else { "gulp" };
    let local = dir.path().join("node_modules").join(".bin").join(binary);
    for target in &targets {
        assert_eq!(target.exec, local.to_string_lossy());
        assert_eq!(target.args.len(), 1);
        assert!(!target.sh);
    }

    provider.close();
    Ok(())
}

#[tokio::test]
async fn failed_extraction_degrades_to_the_default_target() -> TestResult {
    let dir = tempfile::tempdir()?;
    make_project(dir.path(), false)?;

    let report = ExtractorReport::failure("Cannot find module 'gulp'");
    let (mut provider, _rx) = provider_with_report(dir.path(), report);
    assert!(provider.is_eligible());

    let targets = provider.targets().await;
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].name, "Gulp: default");
    assert_eq!(targets[0].args, vec!["default".to_string()]);

    let expected = if cfg!(windows) { "gulp.cmd" } else { "gulp" };
    assert_eq!(targets[0].exec, expected);

    Ok(())
}

#[tokio::test]
async fn empty_but_successful_report_yields_no_targets() -> TestResult {
    let dir = tempfile::tempdir()?;
    make_project(dir.path(), false)?;

    let (mut provider, _rx) = provider_with_report(dir.path(), ExtractorReport::tasks::<_, String>([]));
    assert!(provider.is_eligible());

    let targets = provider.targets().await;
    assert!(targets.is_empty());

    Ok(())
}

#[tokio::test]
async fn repeated_scans_are_idempotent() -> TestResult {
    let dir = tempfile::tempdir()?;
    make_project(dir.path(), false)?;

    let report = ExtractorReport::tasks(["clean", "build", "default"]);
    let (mut provider, _rx) = provider_with_report(dir.path(), report);
    assert!(provider.is_eligible());

    let first = provider.targets().await;
    let second = provider.targets().await;
    assert_eq!(first, second);

    Ok(())
}

#[tokio::test]
async fn overlapping_scans_resolve_independently() -> TestResult {
    let dir = tempfile::tempdir()?;
    make_project(dir.path(), false)?;

    let report = ExtractorReport::tasks(["default", "lint"]);
    let (mut a, _rx_a) = provider_with_report(dir.path(), report.clone());
    let (mut b, _rx_b) = provider_with_report(dir.path(), report);
    assert!(a.is_eligible());
    assert!(b.is_eligible());

    let (ta, tb) = tokio::join!(a.targets(), b.targets());
    assert_eq!(ta, tb);
    assert_eq!(ta.len(), 2);

    Ok(())
}

/// End-to-end failure path with the real extractor: a gulpfile with no gulp
/// installed must degrade to the default target whether or not `node` is
/// even present on this machine.
#[tokio::test]
async fn real_extractor_without_gulp_degrades_to_default() -> TestResult {
    let dir = tempfile::tempdir()?;
    make_project(dir.path(), false)?;

    let (tx, _rx) = mpsc::channel::<ProviderEvent>(8);
    let mut provider = GulpProvider::new(dir.path(), tx);
    assert!(provider.is_eligible());

    let targets = provider.targets().await;
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].name, "Gulp: default");

    Ok(())
}
