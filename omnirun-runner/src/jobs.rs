//! Built-in workload
//!
//! The runner only ever sees the [`Job`] trait; this module provides the
//! default implementation wired into the binary. Deployments with a real
//! workload substitute their own `Job` and leave the rest of the runner
//! untouched.

use anyhow::Context;
use async_trait::async_trait;
use omnirun_core::domain::job::{Job, WorkLimit};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Walks a file tree and counts regular files, stopping at the work limit.
pub struct ScanJob {
    root: PathBuf,
}

impl ScanJob {
    /// Creates a scan job rooted at the given directory
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

#[async_trait]
impl Job for ScanJob {
    async fn run(&self, limit: WorkLimit) -> anyhow::Result<()> {
        let root = self.root.clone();
        let scanned = tokio::task::spawn_blocking(move || scan(&root, limit))
            .await
            .context("scan task panicked")??;

        info!("scanned {} file(s) under {}", scanned, self.root.display());
        Ok(())
    }
}

/// Counts regular files under `root`, depth-first, up to `limit` items.
///
/// Unreadable subdirectories are skipped with a warning; the limit bounds
/// work attempted, it is not a strict accounting contract. An unusable root
/// is a job failure.
fn scan(root: &Path, limit: WorkLimit) -> anyhow::Result<u64> {
    anyhow::ensure!(
        root.is_dir(),
        "scan root {} is not a directory",
        root.display()
    );

    let mut processed = 0u64;
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        if limit.is_reached(processed) {
            break;
        }

        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) => {
                warn!("skipping unreadable directory {}: {}", dir.display(), err);
                continue;
            }
        };

        for entry in entries {
            if limit.is_reached(processed) {
                break;
            }

            let entry =
                entry.with_context(|| format!("reading an entry of {}", dir.display()))?;
            let file_type = entry
                .file_type()
                .with_context(|| format!("inspecting {}", entry.path().display()))?;

            if file_type.is_dir() {
                stack.push(entry.path());
            } else if file_type.is_file() {
                processed += 1;
            }
        }
    }

    Ok(processed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populate(dir: &Path, files: usize) {
        for i in 0..files {
            fs::write(dir.join(format!("file-{}.txt", i)), b"x").unwrap();
        }
    }

    #[test]
    fn test_scan_counts_files_recursively() {
        let tmp = tempfile::tempdir().unwrap();
        populate(tmp.path(), 3);
        let nested = tmp.path().join("nested");
        fs::create_dir(&nested).unwrap();
        populate(&nested, 2);

        let scanned = scan(tmp.path(), WorkLimit::Unbounded).unwrap();
        assert_eq!(scanned, 5);
    }

    #[test]
    fn test_scan_stops_at_the_limit() {
        let tmp = tempfile::tempdir().unwrap();
        populate(tmp.path(), 10);

        let scanned = scan(tmp.path(), WorkLimit::Bounded(4)).unwrap();
        assert_eq!(scanned, 4);
    }

    #[test]
    fn test_missing_root_is_a_job_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let gone = tmp.path().join("does-not-exist");

        assert!(scan(&gone, WorkLimit::Unbounded).is_err());
    }

    #[tokio::test]
    async fn test_scan_job_runs_through_the_trait() {
        let tmp = tempfile::tempdir().unwrap();
        populate(tmp.path(), 2);

        let job = ScanJob::new(tmp.path().to_path_buf());
        assert!(job.run(WorkLimit::Bounded(1000)).await.is_ok());
    }
}
