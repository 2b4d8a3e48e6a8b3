//! Rebuild-on-change by polling modification times.
//!
//! The watcher keeps a snapshot of `path → mtime` for every file under the
//! base directory (the output directory excluded, since every pass rewrites
//! it). A poll takes a fresh snapshot; any added, changed, or removed file
//! triggers one full pass. A failed pass is logged and watching continues.

use crate::generate::WriteReport;
use crate::site::{Generator, SiteError};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, SystemTime};
use tracing::{error, info};
use walkdir::WalkDir;

/// Delay between polls.
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

pub type Snapshot = BTreeMap<PathBuf, SystemTime>;

/// Modification time of every file under `base`, skipping `output`.
pub fn snapshot(base: &Path, output: &Path) -> Snapshot {
    WalkDir::new(base)
        .into_iter()
        .filter_entry(|entry| entry.path() != output)
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let modified = entry.metadata().ok()?.modified().ok()?;
            Some((entry.into_path(), modified))
        })
        .collect()
}

/// Paths that were added, modified or removed between two snapshots.
pub fn changed_paths(before: &Snapshot, after: &Snapshot) -> Vec<PathBuf> {
    let mut changed: Vec<PathBuf> = after
        .iter()
        .filter(|(path, modified)| before.get(*path) != Some(*modified))
        .map(|(path, _)| path.clone())
        .collect();
    changed.extend(
        before
            .keys()
            .filter(|path| !after.contains_key(*path))
            .cloned(),
    );
    changed
}

/// Result of one poll.
#[derive(Debug)]
pub enum Poll {
    Unchanged,
    Rebuilt(WriteReport),
    Failed(SiteError),
}

pub struct Watcher<'g> {
    generator: &'g Generator,
    snapshot: Snapshot,
    interval: Duration,
}

impl<'g> Watcher<'g> {
    /// Start watching the generator's base directory from its current state.
    pub fn new(generator: &'g Generator) -> Self {
        let mut watcher = Self {
            generator,
            snapshot: Snapshot::new(),
            interval: POLL_INTERVAL,
        };
        watcher.snapshot = watcher.take_snapshot();
        watcher
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    fn take_snapshot(&self) -> Snapshot {
        let paths = &self.generator.site().paths;
        snapshot(&paths.base, &paths.output)
    }

    /// Compare against the last snapshot and rebuild once if anything moved.
    pub fn poll_once(&mut self) -> Poll {
        let current = self.take_snapshot();
        let changed = changed_paths(&self.snapshot, &current);
        if changed.is_empty() {
            return Poll::Unchanged;
        }
        for path in &changed {
            info!(path = %path.display(), "change detected");
        }

        let outcome = match self.generator.run_pass() {
            Ok(report) => Poll::Rebuilt(report),
            Err(e) => {
                error!(error = %e, "build failed");
                Poll::Failed(e)
            }
        };
        self.snapshot = self.take_snapshot();
        outcome
    }

    /// Poll forever, calling `on_rebuild` after every successful pass.
    pub fn run(&mut self, mut on_rebuild: impl FnMut(&WriteReport)) -> ! {
        info!(
            dir = %self.generator.site().paths.base.display(),
            "watching for changes"
        );
        loop {
            if let Poll::Rebuilt(report) = self.poll_once() {
                on_rebuild(&report);
            }
            thread::sleep(self.interval);
        }
    }
}
