//! TreeWalker - builds a full listing of one root in memory

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use ignore::{WalkBuilder, WalkState};
use tracing::{debug, info, warn};

use crate::checksum::file_digest;
use crate::error::{ConfigError, TraversalError};

use super::config::WalkerConfig;
use super::filter::ExcludeFilter;
use super::listing::{Entry, EntryKind, TreeListing};
use super::utils::{format_size, lossy_relative_path, relative_path};

/// Result of visiting one path, sent from a walk worker to the collector.
enum WalkEvent {
    Found(String, Entry),
    Skipped(String, TraversalError),
}

/// Parallel tree walker.
///
/// Directory reads are spread over a bounded pool of worker threads. Workers
/// never touch the listing directly: each sends its findings over a channel and
/// the listing is assembled on the calling thread once the walk has joined.
pub struct TreeWalker {
    config: WalkerConfig,
    filter: Arc<ExcludeFilter>,
}

impl TreeWalker {
    /// Create a walker, compiling the exclude patterns.
    pub fn new(config: WalkerConfig) -> Result<Self, ConfigError> {
        let filter = ExcludeFilter::new(&config.exclude_patterns)?;
        Ok(Self {
            config,
            filter: Arc::new(filter),
        })
    }

    /// Walk a single root and return its listing.
    pub fn walk(&self, root: &Path) -> Result<TreeListing, ConfigError> {
        let root = resolve_root(root)?;
        let started = Instant::now();

        let (tx, rx) = mpsc::channel::<WalkEvent>();
        self.build_walk(&root).run(|| {
            let tx = tx.clone();
            let root = root.clone();
            let checksum = self.config.checksum;
            Box::new(move |result: Result<ignore::DirEntry, ignore::Error>| {
                let Some(event) = visit(&root, result, checksum) else {
                    return WalkState::Continue;
                };
                match tx.send(event) {
                    Ok(()) => WalkState::Continue,
                    Err(_) => WalkState::Quit,
                }
            })
        });
        drop(tx);

        let mut listing = TreeListing::new();
        let mut total_bytes = 0u64;
        for event in rx {
            match event {
                WalkEvent::Found(path, entry) => {
                    if entry.kind == EntryKind::File {
                        total_bytes += entry.size.unwrap_or(0);
                    }
                    listing.insert(path, entry);
                }
                WalkEvent::Skipped(path, reason) => {
                    info!(root = %root.display(), %path, %reason, "skipped entry");
                    listing.record_skipped(path, reason);
                }
            }
        }
        listing.sort_skipped();

        if !listing.skipped().is_empty() {
            warn!(
                "{} entries under '{}' could not be read and were skipped",
                listing.skipped().len(),
                root.display()
            );
        }
        info!(
            root = %root.display(),
            entries = listing.len(),
            bytes = %format_size(total_bytes),
            elapsed = %humantime::format_duration(truncate_to_millis(started.elapsed())),
            "walked tree"
        );

        Ok(listing)
    }

    /// Walk two independent roots concurrently.
    ///
    /// Both roots are validated before either walk starts. The call returns
    /// only after both listings are complete.
    pub fn walk_pair(&self, a: &Path, b: &Path) -> Result<(TreeListing, TreeListing), ConfigError> {
        resolve_root(a)?;
        resolve_root(b)?;

        let (listing_a, listing_b) = rayon::join(|| self.walk(a), || self.walk(b));
        Ok((listing_a?, listing_b?))
    }

    fn build_walk(&self, root: &Path) -> ignore::WalkParallel {
        let filter = Arc::clone(&self.filter);
        let filter_root = root.to_path_buf();

        WalkBuilder::new(root)
            .hidden(false)
            .parents(false)
            .ignore(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .follow_links(false)
            .threads(self.config.parallel_workers)
            .filter_entry(move |dent| {
                lossy_relative_path(&filter_root, dent.path())
                    .is_none_or(|rel| !filter.is_excluded(&rel))
            })
            .build_parallel()
    }
}

/// Check that `root` is a readable directory and return its canonical form.
///
/// Canonicalizing means a root given as a symlink to a directory is walked
/// as that directory.
fn resolve_root(root: &Path) -> Result<PathBuf, ConfigError> {
    if !root.is_dir() {
        return Err(ConfigError::NotADirectory {
            path: root.to_path_buf(),
        });
    }
    let canonical = root.canonicalize().map_err(|source| ConfigError::Unreadable {
        path: root.to_path_buf(),
        source,
    })?;
    std::fs::read_dir(&canonical).map_err(|source| ConfigError::Unreadable {
        path: root.to_path_buf(),
        source,
    })?;
    Ok(canonical)
}

/// Turn one walker result into an event. Returns `None` for the root itself
/// and for special files (sockets, FIFOs, devices).
fn visit(
    root: &Path,
    result: Result<ignore::DirEntry, ignore::Error>,
    checksum: bool,
) -> Option<WalkEvent> {
    let dent = match result {
        Ok(dent) => dent,
        Err(err) => {
            let path = error_path(&err)
                .and_then(|p| relative_path(root, p))
                .unwrap_or_else(|| "?".to_string());
            return Some(WalkEvent::Skipped(path, TraversalError::from_walk(&err)));
        }
    };

    if dent.depth() == 0 {
        return None;
    }
    let path = relative_path(root, dent.path())?;

    let meta = match dent.metadata() {
        Ok(meta) => meta,
        Err(err) => return Some(WalkEvent::Skipped(path, TraversalError::from_walk(&err))),
    };
    let Some(kind) = EntryKind::from_metadata(&meta) else {
        debug!(%path, "ignoring special file");
        return None;
    };

    let mut entry = Entry::from_metadata(kind, &meta);
    if checksum && kind == EntryKind::File {
        match file_digest(dent.path()) {
            Ok(digest) => entry.checksum = Some(digest),
            Err(err) => {
                let reason = match TraversalError::from_io(&err) {
                    TraversalError::Other(msg) => TraversalError::Checksum(msg),
                    other => other,
                };
                return Some(WalkEvent::Skipped(path, reason));
            }
        }
    }

    Some(WalkEvent::Found(path, entry))
}

/// Dig the offending path out of a walker error.
fn error_path(err: &ignore::Error) -> Option<&Path> {
    match err {
        ignore::Error::WithPath { path, .. } => Some(path.as_path()),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            error_path(err)
        }
        ignore::Error::Loop { child, .. } => Some(child.as_path()),
        _ => None,
    }
}

fn truncate_to_millis(d: Duration) -> Duration {
    Duration::from_millis(d.as_millis() as u64)
}
