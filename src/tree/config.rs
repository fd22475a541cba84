//! Configuration types for tree walkers

/// Configuration for tree walking behavior.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Glob patterns; matching entries are omitted and matching directories pruned
    pub exclude_patterns: Vec<String>,
    /// Hash file contents (needed for checksum-mode comparison)
    pub checksum: bool,
    /// Number of parallel workers per tree.
    /// 0 = auto-detect (use available parallelism)
    /// 1 = sequential (no parallelism)
    /// N = use N worker threads
    pub parallel_workers: usize,
}

impl WalkerConfig {
    pub fn with_excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_checksum(mut self, checksum: bool) -> Self {
        self.checksum = checksum;
        self
    }
}
