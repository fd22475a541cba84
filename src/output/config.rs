//! Output configuration types

use std::path::PathBuf;

/// How the console report is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConsoleFormat {
    /// Titled sections, one path per line
    #[default]
    Text,
    /// The whole classification as pretty-printed JSON
    Json,
}

/// Configuration for output formatting.
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    pub use_color: bool,
    /// Also list paths that are the same in both trees
    pub show_same: bool,
    pub format: ConsoleFormat,
    /// Root paths as given by the user, shown above the report
    pub roots: Option<(String, String)>,
}

impl OutputConfig {
    pub fn with_roots(mut self, a: impl Into<String>, b: impl Into<String>) -> Self {
        self.roots = Some((a.into(), b.into()));
        self
    }
}

/// Where the report goes.
#[derive(Debug, Clone, Default)]
pub struct Destinations {
    /// Print the report to stdout
    pub console: bool,
    /// Also export the differences as CSV
    pub csv_path: Option<PathBuf>,
}
