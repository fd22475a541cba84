//! Exclude-pattern filtering for tree walking

use glob::{MatchOptions, Pattern};

use crate::error::ConfigError;

const PATH_MATCH: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Compiled exclude patterns, applied identically to both trees.
///
/// A pattern matches an entry when it matches either the full relative path
/// or the final path component, so `*.tmp` excludes `x.tmp` and `sub/x.tmp`
/// alike while `build/cache` only excludes that exact subtree. Wildcards in
/// the full-path match never cross a `/`.
#[derive(Debug, Clone, Default)]
pub struct ExcludeFilter {
    patterns: Vec<Pattern>,
}

impl ExcludeFilter {
    /// Compile all patterns, failing on the first invalid one.
    pub fn new(patterns: &[String]) -> Result<Self, ConfigError> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|e| ConfigError::InvalidPattern {
                    pattern: p.clone(),
                    reason: e.msg.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Check if a `/`-separated relative path should be excluded.
    pub fn is_excluded(&self, relative_path: &str) -> bool {
        if relative_path.is_empty() {
            return false;
        }
        let name = relative_path
            .rsplit('/')
            .next()
            .unwrap_or(relative_path);

        self.patterns
            .iter()
            .any(|p| p.matches_with(relative_path, PATH_MATCH) || p.matches(name))
    }
}
