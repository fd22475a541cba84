//! Report rendering and exit status
//!
//! This module turns a `Classification` into user-facing output:
//! - Console output with colors (titled sections)
//! - JSON output
//! - CSV export of the differences
//!
//! # Module Structure
//!
//! - `config` - Output configuration and destinations
//! - `console` - Sectioned console formatter
//! - `csv_export` - CSV writer
//! - `json` - JSON output

mod config;
mod console;
mod csv_export;
mod json;

use std::process::ExitCode;

pub use config::{ConsoleFormat, Destinations, OutputConfig};
pub use console::ConsoleFormatter;
pub use csv_export::{CSV_HEADER, write_csv, write_csv_to};
pub use json::{JsonReport, print_json, to_json};

use crate::compare::Classification;
use crate::error::OutputError;

/// Process exit status of a comparison run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// No paths only in A, only in B, or differing
    Equivalent,
    /// At least one difference found
    Different,
    /// Bad arguments or missing/unreadable roots
    Usage,
    /// The comparison ran but its report could not be written
    OutputFailed,
}

impl ExitStatus {
    pub fn from_classification(result: &Classification) -> Self {
        if result.is_equivalent() {
            ExitStatus::Equivalent
        } else {
            ExitStatus::Different
        }
    }

    pub fn code(self) -> u8 {
        match self {
            ExitStatus::Equivalent => 0,
            ExitStatus::Different => 1,
            ExitStatus::Usage => 2,
            ExitStatus::OutputFailed => 3,
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status.code())
    }
}

/// Render `result` to every requested destination and compute the exit status.
///
/// The console report is written before the CSV export, so a CSV failure
/// still leaves the console output in place.
pub fn report(
    result: &Classification,
    destinations: &Destinations,
    config: &OutputConfig,
) -> Result<ExitStatus, OutputError> {
    if destinations.console {
        match config.format {
            ConsoleFormat::Text => ConsoleFormatter::new(config.clone()).print(result)?,
            ConsoleFormat::Json => print_json(result, config)?,
        }
    }

    if let Some(path) = &destinations.csv_path {
        write_csv(result, path)?;
    }

    Ok(ExitStatus::from_classification(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::{Equality, classify};
    use crate::tree::{Entry, TreeListing};

    #[test]
    fn test_exit_codes() {
        assert_eq!(ExitStatus::Equivalent.code(), 0);
        assert_eq!(ExitStatus::Different.code(), 1);
        assert_eq!(ExitStatus::Usage.code(), 2);
        assert_eq!(ExitStatus::OutputFailed.code(), 3);
    }

    #[test]
    fn test_exit_status_follows_differences() {
        let a: TreeListing = [("a", Entry::file(1))].into_iter().collect();
        let same = classify(a.clone(), a.clone(), Equality::Metadata);
        assert_eq!(ExitStatus::from_classification(&same), ExitStatus::Equivalent);

        let only_a = classify(a, TreeListing::new(), Equality::Metadata);
        assert_eq!(ExitStatus::from_classification(&only_a), ExitStatus::Different);
    }

    #[test]
    fn test_report_csv_only() {
        let dir = tempfile::TempDir::new().unwrap();
        let csv_path = dir.path().join("diff.csv");
        let b: TreeListing = [("new", Entry::file(3))].into_iter().collect();
        let result = classify(TreeListing::new(), b, Equality::Metadata);

        let destinations = Destinations {
            console: false,
            csv_path: Some(csv_path.clone()),
        };
        let status = report(&result, &destinations, &OutputConfig::default()).unwrap();
        assert_eq!(status, ExitStatus::Different);
        assert_eq!(
            std::fs::read_to_string(csv_path).unwrap(),
            "status,path,size_in_A,size_in_B\nONLY_B,new,,3\n"
        );
    }

    #[test]
    fn test_report_csv_failure_is_output_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let destinations = Destinations {
            console: false,
            csv_path: Some(dir.path().join("missing/diff.csv")),
        };
        let result = report(&Classification::default(), &destinations, &OutputConfig::default());
        assert!(matches!(result, Err(OutputError::Csv { .. })));
    }
}
