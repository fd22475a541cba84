//! treecmp - compare two directory trees
//!
//! Walk both roots, sort every relative path into only-in-A, only-in-B,
//! differ, or same, then report the result to the console and/or CSV.

pub mod checksum;
pub mod compare;
pub mod error;
pub mod output;
pub mod tree;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use compare::{
    Classification, Counts, Difference, Equality, Mismatch, MismatchReason, Status, classify,
    compare_entries, compare_trees,
};
pub use error::{ConfigError, Error, OutputError, TraversalError};
pub use output::{
    ConsoleFormat, ConsoleFormatter, Destinations, ExitStatus, OutputConfig, print_json, report,
    write_csv, write_csv_to,
};
pub use tree::{Entry, EntryKind, ExcludeFilter, Skipped, TreeListing, TreeWalker, WalkerConfig};
