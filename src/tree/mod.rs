//! Directory tree walking
//!
//! `TreeWalker` enumerates everything under a root into a `TreeListing`:
//! files, directories (including empty ones), and symlinks as themselves.
//! Two roots can be walked concurrently with `TreeWalker::walk_pair`.

mod config;
mod filter;
mod listing;
mod utils;
mod walker;

pub use config::WalkerConfig;
pub use filter::ExcludeFilter;
pub use listing::{Entry, EntryKind, Skipped, TreeListing};
pub use utils::{format_size, lossy_relative_path, relative_path};
pub use walker::TreeWalker;
