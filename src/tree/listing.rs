//! Listing types produced by a tree walk

use std::collections::BTreeMap;
use std::fmt;
use std::fs::Metadata;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::TraversalError;

/// What kind of filesystem object an entry is. Symlinks are never resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
}

impl EntryKind {
    /// Derive the kind from `lstat`-style metadata.
    /// Returns `None` for sockets, FIFOs, and devices.
    pub fn from_metadata(meta: &Metadata) -> Option<Self> {
        let ft = meta.file_type();
        if ft.is_symlink() {
            Some(EntryKind::Symlink)
        } else if ft.is_dir() {
            Some(EntryKind::Directory)
        } else if ft.is_file() {
            Some(EntryKind::File)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::File => "file",
            EntryKind::Directory => "directory",
            EntryKind::Symlink => "symlink",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One filesystem object under a scanned root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub kind: EntryKind,
    /// Size in bytes; `None` for directories
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Modification time. Informational only, never used for equality.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtime: Option<DateTime<Utc>>,
    /// Hex SHA-256 of the content, present only for files in checksum mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

impl Entry {
    pub fn file(size: u64) -> Self {
        Self {
            kind: EntryKind::File,
            size: Some(size),
            mtime: None,
            checksum: None,
        }
    }

    pub fn directory() -> Self {
        Self {
            kind: EntryKind::Directory,
            size: None,
            mtime: None,
            checksum: None,
        }
    }

    pub fn symlink(size: u64) -> Self {
        Self {
            kind: EntryKind::Symlink,
            size: Some(size),
            mtime: None,
            checksum: None,
        }
    }

    /// Build an entry from metadata. The checksum is filled in separately.
    pub fn from_metadata(kind: EntryKind, meta: &Metadata) -> Self {
        let size = match kind {
            EntryKind::Directory => None,
            _ => Some(meta.len()),
        };
        Self {
            kind,
            size,
            mtime: meta.modified().ok().map(DateTime::<Utc>::from),
            checksum: None,
        }
    }

    #[cfg(test)]
    pub fn with_mtime(mut self, mtime: DateTime<Utc>) -> Self {
        self.mtime = Some(mtime);
        self
    }

    #[cfg(test)]
    pub fn with_checksum(mut self, checksum: impl Into<String>) -> Self {
        self.checksum = Some(checksum.into());
        self
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// An entry left out of a listing because it could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Skipped {
    pub path: String,
    #[serde(serialize_with = "serialize_display")]
    pub reason: TraversalError,
}

fn serialize_display<S: serde::Serializer>(
    value: &TraversalError,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// All entries found under one root, keyed by `/`-separated relative path.
///
/// The root itself is never a key. Iteration is in ascending lexical order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeListing {
    entries: BTreeMap<String, Entry>,
    skipped: Vec<Skipped>,
}

impl TreeListing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry. Empty paths (the root) are ignored.
    /// Returns `false` if the path was already present.
    pub fn insert(&mut self, path: impl Into<String>, entry: Entry) -> bool {
        let path = path.into();
        if path.is_empty() {
            return false;
        }
        self.entries.insert(path, entry).is_none()
    }

    pub fn record_skipped(&mut self, path: impl Into<String>, reason: TraversalError) {
        self.skipped.push(Skipped {
            path: path.into(),
            reason,
        });
    }

    pub fn get(&self, path: &str) -> Option<&Entry> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(p, e)| (p.as_str(), e))
    }

    pub fn skipped(&self) -> &[Skipped] {
        &self.skipped
    }

    /// Sort skipped entries so diagnostics do not depend on worker scheduling.
    pub(crate) fn sort_skipped(&mut self) {
        self.skipped.sort_by(|a, b| a.path.cmp(&b.path));
    }

    pub(crate) fn into_parts(self) -> (BTreeMap<String, Entry>, Vec<Skipped>) {
        (self.entries, self.skipped)
    }
}

impl<P: Into<String>> FromIterator<(P, Entry)> for TreeListing {
    fn from_iter<I: IntoIterator<Item = (P, Entry)>>(iter: I) -> Self {
        let mut listing = TreeListing::new();
        for (path, entry) in iter {
            listing.insert(path, entry);
        }
        listing
    }
}
