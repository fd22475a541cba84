//! Three-way classification of two tree listings
//!
//! Every path present in either listing lands in exactly one of four buckets:
//! only in A, only in B, in both but different, or in both and the same.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::error::ConfigError;
use crate::tree::{Entry, EntryKind, Skipped, TreeListing, TreeWalker, WalkerConfig};

/// Policy deciding when two entries at the same path are identical.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Equality {
    /// Same kind and, for files, same size. Modification times are ignored.
    #[default]
    Metadata,
    /// Same kind and, for files, same content digest.
    Checksum,
}

/// Which bucket a path falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    #[serde(rename = "ONLY_A")]
    OnlyA,
    #[serde(rename = "ONLY_B")]
    OnlyB,
    #[serde(rename = "DIFFER")]
    Differ,
    #[serde(rename = "SAME")]
    Same,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::OnlyA => "ONLY_A",
            Status::OnlyB => "ONLY_B",
            Status::Differ => "DIFFER",
            Status::Same => "SAME",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One path that is not SAME, with whatever each side holds at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Difference<'a> {
    pub status: Status,
    pub path: &'a str,
    pub a: Option<&'a Entry>,
    pub b: Option<&'a Entry>,
}

/// Why two entries at the same path were classified as different.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MismatchReason {
    /// One side is a file, the other a directory or symlink (or similar)
    Kind,
    Size,
    Checksum,
}

/// A path present in both trees whose entries differ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mismatch {
    pub a: Entry,
    pub b: Entry,
    pub reason: MismatchReason,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            MismatchReason::Kind => write!(f, "kind: {} -> {}", self.a.kind, self.b.kind),
            MismatchReason::Size => write!(
                f,
                "size: {} -> {}",
                self.a.size.unwrap_or(0),
                self.b.size.unwrap_or(0)
            ),
            MismatchReason::Checksum => f.write_str("content differs"),
        }
    }
}

/// Per-bucket member counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub only_a: usize,
    pub only_b: usize,
    pub differ: usize,
    pub same: usize,
    pub skipped: usize,
}

/// Partition of `keys(A) ∪ keys(B)` into four disjoint sets.
///
/// Maps are keyed by relative path so iteration is already in the ascending
/// lexical order the reports need.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub mode: Equality,
    pub only_a: BTreeMap<String, Entry>,
    pub only_b: BTreeMap<String, Entry>,
    pub differ: BTreeMap<String, Mismatch>,
    pub same: BTreeMap<String, Entry>,
    /// Entries that could not be read while walking A
    pub skipped_a: Vec<Skipped>,
    /// Entries that could not be read while walking B
    pub skipped_b: Vec<Skipped>,
}

impl Classification {
    /// True when nothing was added, removed, or changed.
    pub fn is_equivalent(&self) -> bool {
        self.difference_count() == 0
    }

    /// Number of paths in ONLY_A, ONLY_B, and DIFFER combined.
    pub fn difference_count(&self) -> usize {
        self.only_a.len() + self.only_b.len() + self.differ.len()
    }

    /// Every ONLY_A, ONLY_B, and DIFFER path, grouped in that order and
    /// sorted by path within each group.
    pub fn differences(&self) -> impl Iterator<Item = Difference<'_>> {
        let only_a = self.only_a.iter().map(|(path, entry)| Difference {
            status: Status::OnlyA,
            path,
            a: Some(entry),
            b: None,
        });
        let only_b = self.only_b.iter().map(|(path, entry)| Difference {
            status: Status::OnlyB,
            path,
            a: None,
            b: Some(entry),
        });
        let differ = self.differ.iter().map(|(path, mismatch)| Difference {
            status: Status::Differ,
            path,
            a: Some(&mismatch.a),
            b: Some(&mismatch.b),
        });
        only_a.chain(only_b).chain(differ)
    }

    pub fn counts(&self) -> Counts {
        Counts {
            only_a: self.only_a.len(),
            only_b: self.only_b.len(),
            differ: self.differ.len(),
            same: self.same.len(),
            skipped: self.skipped_a.len() + self.skipped_b.len(),
        }
    }
}

/// Classify every path in `a` and `b`.
///
/// Set differences come from a single pass over each listing; the equality
/// predicate runs once per shared path.
pub fn classify(a: TreeListing, b: TreeListing, mode: Equality) -> Classification {
    let (entries_a, skipped_a) = a.into_parts();
    let (mut entries_b, skipped_b) = b.into_parts();

    let mut result = Classification {
        mode,
        skipped_a,
        skipped_b,
        ..Default::default()
    };

    for (path, entry_a) in entries_a {
        match entries_b.remove(&path) {
            None => {
                result.only_a.insert(path, entry_a);
            }
            Some(entry_b) => match compare_entries(&entry_a, &entry_b, mode) {
                None => {
                    result.same.insert(path, entry_a);
                }
                Some(reason) => {
                    result.differ.insert(
                        path,
                        Mismatch {
                            a: entry_a,
                            b: entry_b,
                            reason,
                        },
                    );
                }
            },
        }
    }
    // Whatever A did not claim exists only in B
    result.only_b = entries_b;

    debug!(counts = ?result.counts(), ?mode, "classified listings");
    result
}

/// Walk both roots concurrently and classify the results.
///
/// Checksum mode turns on content hashing in the walker.
pub fn compare_trees(
    a: &Path,
    b: &Path,
    mut config: WalkerConfig,
    mode: Equality,
) -> Result<Classification, ConfigError> {
    config.checksum |= mode == Equality::Checksum;
    let walker = TreeWalker::new(config)?;
    let (listing_a, listing_b) = walker.walk_pair(a, b)?;
    Ok(classify(listing_a, listing_b, mode))
}

/// Apply the equality predicate. `None` means equal.
pub fn compare_entries(a: &Entry, b: &Entry, mode: Equality) -> Option<MismatchReason> {
    if a.kind != b.kind {
        return Some(MismatchReason::Kind);
    }
    if a.kind != EntryKind::File {
        return None;
    }
    match (mode, a.checksum.as_ref(), b.checksum.as_ref()) {
        (Equality::Checksum, Some(sum_a), Some(sum_b)) => {
            (sum_a != sum_b).then_some(MismatchReason::Checksum)
        }
        // Metadata mode, or a listing built without digests
        _ => (a.size != b.size).then_some(MismatchReason::Size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeSet;

    fn listing(entries: &[(&str, Entry)]) -> TreeListing {
        entries.iter().cloned().collect()
    }

    fn keys<V>(map: &BTreeMap<String, V>) -> Vec<&str> {
        map.keys().map(String::as_str).collect()
    }

    fn sample_a() -> TreeListing {
        listing(&[
            ("f1", Entry::file(10)),
            ("dir", Entry::directory()),
            ("dir/f2", Entry::file(5)),
            ("gone", Entry::file(3)),
            ("swap", Entry::file(1)),
        ])
    }

    fn sample_b() -> TreeListing {
        listing(&[
            ("f1", Entry::file(10)),
            ("dir", Entry::directory()),
            ("dir/f2", Entry::file(99)),
            ("new", Entry::directory()),
            ("swap", Entry::directory()),
        ])
    }

    #[test]
    fn test_partition_covers_union_and_is_disjoint() {
        let a = sample_a();
        let b = sample_b();
        let union: BTreeSet<String> = a.paths().chain(b.paths()).map(String::from).collect();

        let result = classify(a, b, Equality::Metadata);
        let mut seen = BTreeSet::new();
        for path in result
            .only_a
            .keys()
            .chain(result.only_b.keys())
            .chain(result.differ.keys())
            .chain(result.same.keys())
        {
            assert!(seen.insert(path.clone()), "{} classified twice", path);
        }
        assert_eq!(seen, union);
    }

    #[test]
    fn test_classify_against_self_is_all_same() {
        for mode in [Equality::Metadata, Equality::Checksum] {
            let a = sample_a();
            let result = classify(a.clone(), a.clone(), mode);
            assert!(result.only_a.is_empty());
            assert!(result.only_b.is_empty());
            assert!(result.differ.is_empty());
            assert_eq!(keys(&result.same), a.paths().collect::<Vec<_>>());
            assert!(result.is_equivalent());
        }
    }

    #[test]
    fn test_swapping_arguments_swaps_one_sided_sets() {
        let forward = classify(sample_a(), sample_b(), Equality::Metadata);
        let backward = classify(sample_b(), sample_a(), Equality::Metadata);
        assert_eq!(keys(&forward.only_a), keys(&backward.only_b));
        assert_eq!(keys(&forward.only_b), keys(&backward.only_a));
        assert_eq!(keys(&forward.differ), keys(&backward.differ));
    }

    #[test]
    fn test_metadata_mode_ignores_mtime() {
        let early = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let a = listing(&[("f", Entry::file(7).with_mtime(early))]);
        let b = listing(&[("f", Entry::file(7).with_mtime(late))]);

        let result = classify(a, b, Equality::Metadata);
        assert_eq!(keys(&result.same), vec!["f"]);
        assert!(result.differ.is_empty());
    }

    #[test]
    fn test_checksum_mode_catches_same_size_edit() {
        let a = listing(&[("f", Entry::file(4).with_checksum("aaaa"))]);
        let b = listing(&[("f", Entry::file(4).with_checksum("bbbb"))]);

        let metadata = classify(a.clone(), b.clone(), Equality::Metadata);
        assert_eq!(keys(&metadata.same), vec!["f"]);

        let checksum = classify(a, b, Equality::Checksum);
        assert_eq!(keys(&checksum.differ), vec!["f"]);
        assert_eq!(checksum.differ["f"].reason, MismatchReason::Checksum);
    }

    #[test]
    fn test_checksum_mode_without_digests_falls_back_to_size() {
        let a = listing(&[("f", Entry::file(4))]);
        let b = listing(&[("f", Entry::file(5))]);
        let result = classify(a, b, Equality::Checksum);
        assert_eq!(result.differ["f"].reason, MismatchReason::Size);
    }

    #[test]
    fn test_directories_never_differ() {
        let a = listing(&[("d", Entry::directory()), ("d/x", Entry::file(1))]);
        let b = listing(&[("d", Entry::directory()), ("d/x", Entry::file(2))]);
        let result = classify(a, b, Equality::Metadata);
        assert_eq!(keys(&result.same), vec!["d"]);
        assert_eq!(keys(&result.differ), vec!["d/x"]);
    }

    #[test]
    fn test_kind_mismatch_is_differ() {
        let result = classify(sample_a(), sample_b(), Equality::Metadata);
        let swap = &result.differ["swap"];
        assert_eq!(swap.reason, MismatchReason::Kind);
        assert_eq!(swap.to_string(), "kind: file -> directory");
    }

    #[test]
    fn test_symlinks_compare_by_kind() {
        let a = listing(&[("l", Entry::symlink(3))]);
        let b = listing(&[("l", Entry::symlink(12))]);
        let result = classify(a, b, Equality::Metadata);
        assert_eq!(keys(&result.same), vec!["l"]);
    }

    #[test]
    fn test_only_a_scenario() {
        let a = listing(&[("f1", Entry::file(100))]);
        let result = classify(a, TreeListing::new(), Equality::Metadata);
        assert_eq!(keys(&result.only_a), vec!["f1"]);
        assert!(!result.is_equivalent());
    }

    #[test]
    fn test_size_change_scenario() {
        let a = listing(&[("f1", Entry::file(10)), ("dir/f2", Entry::file(5))]);
        let b = listing(&[("f1", Entry::file(10)), ("dir/f2", Entry::file(99))]);
        let result = classify(a, b, Equality::Metadata);
        assert_eq!(keys(&result.differ), vec!["dir/f2"]);
        assert_eq!(keys(&result.same), vec!["f1"]);
        assert_eq!(result.differ["dir/f2"].to_string(), "size: 5 -> 99");
        assert_eq!(result.difference_count(), 1);
    }

    #[test]
    fn test_identical_scenario() {
        let a = listing(&[("a", Entry::file(1)), ("b", Entry::file(2))]);
        let result = classify(a.clone(), a, Equality::Metadata);
        assert_eq!(
            result.counts(),
            Counts {
                same: 2,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_differences_grouped_by_status() {
        let result = classify(sample_a(), sample_b(), Equality::Metadata);
        let rows: Vec<_> = result
            .differences()
            .map(|d| (d.status.as_str(), d.path))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("ONLY_A", "gone"),
                ("ONLY_B", "new"),
                ("DIFFER", "dir/f2"),
                ("DIFFER", "swap"),
            ]
        );
        assert_eq!(result.differences().count(), result.difference_count());
    }

    #[test]
    fn test_skipped_entries_carried_through() {
        let mut a = listing(&[("f", Entry::file(1))]);
        a.record_skipped("locked", crate::error::TraversalError::PermissionDenied);
        let result = classify(a, TreeListing::new(), Equality::Metadata);
        assert_eq!(result.skipped_a.len(), 1);
        assert_eq!(result.counts().skipped, 1);
    }
}
