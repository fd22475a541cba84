//! Shared utility functions for tree walking

use std::ffi::OsStr;
use std::path::{Component, Path};

/// Convert a path under `root` into the `/`-separated key used by listings.
///
/// Returns `None` for paths outside `root`. The root itself yields `""`.
/// The conversion is lossless: bytes that are not valid UTF-8 become `\xNN`
/// and a literal backslash is doubled, so distinct names never share a key.
pub fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let mut key = String::new();
    for name in normal_components(rel) {
        if !key.is_empty() {
            key.push('/');
        }
        push_escaped_name(&mut key, name);
    }
    Some(key)
}

/// Like [`relative_path`], but undecodable bytes become U+FFFD and nothing is
/// escaped. Exclude patterns are matched against this form.
pub fn lossy_relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = normal_components(rel).map(OsStr::to_string_lossy).collect();
    Some(parts.join("/"))
}

fn normal_components(rel: &Path) -> impl Iterator<Item = &OsStr> {
    rel.components().filter_map(|c| match c {
        Component::Normal(s) => Some(s),
        _ => None,
    })
}

fn push_escaped_name(out: &mut String, name: &OsStr) {
    for chunk in name.as_encoded_bytes().utf8_chunks() {
        for c in chunk.valid().chars() {
            if c == '\\' {
                out.push_str("\\\\");
            } else {
                out.push(c);
            }
        }
        for byte in chunk.invalid() {
            out.push_str(&format!("\\x{:02x}", byte));
        }
    }
}

/// Format a size in bytes to human-readable format.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1}G", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1}M", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1}K", bytes as f64 / KB as f64)
    } else {
        format!("{}B", bytes)
    }
}
