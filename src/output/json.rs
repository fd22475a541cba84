//! JSON output formatting

use std::collections::BTreeMap;
use std::io::{self, Write};

use serde::Serialize;

use crate::compare::{Classification, Counts, Equality, Mismatch};
use crate::error::OutputError;
use crate::tree::{Entry, Skipped};

use super::config::OutputConfig;

/// Serialized shape of a comparison.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_a: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_b: Option<&'a str>,
    pub mode: Equality,
    pub equivalent: bool,
    pub counts: Counts,
    pub only_a: &'a BTreeMap<String, Entry>,
    pub only_b: &'a BTreeMap<String, Entry>,
    pub differ: &'a BTreeMap<String, Mismatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub same: Option<&'a BTreeMap<String, Entry>>,
    #[serde(skip_serializing_if = "no_skipped")]
    pub skipped_a: &'a [Skipped],
    #[serde(skip_serializing_if = "no_skipped")]
    pub skipped_b: &'a [Skipped],
}

impl<'a> JsonReport<'a> {
    pub fn new(result: &'a Classification, config: &'a OutputConfig) -> Self {
        let (root_a, root_b) = match &config.roots {
            Some((a, b)) => (Some(a.as_str()), Some(b.as_str())),
            None => (None, None),
        };
        Self {
            root_a,
            root_b,
            mode: result.mode,
            equivalent: result.is_equivalent(),
            counts: result.counts(),
            only_a: &result.only_a,
            only_b: &result.only_b,
            differ: &result.differ,
            same: config.show_same.then_some(&result.same),
            skipped_a: &result.skipped_a,
            skipped_b: &result.skipped_b,
        }
    }
}

fn no_skipped(skipped: &&[Skipped]) -> bool {
    skipped.is_empty()
}

/// Render the report as pretty-printed JSON.
pub fn to_json(result: &Classification, config: &OutputConfig) -> Result<String, OutputError> {
    Ok(serde_json::to_string_pretty(&JsonReport::new(result, config))?)
}

/// Print the report as pretty-printed JSON to stdout.
pub fn print_json(result: &Classification, config: &OutputConfig) -> Result<(), OutputError> {
    let json = to_json(result, config)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", json)?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::classify;
    use crate::tree::TreeListing;

    #[test]
    fn test_json_shape() {
        let a: TreeListing = [("f", Entry::file(5)), ("d", Entry::directory())]
            .into_iter()
            .collect();
        let b: TreeListing = [("f", Entry::file(9))].into_iter().collect();
        let result = classify(a, b, Equality::Metadata);
        let config = OutputConfig::default().with_roots("left", "right");

        let json: serde_json::Value = serde_json::from_str(&to_json(&result, &config).unwrap()).unwrap();
        assert_eq!(json["root_a"], "left");
        assert_eq!(json["mode"], "metadata");
        assert_eq!(json["equivalent"], false);
        assert_eq!(json["counts"]["differ"], 1);
        assert_eq!(json["only_a"]["d"]["kind"], "directory");
        assert_eq!(json["differ"]["f"]["reason"], "size");
        assert_eq!(json["differ"]["f"]["a"]["size"], 5);
        assert_eq!(json["differ"]["f"]["b"]["size"], 9);
        assert!(json.get("same").is_none());
        assert!(json.get("skipped_a").is_none());
    }

    #[test]
    fn test_json_same_when_requested() {
        let a: TreeListing = [("f", Entry::file(5))].into_iter().collect();
        let result = classify(a.clone(), a, Equality::Metadata);
        let config = OutputConfig {
            show_same: true,
            ..Default::default()
        };
        let json: serde_json::Value = serde_json::from_str(&to_json(&result, &config).unwrap()).unwrap();
        assert_eq!(json["equivalent"], true);
        assert_eq!(json["same"]["f"]["kind"], "file");
    }
}
