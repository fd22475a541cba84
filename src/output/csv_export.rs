//! CSV export of differences
//!
//! Header `status,path,size_in_A,size_in_B`, one row per ONLY_A, ONLY_B, or
//! DIFFER path. SAME paths are never exported. Quoting follows RFC 4180.

use std::io;
use std::path::Path;

use tracing::info;

use crate::compare::Classification;
use crate::error::OutputError;
use crate::tree::Entry;

pub const CSV_HEADER: [&str; 4] = ["status", "path", "size_in_A", "size_in_B"];

/// Write the CSV export to `path`, replacing any existing file.
pub fn write_csv(result: &Classification, path: &Path) -> Result<(), OutputError> {
    let to_output_error = |source| OutputError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let writer = csv::Writer::from_path(path).map_err(to_output_error)?;
    let rows = write_rows(result, writer).map_err(to_output_error)?;
    info!(path = %path.display(), rows, "wrote CSV export");
    Ok(())
}

/// Write the CSV export into any writer. Returns the number of data rows.
pub fn write_csv_to<W: io::Write>(result: &Classification, writer: W) -> Result<usize, csv::Error> {
    write_rows(result, csv::Writer::from_writer(writer))
}

fn write_rows<W: io::Write>(
    result: &Classification,
    mut writer: csv::Writer<W>,
) -> Result<usize, csv::Error> {
    writer.write_record(CSV_HEADER)?;
    let mut rows = 0;
    for diff in result.differences() {
        let size_a = size_field(diff.a);
        let size_b = size_field(diff.b);
        writer.write_record([diff.status.as_str(), diff.path, size_a.as_str(), size_b.as_str()])?;
        rows += 1;
    }
    writer.flush()?;
    Ok(rows)
}

/// Empty when the entry is absent or is a directory.
fn size_field(entry: Option<&Entry>) -> String {
    entry
        .filter(|e| !e.is_dir())
        .and_then(|e| e.size)
        .map(|s| s.to_string())
        .unwrap_or_default()
}
