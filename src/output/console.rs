//! Console formatter for classification results
//!
//! Renders titled sections (only in A, only in B, differ, and optionally
//! same), each with a member count and its paths in lexical order, followed
//! by a one-line summary.

use std::io::{self, Write};

use termcolor::{Buffer, Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::compare::Classification;
use crate::tree::Entry;

use super::config::OutputConfig;

const EMPTY_MARKER: &str = "(empty)";
const INDENT: &str = "  ";

/// Formatter for the human-readable report.
pub struct ConsoleFormatter {
    config: OutputConfig,
}

impl ConsoleFormatter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Render the report into a plain string (no color codes).
    pub fn format(&self, result: &Classification) -> io::Result<String> {
        let mut buffer = Buffer::no_color();
        self.write(&mut buffer, result)?;
        Ok(String::from_utf8_lossy(buffer.as_slice()).into_owned())
    }

    /// Print the report to stdout, colored if configured.
    pub fn print(&self, result: &Classification) -> io::Result<()> {
        let choice = if self.config.use_color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        let mut stdout = StandardStream::stdout(choice);
        self.write(&mut stdout, result)?;
        stdout.flush()
    }

    pub fn write<W: WriteColor>(&self, out: &mut W, result: &Classification) -> io::Result<()> {
        if let Some((a, b)) = &self.config.roots {
            writeln!(out, "A: {}", a)?;
            writeln!(out, "B: {}", b)?;
            writeln!(out)?;
        }

        write_section(
            out,
            "Only in A",
            Color::Red,
            result.only_a.iter().map(|(path, entry)| (display_path(path, entry), None)),
        )?;
        writeln!(out)?;
        write_section(
            out,
            "Only in B",
            Color::Green,
            result.only_b.iter().map(|(path, entry)| (display_path(path, entry), None)),
        )?;
        writeln!(out)?;
        write_section(
            out,
            "Differ",
            Color::Yellow,
            result
                .differ
                .iter()
                .map(|(path, m)| (display_path(path, &m.a), Some(m.to_string()))),
        )?;
        writeln!(out)?;

        if self.config.show_same {
            write_section(
                out,
                "Same",
                Color::Cyan,
                result.same.iter().map(|(path, entry)| (display_path(path, entry), None)),
            )?;
            writeln!(out)?;
        }

        self.write_summary(out, result)
    }

    fn write_summary<W: WriteColor>(&self, out: &mut W, result: &Classification) -> io::Result<()> {
        let counts = result.counts();
        out.set_color(ColorSpec::new().set_bold(true))?;
        write!(out, "Summary:")?;
        out.reset()?;
        writeln!(
            out,
            " {} only in A, {} only in B, {} differ, {} same, {} skipped",
            counts.only_a, counts.only_b, counts.differ, counts.same, counts.skipped
        )?;
        if result.is_equivalent() {
            writeln!(out, "Trees are equivalent.")?;
        }
        Ok(())
    }
}

/// Write one titled section. Each item is a display path plus an optional note.
fn write_section<W, I>(out: &mut W, title: &str, color: Color, items: I) -> io::Result<()>
where
    W: WriteColor,
    I: ExactSizeIterator<Item = (String, Option<String>)>,
{
    out.set_color(ColorSpec::new().set_bold(true))?;
    write!(out, "{}", title)?;
    out.reset()?;
    writeln!(out, " ({})", items.len())?;

    if items.len() == 0 {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Black)).set_intense(true))?;
        write!(out, "{}{}", INDENT, EMPTY_MARKER)?;
        out.reset()?;
        writeln!(out)?;
        return Ok(());
    }

    for (path, note) in items {
        write!(out, "{}", INDENT)?;
        out.set_color(ColorSpec::new().set_fg(Some(color)))?;
        write!(out, "{}", path)?;
        out.reset()?;
        if let Some(note) = note {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Black)).set_intense(true))?;
            write!(out, "  ({})", note)?;
            out.reset()?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Directories get a trailing slash so they stand out from files.
fn display_path(path: &str, entry: &Entry) -> String {
    if entry.is_dir() {
        format!("{}/", path)
    } else {
        path.to_string()
    }
}
