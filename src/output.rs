//! Result rows and diagnostic reports

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::analysis::{AnalysisRow, Diagnostics};

/// Fixed header of the result table
pub const HEADER: &str = "web_id,sent_id,graph_id,text,pro_position,cleaned_path";

/// Format a row; failed fields stay empty
pub fn format_row(row: &AnalysisRow) -> String {
    let position = row
        .dependency
        .position
        .map(|p| p.label())
        .unwrap_or_default();
    format!(
        "{},{},{},{},{},{}",
        row.ids.web_id,
        row.ids.sent_id,
        row.ids.graph_id,
        row.text,
        position,
        row.dependency.path.join(" ")
    )
}

/// Writes the header and one line per row
pub struct ResultWriter<W: Write> {
    out: W,
}

impl<W: Write> ResultWriter<W> {
    pub fn new(mut out: W) -> io::Result<Self> {
        writeln!(out, "{HEADER}")?;
        Ok(Self { out })
    }

    pub fn write_row(&mut self, row: &AnalysisRow) -> io::Result<()> {
        writeln!(self.out, "{}", format_row(row))
    }

    pub fn finish(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

/// Write `worked_ids.txt` and `failing_labels.txt` into `dir`
pub fn write_report(dir: &Path, diagnostics: &Diagnostics) -> io::Result<()> {
    fs::create_dir_all(dir)?;
    write_lines(&dir.join("worked_ids.txt"), &diagnostics.analyzed_ids)?;
    write_lines(&dir.join("failing_labels.txt"), &diagnostics.failing_labels)
}

fn write_lines(path: &Path, lines: &[String]) -> io::Result<()> {
    let mut out = io::BufWriter::new(fs::File::create(path)?);
    for line in lines {
        writeln!(out, "{line}")?;
    }
    out.flush()
}
