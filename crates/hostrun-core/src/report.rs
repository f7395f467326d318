//! Report rendering and the output sink

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::CoreError;
use crate::outcome::OutcomeRecord;

const DELIMITER: &str = "____________________________";

/// Ordered text blocks, one per command that was sent to its host
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    blocks: Vec<String>,
}

impl Report {
    /// Render records in the order given
    ///
    /// Records that never started contribute no block; they only show up in
    /// the diagnostic log.
    #[must_use]
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a OutcomeRecord>) -> Self {
        Self {
            blocks: records
                .into_iter()
                .filter(|record| record.started)
                .map(format_block)
                .collect(),
        }
    }

    /// Rendered blocks
    #[must_use]
    pub fn blocks(&self) -> &[String] {
        &self.blocks
    }

    /// Number of blocks
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether there are no blocks
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Write every block to `out`
    ///
    /// # Errors
    /// Returns any I/O error from `out`
    pub fn write_to<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        for block in &self.blocks {
            out.write_all(block.as_bytes())?;
        }
        Ok(())
    }
}

/// Render one record
///
/// Stderr never goes into the report; it only feeds the diagnostic log.
#[must_use]
pub fn format_block(record: &OutcomeRecord) -> String {
    let heading = if record.succeeded {
        "THE RESULT:"
    } else {
        "THE RESULT (FAILED):"
    };
    format!(
        "{DELIMITER}\nInput command for host {}: {}\n{DELIMITER}\n{heading}\n{}\n\n",
        record.host, record.command, record.stdout
    )
}

/// Append-mode report file, opened once per run
#[derive(Debug)]
pub struct ReportSink {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl ReportSink {
    /// Open (or create) `path` for appending
    ///
    /// # Errors
    /// Returns `CoreError::SinkError` if the file cannot be opened
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        debug!(path = %path.display(), "opened report sink");
        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    /// Path of the report file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the whole report through this handle
    ///
    /// # Errors
    /// Returns `CoreError::SinkError` if writing fails
    pub fn write_report(&mut self, report: &Report) -> Result<(), CoreError> {
        report.write_to(&mut self.writer)?;
        Ok(())
    }

    /// Flush and close the file
    ///
    /// # Errors
    /// Returns `CoreError::SinkError` if the final flush fails
    pub fn finish(mut self) -> Result<PathBuf, CoreError> {
        self.writer.flush()?;
        Ok(self.path)
    }
}
