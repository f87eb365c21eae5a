//! Delimited-text output
//!
//! Files start with a UTF-8 byte-order mark so spreadsheet tools pick the
//! right encoding for Swedish diacritics without an import dialog.

use crate::extract::PostRecord;
use crate::output::traits::{OutputError, OutputResult, RecordSink};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Header row, in output column order
pub const COLUMNS: [&str; 8] = [
    "Username",
    "RegistrationDate",
    "PostCount",
    "Timestamp",
    "PostId",
    "Permalink",
    "AvatarUrl",
    "Content",
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Streams records to a delimited file, one flushed row per post
pub struct CsvSink<W: Write = File> {
    writer: csv::Writer<W>,
    path: Option<PathBuf>,
    written: u64,
}

impl CsvSink<File> {
    /// Creates (or truncates) `path` and writes the BOM and header row
    pub fn create(path: &Path, delimiter: u8) -> OutputResult<Self> {
        let file = File::create(path)?;
        let mut sink = Self::from_writer(file, delimiter)?;
        sink.path = Some(path.to_path_buf());
        tracing::debug!("Opened output file {}", path.display());
        Ok(sink)
    }
}

impl<W: Write> CsvSink<W> {
    /// Wraps an arbitrary writer, writing the BOM and header row immediately
    pub fn from_writer(mut inner: W, delimiter: u8) -> OutputResult<Self> {
        inner.write_all(UTF8_BOM)?;

        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .terminator(csv::Terminator::CRLF)
            .from_writer(inner);
        writer.write_record(COLUMNS)?;
        writer.flush()?;

        Ok(Self {
            writer,
            path: None,
            written: 0,
        })
    }

    /// The file being written, when the sink was opened on a path
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Flushes and returns the underlying writer
    pub fn into_inner(self) -> OutputResult<W> {
        self.writer
            .into_inner()
            .map_err(|e| OutputError::Io(e.into_error()))
    }
}

impl<W: Write> RecordSink for CsvSink<W> {
    fn write(&mut self, record: &PostRecord) -> OutputResult<()> {
        self.writer.write_record(record.to_row())?;
        self.writer.flush()?;
        self.written += 1;
        Ok(())
    }

    fn records_written(&self) -> u64 {
        self.written
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}
