//! Record sink trait and output errors

use crate::extract::PostRecord;
use thiserror::Error;

/// Errors that can occur while persisting records
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for extracted records
///
/// Records arrive one at a time in crawl order. Implementations must make
/// each record durable before returning so an aborted crawl keeps
/// everything written so far.
pub trait RecordSink {
    /// Appends one record
    fn write(&mut self, record: &PostRecord) -> OutputResult<()>;

    /// Number of records appended so far
    fn records_written(&self) -> u64;

    /// Flushes anything still buffered
    ///
    /// Called once when the crawl loop ends, whatever the outcome.
    fn finish(&mut self) -> OutputResult<()> {
        Ok(())
    }
}
