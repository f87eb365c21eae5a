//! Output module for persisting extracted posts
//!
//! This module handles:
//! - The `RecordSink` seam the crawl loop writes through
//! - Streaming delimited output with a byte-order mark
//! - Naming the output file after the thread

mod csv_sink;
mod naming;
mod traits;

pub use csv_sink::{CsvSink, COLUMNS};
pub use naming::{derive_output_filename, resolve_output_path};
pub use traits::{OutputError, OutputResult, RecordSink};
