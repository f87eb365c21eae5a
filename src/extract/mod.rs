//! Extraction engine
//!
//! Turns one parsed page into post records and a pointer to the next page:
//! - [`PostLocator`] finds the post containers
//! - [`FieldExtractor`] derives the eight fields of each post
//! - [`PaginationResolver`] finds the next page
//! - [`BlockDetector`] vetoes anti-bot and access-denied pages

mod block;
mod fields;
mod locator;
mod pagination;
mod record;

pub use block::BlockDetector;
pub use fields::FieldExtractor;
pub use locator::PostLocator;
pub use pagination::PaginationResolver;
pub use record::{PostRecord, GUEST_USERNAME, MISSING_POST_ID, UNKNOWN_TIMESTAMP};

use thiserror::Error;

/// A post container whose extraction failed outright
///
/// Always absorbed by the crawl loop: logged, counted, and skipped. Missing
/// fields are not faults; they come back as sentinels in a normal record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionFault {
    #[error("Extraction of post #{index} on the page panicked: {message}")]
    Panicked { index: usize, message: String },
}
