//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlPhase`: The phases of the fetch, check, locate, extract, advance loop
//! - `CrawlState`: Per-crawl counters, visited pages and the current phase
//! - `Termination`: Why the loop stopped

mod crawl_state;
mod phase;

// Re-export main types
pub use crawl_state::{CrawlState, Termination};
pub use phase::CrawlPhase;
