//! URL handling module for Thread-Scrape
//!
//! This module validates the start URL, extracts hosts, and resolves the
//! relative links found on forum pages against the forum's origin.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::{extract_domain, site_origin};
pub use normalize::{absolutize, normalize_start_url};
