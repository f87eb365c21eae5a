//! Configuration module for Thread-Scrape
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! All sections are optional, so a missing file simply means `Config::default()`.
//!
//! # Example
//!
//! ```no_run
//! use thread_scrape::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scrape.toml")).unwrap();
//! println!("Politeness delay: {}ms", config.crawler.politeness_delay_ms);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, RequestConfig, SiteConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
