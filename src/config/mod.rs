//! Configuration module for link-audit
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! A configuration file is optional: `Config::default()` gives a sequential
//! crawl of up to 100 pages with a 500ms politeness delay.
//!
//! # Example
//!
//! ```no_run
//! use link_audit::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("link-audit.toml")).unwrap();
//! println!("Page budget: {}", config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, parse_config, read_config_with_hash};
pub use validation::validate;
