//! Configuration module for the site loader
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use mkdocs_site_loader::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("loader.toml")).unwrap();
//! println!("Crawling {}", config.site.url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, HttpConfig, OutputConfig, SiteConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
