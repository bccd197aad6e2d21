//! Configuration module for Dataset-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key is optional; a missing file section falls back to the defaults.
//!
//! # Example
//!
//! ```no_run
//! use dataset_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Harvesting from: {}", config.harvest.root_catalog_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, HarvestConfig, RetryConfig, UserAgentConfig, DEFAULT_ROOT_CATALOG_URL};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
