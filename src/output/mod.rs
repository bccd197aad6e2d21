//! Output module for harvest results
//!
//! This module handles:
//! - Writing results as pretty-printed JSON to stdout or a file
//! - Summarising a harvest into statistics

pub mod stats;

pub use stats::{log_statistics, HarvestStatistics};

use crate::HarvestError;
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Writes `value` as pretty JSON followed by a newline
pub fn write_json<T: Serialize, W: Write>(value: &T, mut writer: W) -> Result<(), HarvestError> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Writes `value` to `path`, or to stdout when no path is given
///
/// # Arguments
///
/// * `value` - Any serializable result
/// * `path` - Destination file, created or truncated
pub fn emit_json<T: Serialize>(value: &T, path: Option<&Path>) -> Result<(), HarvestError> {
    match path {
        Some(path) => write_json(value, File::create(path)?),
        None => write_json(value, io::stdout().lock()),
    }
}
