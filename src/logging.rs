//! Logging initialization.
//!
//! The terminal is in raw mode while the UI runs, so log output goes to a
//! file instead of stderr.

use std::fs::File;
use std::path::Path;

use log::LevelFilter;
use simplelog::{Config, ConfigBuilder, WriteLogger};

/// Install a file logger at `path`.
///
/// A file that cannot be created is reported on stderr and logging stays
/// off; the app itself keeps working.
pub fn initialize(path: &Path, level: LevelFilter) {
    let file = match File::create(path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("Warning: Could not create log file at {}: {err}", path.display());
            return;
        }
    };

    let _ = WriteLogger::init(level, build_config(), file);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        // reqwest/hyper are chatty at debug level.
        .add_filter_ignore_str("hyper")
        .add_filter_ignore_str("reqwest")
        .build()
}
