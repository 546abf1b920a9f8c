//! Log level names accepted on the command line.

use crate::error::{Error, Result};
use log::LevelFilter;

// CRITICAL/FATAL have no stronger counterpart than Error in `log`.
const LEVEL_NAMES: &[(&str, LevelFilter)] = &[
    ("CRITICAL", LevelFilter::Error),
    ("FATAL", LevelFilter::Error),
    ("ERROR", LevelFilter::Error),
    ("WARNING", LevelFilter::Warn),
    ("WARN", LevelFilter::Warn),
    ("INFO", LevelFilter::Info),
    ("DEBUG", LevelFilter::Debug),
    ("NOTSET", LevelFilter::Trace),
    ("TRACE", LevelFilter::Trace),
    ("OFF", LevelFilter::Off),
];

/// Level used when `-D` is not given.
pub const DEFAULT_LEVEL_NAME: &str = "INFO";
/// Level used when `-D` is given without a name.
pub const BARE_FLAG_LEVEL_NAME: &str = "DEBUG";

/// Looks up a level name (case-insensitive).
pub fn level_filter(name: &str) -> Result<LevelFilter> {
    LEVEL_NAMES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(name.trim()))
        .map(|&(_, level)| level)
        .ok_or_else(|| Error::UnknownLogLevel(name.to_string()))
}
