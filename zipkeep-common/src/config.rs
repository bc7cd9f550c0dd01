// zipkeep-common/src/config.rs
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Result, ZipkeepError};

pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// How the two retention rules interact when both are configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetentionMode {
    /// The age rule's delete set replaces the count rule's set entirely.
    /// This reproduces the historical behavior and is the default.
    #[default]
    Override,
    /// Union of both delete sets: an artifact survives only if it is among
    /// the newest N *and* younger than the age cutoff.
    Combine,
}

impl FromStr for RetentionMode {
    type Err = ZipkeepError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "override" => Ok(RetentionMode::Override),
            "combine" => Ok(RetentionMode::Combine),
            other => Err(ZipkeepError::Config(format!(
                "Unknown retention mode '{other}' (expected 'override' or 'combine')"
            ))),
        }
    }
}

/// Retention rules over the destination directory. `None` disables a rule;
/// `Some(0)` is a real value: keep zero files, or delete everything older
/// than "now".
#[derive(Debug, Clone, Copy, Default)]
pub struct RetentionPolicy {
    pub keep_files: Option<usize>,
    pub keep_days: Option<u64>,
    pub mode: RetentionMode,
}

impl RetentionPolicy {
    pub fn is_disabled(&self) -> bool {
        self.keep_files.is_none() && self.keep_days.is_none()
    }
}

/// Runtime configuration, constructed once at startup from the CLI surface
/// and passed down. Components never read the environment themselves.
#[derive(Debug, Clone)]
pub struct Config {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub owner: String,
    pub group: String,
    pub policy: RetentionPolicy,
    pub dry_run: bool,
    pub timestamp_format: String,
}

impl Config {
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }
}
