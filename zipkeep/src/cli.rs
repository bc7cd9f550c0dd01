// zipkeep/src/cli.rs
//! Defines the command-line argument structure using clap.
//!
//! Every flag can also be supplied through its environment variable; the
//! flag wins when both are given. The configuration is built once here and
//! passed down, so no other component reads the environment.
use std::path::PathBuf;

use clap::{ArgAction, Parser};
use zipkeep_common::config::{Config, RetentionMode, RetentionPolicy, DEFAULT_TIMESTAMP_FORMAT};
use zipkeep_common::error::Result;

#[derive(Parser, Debug)]
#[command(author, version, about = "Zip a folder into a timestamped archive and prune old ones", name = "zipkeep", bin_name = "zipkeep")]
pub struct CliArgs {
    /// The folder to archive
    #[arg(long, env = "INPUT_FOLDER", value_name = "DIR")]
    pub source: PathBuf,

    /// The folder receiving the archive and holding prior artifacts
    #[arg(long, env = "OUTPUT_FOLDER", value_name = "DIR")]
    pub destination: PathBuf,

    /// Owner of the archive: a user name or numeric uid
    #[arg(long, env = "OUTPUT_USER", default_value = "root")]
    pub user: String,

    /// Owning group of the archive: a group name or numeric gid
    #[arg(long, env = "OUTPUT_GROUP", default_value = "root")]
    pub group: String,

    /// Delete artifacts older than this many days. 0 is meaningful: it
    /// deletes everything older than "now". Omit to disable the rule.
    #[arg(long, env = "KEEP_N_DAYS", value_name = "DAYS")]
    pub keep_n_days: Option<u64>,

    /// Keep only the newest N artifacts. 0 keeps none. Omit to disable the
    /// rule.
    #[arg(long, env = "KEEP_N_FILES", value_name = "N")]
    pub keep_n_files: Option<usize>,

    /// How the two retention rules interact when both are set: 'override'
    /// (the age rule wins, historical behavior) or 'combine' (union of both
    /// delete sets)
    #[arg(long, env = "RETENTION_MODE", default_value = "override", value_name = "MODE")]
    pub retention_mode: String,

    /// strftime pattern embedded in the artifact name
    #[arg(long, env = "TIMESTAMP_FORMAT", default_value = DEFAULT_TIMESTAMP_FORMAT)]
    pub timestamp_format: String,

    /// Report what retention would delete without deleting anything
    #[arg(long, env = "DRY_RUN")]
    pub dry_run: bool,

    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl CliArgs {
    pub fn into_config(self) -> Result<Config> {
        let mode: RetentionMode = self.retention_mode.parse()?;
        Ok(Config {
            source: self.source,
            destination: self.destination,
            owner: self.user,
            group: self.group,
            policy: RetentionPolicy {
                keep_files: self.keep_n_files,
                keep_days: self.keep_n_days,
                mode,
            },
            dry_run: self.dry_run,
            timestamp_format: self.timestamp_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_invocation_disables_retention() {
        let args =
            CliArgs::try_parse_from(["zipkeep", "--source", "/in", "--destination", "/out"])
                .unwrap();
        let config = args.into_config().unwrap();
        assert!(config.policy.is_disabled());
        assert_eq!(config.owner, "root");
        assert_eq!(config.group, "root");
        assert!(!config.dry_run);
        assert_eq!(config.timestamp_format, DEFAULT_TIMESTAMP_FORMAT);
    }

    #[test]
    fn zero_is_an_explicit_retention_value() {
        let args = CliArgs::try_parse_from([
            "zipkeep",
            "--source",
            "/in",
            "--destination",
            "/out",
            "--keep-n-files",
            "0",
        ])
        .unwrap();
        let config = args.into_config().unwrap();
        assert_eq!(config.policy.keep_files, Some(0));
        assert!(!config.policy.is_disabled());
    }

    #[test]
    fn unknown_retention_mode_is_rejected() {
        let args = CliArgs::try_parse_from([
            "zipkeep",
            "--source",
            "/in",
            "--destination",
            "/out",
            "--retention-mode",
            "intersect",
        ])
        .unwrap();
        assert!(args.into_config().is_err());
    }
}
