// zipkeep/src/main.rs
use std::process;

use clap::Parser;
use colored::Colorize;
use tracing::level_filters::LevelFilter;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;
use zipkeep_common::error::Result;
use zipkeep_common::format::humanize_bytes;
use zipkeep_core::{run_backup, RetentionOutcome, SystemIdentityResolver};

mod cli;
use cli::CliArgs;

fn main() {
    let cli_args = CliArgs::parse();

    let level_filter = match cli_args.verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .with_env_var("ZIPKEEP_LOG")
        .from_env_lossy();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .without_time()
        .try_init();

    if let Err(e) = run(cli_args) {
        error!("Run failed: {e}");
        eprintln!("{}: {}", "Error".red().bold(), e);
        process::exit(1);
    }
}

fn run(cli_args: CliArgs) -> Result<()> {
    let config = cli_args.into_config()?;

    println!(
        "{}Archiving {} to {}...",
        "==> ".bold().blue(),
        config.source().display(),
        config.destination().display()
    );

    let summary = run_backup(&config, &SystemIdentityResolver)?;

    let artifact = match &summary.artifact {
        Some(artifact) => artifact,
        None => {
            println!("The source folder is empty. No archive created.");
            return Ok(());
        }
    };
    println!(
        "{} Archived {} to {} ({})",
        "✓".green(),
        config.source().display(),
        artifact.path.display(),
        humanize_bytes(artifact.size)
    );

    for (name, outcome) in &summary.actions {
        match outcome {
            RetentionOutcome::Deleted => println!("Deleted {name}"),
            RetentionOutcome::WouldDelete => {
                println!("{} would delete {name}", "dry-run:".yellow())
            }
        }
    }

    debug!("Run completed successfully.");
    Ok(())
}
