use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use decrypt_tables::cli::{handle_config_command, handle_path_command};
use decrypt_tables::config::{paths::AppPaths, settings::Settings};
use decrypt_tables::crypto::EnvSecretStore;

#[derive(Parser)]
#[command(
    name = "decrypt-tables",
    version,
    about = "Selectively decrypt encrypted columns in CSV files and database tables",
    long_about = "decrypt-tables finds the encrypted columns of a table by trying to \
                  decrypt every cell of its first data row, then decrypts those columns \
                  in every following row and copies the rest unchanged. CSV inputs are \
                  written next to the original with a _DECRYPTED suffix; database tables \
                  are written to the output files named in the configuration. Cells that \
                  fail to decrypt keep their value and are reported by row and column.\n\n\
                  The secret is read from DECRYPT_TABLES_SECRET_<PURPOSE> (PII by default)."
)]
struct Cli {
    /// CSV file or directory of CSV files to decrypt
    #[arg(short, long, value_name = "PATH")]
    path: Option<PathBuf>,

    /// Also process CSV files in subdirectories of --path
    #[arg(short, long)]
    subdirectories: bool,

    /// Database configuration file (takes precedence over --path)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of files or tables processed in parallel
    #[arg(short, long, value_name = "N")]
    jobs: Option<usize>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if cli.config.is_none() && cli.path.is_none() {
        println!("No valid command line options provided. Use --help for usage information.");
        return Ok(());
    }

    // Initialize paths and settings
    let paths = AppPaths::new()?;
    let settings = Settings::load_or_default(&paths)?;
    debug!(home = %paths.base_dir().display(), suffix = %settings.output_suffix, "settings loaded");
    let jobs = cli.jobs.unwrap_or(settings.jobs).max(1);

    if let Some(config) = cli.config {
        handle_config_command(&config, &settings, &EnvSecretStore, jobs)?;
    } else if let Some(path) = cli.path {
        handle_path_command(&path, cli.subdirectories, &settings, &EnvSecretStore, jobs)?;
    }

    Ok(())
}
