use std::process::ExitCode;

use clap::Parser;
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use caldb_sync::app::{App, SyncOptions};
use caldb_sync::archive::SystemTarArchiver;
use caldb_sync::catalog::HttpCatalogClient;
use caldb_sync::config::{CALDB_ENV, Config};
use caldb_sync::indexer::CaldbinfoIndexer;
use caldb_sync::output::{JsonOutput, OutputMode, render_sync_summary};

#[derive(Parser)]
#[command(name = "caldb-sync")]
#[command(about = "Synchronize a local CALDB tree with the HEASARC calibration archive catalog")]
#[command(version, author)]
struct Cli {
    /// CALDB root directory (defaults to the CALDB environment variable)
    #[arg(long)]
    caldb: Option<String>,

    /// Override the supported-missions index page URL
    #[arg(long)]
    catalog_url: Option<String>,

    /// Report what would be downloaded without touching the network or
    /// invoking external tools
    #[arg(long)]
    dry_run: bool,

    /// Print the sync result as JSON instead of a human summary
    #[arg(long)]
    non_interactive: bool,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_mode = if cli.non_interactive {
        OutputMode::NonInteractive
    } else {
        OutputMode::Interactive
    };

    // Deliberate early exit, not an error: with no destination there is
    // nothing to sync.
    let Some(config) = Config::resolve(cli.caldb.as_deref(), cli.catalog_url.as_deref()) else {
        eprintln!("{CALDB_ENV} environment variable not set, exiting");
        return Ok(());
    };

    let catalog = HttpCatalogClient::new().into_diagnostic()?;
    let archiver = SystemTarArchiver::new();
    let indexer = CaldbinfoIndexer::new();
    let app = App::new(config, catalog, archiver, indexer);

    let result = app
        .sync(SyncOptions {
            dry_run: cli.dry_run,
        })
        .into_diagnostic()?;

    match output_mode {
        OutputMode::NonInteractive => JsonOutput::print_sync(&result).into_diagnostic()?,
        OutputMode::Interactive => print!("{}", render_sync_summary(&result)),
    }
    Ok(())
}
