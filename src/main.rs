use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use hospital_reports::cli::{
    handle_check, handle_config, handle_init, handle_report_command, handle_schema, ReportCommands,
};
use hospital_reports::config::{HospitalPaths, Settings};

#[derive(Parser)]
#[command(
    name = "hospital",
    version,
    about = "Analytical reports over hospital operations data",
    long_about = "hospital-reports runs a fixed catalog of read-only aggregate reports \
                  (doctor workload, patient status distribution, department financial \
                  performance, high-value patients) over a normalized hospital dataset \
                  stored as JSON tables."
)]
struct Cli {
    /// Base directory holding config.json, data/ and exports/
    #[arg(long, global = true, env = "HOSPITAL_REPORTS_DIR", value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Report commands
    #[command(subcommand)]
    Report(ReportCommands),

    /// Create the data directory and settings
    Init {
        /// Write a small demonstration dataset
        #[arg(long)]
        sample: bool,

        /// Overwrite existing settings and data
        #[arg(long)]
        force: bool,
    },

    /// Check primary and foreign keys across all tables
    Check,

    /// Print the schema as SQL DDL
    Schema,

    /// Show current configuration and paths
    Config,
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = match cli.data_dir {
        Some(dir) => HospitalPaths::with_base_dir(dir),
        None => HospitalPaths::new()?,
    };
    let mut unreadable = None;
    let settings = match Settings::load_or_default(&paths) {
        Ok(settings) => settings,
        // init --force rewrites config.json and must run past a broken one
        Err(err) if matches!(cli.command, Some(Commands::Init { force: true, .. })) => {
            unreadable = Some(err);
            Settings::default()
        }
        Err(err) => return Err(err.into()),
    };
    init_tracing(&settings.log_level);
    if let Some(err) = unreadable {
        warn!(error = %err, "replacing unreadable settings with defaults");
    }
    debug!(base = %paths.base_dir().display(), "resolved paths");

    match cli.command {
        Some(Commands::Report(cmd)) => handle_report_command(&paths, &settings, cmd)?,
        Some(Commands::Init { sample, force }) => handle_init(&paths, &settings, sample, force)?,
        Some(Commands::Check) => handle_check(&paths)?,
        Some(Commands::Schema) => handle_schema()?,
        Some(Commands::Config) => handle_config(&paths, &settings)?,
        None => {
            println!("hospital-reports - analytical reports over hospital operations data");
            println!();
            println!("Run 'hospital --help' for usage information.");
            println!("Run 'hospital init --sample' to create a demonstration dataset.");
        }
    }

    Ok(())
}
