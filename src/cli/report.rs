//! CLI commands for reports
//!
//! Lists, describes and runs the canonical reports against the JSON store.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::Subcommand;
use tracing::info;

use crate::config::{HospitalPaths, Settings};
use crate::display::{
    format_report_details, format_report_list, format_report_table, DisplayOptions,
};
use crate::error::{HospitalError, HospitalResult};
use crate::export::{export_report, OutputFormat};
use crate::reports::{ReportCatalog, ReportParameters, ReportTable};
use crate::storage::JsonStore;

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// List the available reports
    #[command(alias = "ls")]
    List,

    /// Show a report's parameters and output columns
    Describe {
        /// Report name (e.g. doctor-workload)
        name: String,
    },

    /// Run a report
    Run {
        /// Report name (e.g. department-financials)
        name: String,

        /// Report parameter as name=value (repeatable), e.g. --param from=2024-01-01
        #[arg(short, long = "param", value_name = "NAME=VALUE")]
        params: Vec<String>,

        /// Output format (defaults to the configured format)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Write output to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Handle report commands
pub fn handle_report_command(
    paths: &HospitalPaths,
    settings: &Settings,
    cmd: ReportCommands,
) -> HospitalResult<()> {
    let catalog = ReportCatalog::new(JsonStore::new(paths.clone()));

    match cmd {
        ReportCommands::List => {
            print!("{}", format_report_list(catalog.definitions()));
            Ok(())
        }
        ReportCommands::Describe { name } => {
            let definition = catalog.definition(&name)?;
            print!("{}", format_report_details(definition));
            Ok(())
        }
        ReportCommands::Run {
            name,
            params,
            format,
            output,
        } => {
            let params = ReportParameters::parse_pairs(&params)?;
            let table = catalog.run_report(&name, &params)?;
            let format = format.unwrap_or(settings.default_format);
            let rendered = render(&table, format, settings)?;

            match output {
                Some(path) => {
                    write_file(&path, &rendered)?;
                    info!(path = %path.display(), rows = table.len(), "report written");
                    println!("Wrote {} row(s) to {}", table.len(), path.display());
                }
                None => {
                    let stdout = std::io::stdout();
                    let mut handle = stdout.lock();
                    handle.write_all(&rendered)?;
                    handle.flush()?;
                }
            }
            Ok(())
        }
    }
}

/// Render a result in the requested format
fn render(
    table: &ReportTable,
    format: OutputFormat,
    settings: &Settings,
) -> HospitalResult<Vec<u8>> {
    match format {
        OutputFormat::Table => {
            let definition = crate::reports::definitions::find(table.report)
                .ok_or_else(|| HospitalError::Export(format!("unknown report {}", table.report)))?;
            let options = DisplayOptions::new(settings, definition);
            Ok(format_report_table(table, definition.title, &options).into_bytes())
        }
        other => {
            let mut buffer = Vec::new();
            export_report(table, other, &mut buffer)?;
            Ok(buffer)
        }
    }
}

fn write_file(path: &Path, contents: &[u8]) -> HospitalResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            HospitalError::Io(format!("Failed to create {}: {}", parent.display(), e))
        })?;
    }
    let file = File::create(path)
        .map_err(|e| HospitalError::Io(format!("Failed to create {}: {}", path.display(), e)))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(contents)?;
    writer.flush()?;
    Ok(())
}
