//! CLI commands for the dataset: init, check, schema and config

use tracing::info;

use crate::config::{HospitalPaths, Settings};
use crate::error::{HospitalError, HospitalResult};
use crate::models::EntityKind;
use crate::storage::{
    check_integrity, json_file_valid, render_schema, sample_snapshot, JsonStore, Snapshot,
};

/// Create the directory layout, settings and (optionally) sample data
pub fn handle_init(
    paths: &HospitalPaths,
    settings: &Settings,
    sample: bool,
    force: bool,
) -> HospitalResult<()> {
    paths.ensure_directories()?;
    if force || !paths.settings_file().exists() {
        settings.save(paths)?;
    }

    let store = JsonStore::new(paths.clone());
    let has_dataset = paths.has_dataset();

    if has_dataset && !force {
        if sample {
            return Err(HospitalError::Validation(format!(
                "a dataset already exists in {}; use --force to overwrite it",
                paths.data_dir().display()
            )));
        }
        println!("Dataset already present at: {}", paths.data_dir().display());
        return Ok(());
    }

    let snapshot = if sample {
        sample_snapshot()?
    } else {
        Snapshot::default()
    };
    store.write_snapshot(&snapshot)?;
    info!(sample, force, "initialized dataset");

    println!("Initialized hospital-reports at: {}", paths.base_dir().display());
    if sample {
        println!();
        println!("Sample data written:");
        for entity in EntityKind::ALL {
            println!("  {:<14} {:>3} rows", entity.table_name(), snapshot.row_count(entity));
        }
        println!();
        println!("Run 'hospital report list' to see the available reports.");
    } else {
        println!("Empty tables created in {}", paths.data_dir().display());
    }
    Ok(())
}

/// Verify primary keys and foreign keys across all tables
pub fn handle_check(paths: &HospitalPaths) -> HospitalResult<()> {
    let store = JsonStore::new(paths.clone());
    let issues = check_integrity(&store)?;

    if issues.is_empty() {
        println!("OK: no integrity issues found.");
        return Ok(());
    }

    for issue in &issues {
        println!("  {}", issue);
    }
    Err(HospitalError::Validation(format!(
        "{} integrity issue(s) found",
        issues.len()
    )))
}

/// Print the normalized schema as SQL DDL
pub fn handle_schema() -> HospitalResult<()> {
    print!("{}", render_schema());
    Ok(())
}

/// Show paths and settings
pub fn handle_config(paths: &HospitalPaths, settings: &Settings) -> HospitalResult<()> {
    println!("hospital-reports Configuration");
    println!("==============================");
    println!("Base directory:    {}", paths.base_dir().display());
    println!("Data directory:    {}", paths.data_dir().display());
    println!("Exports directory: {}", paths.exports_dir().display());
    println!("Settings file:     {}", paths.settings_file().display());
    println!();
    println!("Tables:");
    for entity in EntityKind::ALL {
        let path = paths.table_file(entity);
        let state = if !path.exists() {
            "missing"
        } else if json_file_valid(&path) {
            "ok"
        } else {
            "invalid JSON"
        };
        println!("  {:<14} {}", entity.table_name(), state);
    }
    println!();
    println!("Settings:");
    println!("  Default format:  {}", settings.default_format);
    println!("  Currency symbol: {}", settings.currency_symbol);
    println!("  Date format:     {}", settings.date_format);
    println!("  Log level:       {}", settings.log_level);
    Ok(())
}
