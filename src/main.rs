use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

mod config;
mod engine;
mod geocode;
mod io;
mod model;
mod report;
mod sheet;

use config::Config;
use geocode::Nominatim;

#[derive(Debug, Parser)]
struct Cli {
    /// YAML run configuration; built-in defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let mut master = io::read_store_master(&config.store_master)?;
    let sheets = io::read_sales_sheets(&config.workbook, &config.sheet_prefix)?;
    eprintln!(
        "Validating {} stores across {} sales sheets...",
        master.len(),
        sheets.len()
    );

    let mut geocoder = Nominatim::new(&config.language);
    let (sales, report) = engine::run(&mut master, &sheets, &mut geocoder, &config)?;

    io::write_store_master(&config.corrected_master, &master)?;
    io::write_combined_sales(&config.combined_sales, &sales)?;
    io::write_changelog(&config.changelog, &report)?;
    io::write_modification_log(&config.modification_log, &report)?;

    eprintln!(
        "{} stores kept, {} sales rows combined, {} findings recorded",
        master.len(),
        sales.len(),
        report.defects.len()
    );
    Ok(())
}
