use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    config::Config,
    geocode::ReverseGeocode,
    io::SalesSheet,
    model::{SalesRecord, StoreRecord},
    report::{DefectKind, ValidationReport},
    sheet::{self, Normalized},
};

mod coords;
mod crossref;
mod dates;

/// Runs the whole reconciliation pass: region filter, per-store
/// coordinate and date checks, sheet admission and normalization,
/// cross-reference checks, then the network-wide date checks.
///
/// The master is corrected in place; everything found along the way ends
/// up in the returned report, attributed by store id.
pub fn run<G: ReverseGeocode>(
    master: &mut Vec<StoreRecord>,
    sheets: &[SalesSheet],
    geocoder: &mut G,
    config: &Config,
) -> Result<(Vec<SalesRecord>, ValidationReport)> {
    let mut report = ValidationReport::new();

    master.retain(|store| config.valid_regions.contains(&store.region));

    let pb = ProgressBar::new(master.len() as u64).with_style(
        ProgressStyle::with_template("[{elapsed_precise}] {human_pos}/{human_len} {percent}%")
            .expect("hardcoded"),
    );
    for store in master.iter_mut() {
        coords::check(store, geocoder, &config.valid_counties, &mut report);
        dates::check_store(store, &mut report);
        pb.inc(1);
    }
    pb.finish_and_clear();

    let mut sales = Vec::new();
    for sheet in sheets {
        if !crossref::city_known(master, &sheet.city) {
            report.record(
                DefectKind::InvalidSheetCity,
                None,
                format!("incorrect city {:?}, sheet skipped", sheet.city),
            );
            continue;
        }

        let rows = match sheet::normalize(&sheet.block)
            .with_context(|| format!("failed to normalize sheet for {:?}", sheet.city))?
        {
            Normalized::Table(rows) => rows,
            Normalized::NoData => continue,
        };

        crossref::check_sheet(master, &sheet.city, &rows, &mut report);
        sales.extend(rows);
    }

    if sales.is_empty() {
        bail!("combined sales table is empty after sheet filtering");
    }

    dates::check_network(master, &sales, config.campaign_start, &mut report);

    Ok((sales, report))
}
