use std::{
    fmt::Write as _,
    fs::{self, create_dir_all},
    path::Path,
};

use anyhow::{bail, Context, Result};
use calamine::{open_workbook, Data, Range, Reader, Xlsx};

use crate::{
    model::{SalesRecord, StoreRecord},
    report::ValidationReport,
    sheet::{SheetBlock, PLACEHOLDER},
};

/// One workbook sheet admitted by the naming convention, with the city
/// parsed out of its title.
pub struct SalesSheet {
    pub city: String,
    pub block: SheetBlock,
}

pub fn read_store_master(path: &Path) -> Result<Vec<StoreRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open store master {}", path.display()))?;

    let mut stores = Vec::new();
    for record in reader.deserialize() {
        let record: StoreRecord =
            record.with_context(|| format!("bad store record in {}", path.display()))?;
        stores.push(record);
    }
    Ok(stores)
}

pub fn write_store_master(path: &Path, stores: &[StoreRecord]) -> Result<()> {
    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    for store in stores {
        writer.serialize(store)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_combined_sales(path: &Path, sales: &[SalesRecord]) -> Result<()> {
    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    for record in sales {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_sales_sheets(path: &Path, prefix: &str) -> Result<Vec<SalesSheet>> {
    let mut workbook: Xlsx<_> = open_workbook(path)
        .with_context(|| format!("failed to open workbook {}", path.display()))?;

    let mut sheets = Vec::new();
    for name in workbook.sheet_names().to_vec() {
        let Some(city) = name.strip_prefix(prefix) else {
            continue;
        };
        let range = workbook
            .worksheet_range(&name)
            .with_context(|| format!("failed to read sheet {name:?}"))?;
        sheets.push(SalesSheet {
            city: city.trim().to_string(),
            block: block_from_range(&range),
        });
    }

    if sheets.is_empty() {
        bail!(
            "no sheet in {} starts with {prefix:?}",
            path.display()
        );
    }
    Ok(sheets)
}

fn block_from_range(range: &Range<Data>) -> SheetBlock {
    let (height, width) = range.get_size();
    let mut rows = Vec::with_capacity(height);
    for r in 0..height {
        let mut row = Vec::with_capacity(width);
        for c in 0..width {
            let text = range.get((r, c)).map(cell_to_string).unwrap_or_default();
            let text = text.trim();
            row.push((!text.is_empty()).then(|| text.to_string()));
        }
        rows.push(row);
    }
    block_from_cells(rows)
}

// A column with no data at all gets a placeholder label, everything else
// its position. The normalizer keys column trimming off these labels.
fn block_from_cells(rows: Vec<Vec<Option<String>>>) -> SheetBlock {
    let width = rows.iter().map(|x| x.len()).max().unwrap_or(0);
    let labels = (0..width)
        .map(|c| {
            if rows.iter().all(|row| row.get(c).map_or(true, |x| x.is_none())) {
                format!("{PLACEHOLDER}: {c}")
            } else {
                c.to_string()
            }
        })
        .collect();

    SheetBlock { labels, rows }
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(x) => x.clone(),
        Data::Int(x) => x.to_string(),
        Data::Float(x) if x.fract() == 0.0 => format!("{x:.0}"),
        Data::Float(x) => x.to_string(),
        Data::Bool(x) => x.to_string(),
        Data::Error(x) => format!("{x:?}"),
        Data::DateTime(x) => x
            .as_datetime()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        Data::DateTimeIso(x) => x.split('T').next().unwrap_or(x.as_str()).to_string(),
        Data::DurationIso(x) => x.clone(),
    }
}

pub fn write_changelog(path: &Path, report: &ValidationReport) -> Result<()> {
    ensure_parent(path)?;
    let mut output = String::new();
    for defect in &report.defects {
        writeln!(output, "{defect}")?;
    }
    output.push_str(&report.summary());
    fs::write(path, output).with_context(|| format!("failed to write {}", path.display()))
}

pub fn write_modification_log(path: &Path, report: &ValidationReport) -> Result<()> {
    ensure_parent(path)?;
    let mut output = String::new();
    for defect in &report.defects {
        if defect.store.is_some() {
            writeln!(output, "{defect}")?;
        }
    }
    fs::write(path, output).with_context(|| format!("failed to write {}", path.display()))
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    Ok(())
}
