use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use typed_floats::tf64::NonNaN;

use crate::model::{SalesRecord, StoreId};

/// Label prefix marking a column that carried no data in the raw grid.
pub const PLACEHOLDER: &str = "Unnamed";

/// Raw rectangular block of one sheet: column labels plus optional text
/// cells. No reliable header row; the first non-empty row is a caption.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetBlock {
    pub labels: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

/// Result of normalizing one block. `NoData` means no non-placeholder
/// column was found; the sheet contributes zero rows.
#[derive(Debug, PartialEq)]
pub enum Normalized {
    Table(Vec<SalesRecord>),
    NoData,
}

fn is_placeholder(label: &str) -> bool {
    label.starts_with(PLACEHOLDER)
}

fn is_empty_row(row: &[Option<String>]) -> bool {
    row.iter().all(|x| x.is_none())
}

/// Turns a raw block into typed (store id, week, quantity) rows.
///
/// Column roles are positional: the first three non-placeholder columns,
/// starting at the first non-placeholder label, everything to its left
/// discarded. The first non-empty row is dropped as the caption.
pub fn normalize(block: &SheetBlock) -> Result<Normalized> {
    let Some(first) = block.labels.iter().position(|x| !is_placeholder(x)) else {
        return Ok(Normalized::NoData);
    };

    // store id, week, quantity
    let columns: Vec<usize> = (first..block.labels.len())
        .filter(|&i| !is_placeholder(&block.labels[i]))
        .take(3)
        .collect();

    let mut rows = block.rows.iter().filter(|x| !is_empty_row(x));
    rows.next();

    let mut records = Vec::new();
    for row in rows {
        let cells: Vec<Option<&str>> = columns
            .iter()
            .map(|&i| row.get(i).and_then(|x| x.as_deref()))
            .collect();
        if cells.iter().all(|x| x.is_none()) {
            continue;
        }
        records.push(parse_row(&cells).with_context(|| format!("bad sales row {row:?}"))?);
    }

    Ok(Normalized::Table(records))
}

fn cell<'a>(cells: &[Option<&'a str>], index: usize, name: &str) -> Result<&'a str> {
    cells
        .get(index)
        .copied()
        .flatten()
        .with_context(|| format!("missing {name} cell"))
}

fn parse_row(cells: &[Option<&str>]) -> Result<SalesRecord> {
    let store: StoreId = cell(cells, 0, "store id")?.parse()?;
    let week = NaiveDate::parse_from_str(cell(cells, 1, "week")?, "%Y-%m-%d")?;
    let quantity = cell(cells, 2, "quantity")?.parse::<f64>()?;
    let quantity = NonNaN::new(quantity).map_err(|_| anyhow!("quantity is NaN"))?;

    Ok(SalesRecord {
        store,
        week,
        quantity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(labels: &[&str], rows: &[&[&str]]) -> SheetBlock {
        SheetBlock {
            labels: labels.iter().map(|x| x.to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|x| (!x.is_empty()).then(|| x.to_string()))
                        .collect()
                })
                .collect(),
        }
    }

    fn record(store: u32, week: &str, quantity: f64) -> SalesRecord {
        SalesRecord {
            store: StoreId(store),
            week: week.parse().unwrap(),
            quantity: NonNaN::new(quantity).unwrap(),
        }
    }

    #[test]
    fn plain_block() {
        let block = block(
            &["0", "1", "2"],
            &[
                &["Weekly sales", "", ""],
                &["101", "2018-01-01", "5"],
                &["102", "2018-01-08", "2.5"],
            ],
        );
        assert_eq!(
            normalize(&block).unwrap(),
            Normalized::Table(vec![
                record(101, "2018-01-01", 5.0),
                record(102, "2018-01-08", 2.5),
            ])
        );
    }

    #[test]
    fn idempotent_over_normalized_block() {
        let rows: &[&[&str]] = &[
            &["store", "week", "quantity"],
            &["101", "2018-01-01", "5"],
            &["102", "2018-01-08", "2.5"],
        ];
        let once = normalize(&block(&["0", "1", "2"], rows)).unwrap();
        let twice = normalize(&block(&["0", "1", "2"], rows)).unwrap();
        assert_eq!(once, twice);
        assert_eq!(
            once,
            Normalized::Table(vec![
                record(101, "2018-01-01", 5.0),
                record(102, "2018-01-08", 2.5),
            ])
        );
    }

    #[test]
    fn drops_leading_placeholder_columns_and_extras() {
        let block = block(
            &["Unnamed: 0", "0", "Unnamed: 2", "1", "2", "3"],
            &[
                &["", "Weekly sales", "", "", "", ""],
                &["", "101", "", "2018-01-01", "5", "ignored"],
            ],
        );
        assert_eq!(
            normalize(&block).unwrap(),
            Normalized::Table(vec![record(101, "2018-01-01", 5.0)])
        );
    }

    #[test]
    fn drops_blank_rows_before_and_after_data() {
        let block = block(
            &["0", "1", "2"],
            &[
                &["", "", ""],
                &["Weekly sales", "", ""],
                &["101", "2018-01-01", "5"],
                &["", "", ""],
            ],
        );
        assert_eq!(
            normalize(&block).unwrap(),
            Normalized::Table(vec![record(101, "2018-01-01", 5.0)])
        );
    }

    #[test]
    fn all_placeholder_block_has_no_data() {
        let block = block(&["Unnamed: 0", "Unnamed: 1"], &[&["", ""], &["", ""]]);
        assert_eq!(normalize(&block).unwrap(), Normalized::NoData);
    }

    #[test]
    fn empty_block_yields_empty_table() {
        let block = block(&["0", "1", "2"], &[&["Weekly sales", "", ""]]);
        assert_eq!(normalize(&block).unwrap(), Normalized::Table(Vec::new()));
    }

    #[test]
    fn malformed_row_is_an_error() {
        let block = block(
            &["0", "1", "2"],
            &[
                &["Weekly sales", "", ""],
                &["101", "not a date", "5"],
            ],
        );
        assert!(normalize(&block).is_err());
    }

    #[test]
    fn partially_empty_row_is_an_error() {
        let block = block(
            &["0", "1", "2"],
            &[&["Weekly sales", "", ""], &["101", "2018-01-01", ""]],
        );
        assert!(normalize(&block).is_err());
    }
}
