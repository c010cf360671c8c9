use itertools::Itertools;

use crate::{
    model::{SalesRecord, StoreRecord},
    report::{DefectKind, ValidationReport},
};

pub fn city_known(master: &[StoreRecord], city: &str) -> bool {
    let city = city.to_lowercase();
    master.iter().any(|store| store.city.to_lowercase() == city)
}

/// Checks every distinct store id of an admitted sheet against the
/// master: the id must exist, and its recorded city must match the
/// sheet's nominal city. Mismatching rows are reported but kept.
pub fn check_sheet(
    master: &[StoreRecord],
    sheet_city: &str,
    rows: &[SalesRecord],
    report: &mut ValidationReport,
) {
    for id in rows.iter().map(|x| x.store).unique() {
        match master.iter().find(|store| store.store == id) {
            None => report.record(
                DefectKind::UnknownStoreReference,
                Some(id),
                "store is not present in the store master".to_string(),
            ),
            Some(store) => {
                if store.city.to_lowercase() != sheet_city.to_lowercase() {
                    report.record(
                        DefectKind::CityAssociationMismatch,
                        Some(id),
                        format!(
                            "associated with {:?}, expected {:?}",
                            store.city, sheet_city
                        ),
                    );
                }
            }
        }
    }
}
