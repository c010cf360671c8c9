use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::{
    model::{SalesRecord, StoreId, StoreRecord},
    report::{DefectKind, ValidationReport},
};

pub fn check_store(store: &StoreRecord, report: &mut ValidationReport) {
    if store.opened.is_none() {
        report.record(
            DefectKind::MissingOpenDate,
            Some(store.store),
            "open date is missing".to_string(),
        );
    }

    if let (Some(opened), Some(closed)) = (store.opened, store.closed) {
        if opened > closed {
            report.record(
                DefectKind::DateOrderViolation,
                Some(store.store),
                format!("open date is greater than close date: {opened} > {closed}"),
            );
        }
    }
}

/// Date checks that need the whole combined sales table: the campaign
/// start, and per-store lifecycle bounds. Both lifecycle comparisons
/// run against the last observed week for the store.
pub fn check_network(
    master: &[StoreRecord],
    sales: &[SalesRecord],
    campaign_start: NaiveDate,
    report: &mut ValidationReport,
) {
    let Some(first_week) = sales.iter().map(|x| x.week).min() else {
        return;
    };
    if first_week != campaign_start {
        report.record(
            DefectKind::CampaignStartMismatch,
            None,
            format!("sales data should start from {campaign_start}, found start date {first_week}"),
        );
    }

    let mut last_week: BTreeMap<StoreId, NaiveDate> = BTreeMap::new();
    for record in sales {
        let week = last_week.entry(record.store).or_insert(record.week);
        if record.week > *week {
            *week = record.week;
        }
    }

    for store in master {
        let Some(&last) = last_week.get(&store.store) else {
            continue;
        };

        if let Some(closed) = store.closed {
            if last > closed {
                report.record(
                    DefectKind::SalesOutsideLifecycle,
                    Some(store.store),
                    format!("closed on {closed}, but sales data available until {last}"),
                );
            }
        }

        if let Some(opened) = store.opened {
            if opened > last {
                report.record(
                    DefectKind::SalesOutsideLifecycle,
                    Some(store.store),
                    format!("opened on {opened}, but sales data available until {last}"),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use typed_floats::tf64::NonNaN;

    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn store(id: u32, opened: Option<&str>, closed: Option<&str>) -> StoreRecord {
        StoreRecord {
            store: StoreId(id),
            block: "B1".to_string(),
            legacy: "-".to_string(),
            city: "Омск".to_string(),
            region: "Сибирь".to_string(),
            latitude: 54.98,
            longitude: 73.36,
            opened: opened.map(date),
            closed: closed.map(date),
        }
    }

    fn sale(id: u32, week: &str) -> SalesRecord {
        SalesRecord {
            store: StoreId(id),
            week: date(week),
            quantity: NonNaN::new(1.0).unwrap(),
        }
    }

    #[test]
    fn missing_open_date() {
        let mut report = ValidationReport::new();
        check_store(&store(101, None, None), &mut report);

        assert_eq!(report.count(DefectKind::MissingOpenDate), 1);
        assert_eq!(report.counters.dates_missing, 1);
        assert_eq!(report.counters.dates_incorrect, 0);
    }

    #[test]
    fn open_after_close() {
        let mut report = ValidationReport::new();
        check_store(&store(101, Some("2019-06-01"), Some("2018-06-01")), &mut report);

        assert_eq!(report.count(DefectKind::DateOrderViolation), 1);
        assert_eq!(report.counters.dates_incorrect, 1);
        assert_eq!(report.counters.dates_missing, 0);
    }

    #[test]
    fn close_only_is_not_an_order_violation() {
        let mut report = ValidationReport::new();
        check_store(&store(101, None, Some("2018-06-01")), &mut report);

        assert_eq!(report.count(DefectKind::DateOrderViolation), 0);
        assert_eq!(report.count(DefectKind::MissingOpenDate), 1);
    }

    #[test]
    fn campaign_start_mismatch_fires_once() {
        let mut report = ValidationReport::new();
        let master = [store(101, Some("2017-05-01"), None)];
        let sales = [sale(101, "2018-01-08"), sale(101, "2018-02-05")];

        check_network(&master, &sales, date("2018-01-01"), &mut report);

        assert_eq!(report.count(DefectKind::CampaignStartMismatch), 1);
        let defect = &report.defects[0];
        assert!(defect.message.contains("2018-01-01"));
        assert!(defect.message.contains("2018-01-08"));
    }

    #[test]
    fn expected_campaign_start_is_silent() {
        let mut report = ValidationReport::new();
        let master = [store(101, Some("2017-05-01"), None)];
        let sales = [sale(101, "2018-01-01")];

        check_network(&master, &sales, date("2018-01-01"), &mut report);

        assert_eq!(report.count(DefectKind::CampaignStartMismatch), 0);
    }

    #[test]
    fn sales_after_close_date() {
        let mut report = ValidationReport::new();
        let master = [store(202, Some("2017-05-01"), Some("2020-01-01"))];
        let sales = [
            sale(202, "2018-01-01"),
            sale(202, "2020-03-01"),
            sale(202, "2019-12-30"),
        ];

        check_network(&master, &sales, date("2018-01-01"), &mut report);

        assert_eq!(report.count(DefectKind::SalesOutsideLifecycle), 1);
        let defect = report
            .defects
            .iter()
            .find(|x| x.kind == DefectKind::SalesOutsideLifecycle)
            .unwrap();
        assert_eq!(defect.store, Some(StoreId(202)));
        assert!(defect.message.contains("2020-01-01"));
        assert!(defect.message.contains("2020-03-01"));
    }

    #[test]
    fn open_date_after_last_sale_week() {
        let mut report = ValidationReport::new();
        let master = [store(303, Some("2019-01-01"), None)];
        let sales = [sale(303, "2018-01-01"), sale(303, "2018-06-04")];

        check_network(&master, &sales, date("2018-01-01"), &mut report);

        assert_eq!(report.count(DefectKind::SalesOutsideLifecycle), 1);
        assert!(report.defects[0].message.contains("2019-01-01"));
        assert!(report.defects[0].message.contains("2018-06-04"));
    }

    #[test]
    fn store_without_sales_is_skipped() {
        let mut report = ValidationReport::new();
        let master = [store(404, Some("2017-05-01"), Some("2017-06-01"))];
        let sales = [sale(101, "2018-01-01")];

        check_network(&master, &sales, date("2018-01-01"), &mut report);

        assert_eq!(report.count(DefectKind::SalesOutsideLifecycle), 0);
    }
}
