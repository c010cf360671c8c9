use std::{
    fs::read_to_string,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;

/// Run configuration. Every field has a default matching the reference
/// deployment, so a config file only needs the values it overrides.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store_master: PathBuf,
    pub workbook: PathBuf,
    pub corrected_master: PathBuf,
    pub combined_sales: PathBuf,
    pub changelog: PathBuf,
    pub modification_log: PathBuf,
    pub sheet_prefix: String,
    pub valid_regions: Vec<String>,
    pub valid_counties: Vec<String>,
    pub campaign_start: NaiveDate,
    pub language: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            store_master: "input_data/stores.csv".into(),
            workbook: "input_data/data.xlsx".into(),
            corrected_master: "result_data/corrected_stores.csv".into(),
            combined_sales: "result_data/combined_sales.csv".into(),
            changelog: "logs/changelog.txt".into(),
            modification_log: "logs/modification_log.txt".into(),
            sheet_prefix: "Sales - ".to_string(),
            valid_regions: vec!["Урал".to_string(), "Сибирь".to_string()],
            valid_counties: vec![
                "Уфимский район".to_string(),
                "Челябинский городской округ".to_string(),
                "городской округ Томск".to_string(),
                "Кемеровский муниципальный округ".to_string(),
                "Омский район".to_string(),
                "Иркутский район".to_string(),
                "Новосибирский район".to_string(),
                "Оренбургский район".to_string(),
                "Емельяновский район".to_string(),
                "городской округ Барнаул".to_string(),
            ],
            campaign_start: NaiveDate::from_ymd_opt(2018, 1, 1).expect("hardcoded"),
            language: "ru".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_yaml::from_str(&raw).with_context(|| format!("bad config {}", path.display()))
    }
}
