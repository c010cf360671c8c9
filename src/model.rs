use std::{fmt, num::ParseIntError, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use typed_floats::tf64::NonNaN;

/// Network-wide numeric store identifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StoreId(pub u32);

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for StoreId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // one historical export prefixed ids with N
        Ok(StoreId(s.trim().trim_start_matches('N').parse()?))
    }
}

/// One row of the store master. Only `latitude`/`longitude` are ever
/// mutated after load, and only by the coordinate corrector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreRecord {
    pub store: StoreId,
    pub block: String,
    pub legacy: String,
    pub city: String,
    pub region: String,
    pub latitude: f64,
    pub longitude: f64,
    pub opened: Option<NaiveDate>,
    pub closed: Option<NaiveDate>,
}

/// One weekly sales figure, immutable once parsed from a sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub store: StoreId,
    pub week: NaiveDate,
    pub quantity: NonNaN,
}
