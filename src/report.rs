use std::fmt;

use crate::model::StoreId;

/// Taxonomy of data-quality findings. `CoordinatesVerified` and
/// `InvalidLongitude` are informational: recorded, never counted.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DefectKind {
    InvalidCoordinateRange,
    InvalidLongitude,
    CoordinateCityMismatch,
    CoordinatesVerified,
    GeocodingFailure,
    MissingOpenDate,
    DateOrderViolation,
    CampaignStartMismatch,
    SalesOutsideLifecycle,
    UnknownStoreReference,
    CityAssociationMismatch,
    InvalidSheetCity,
}

#[derive(Debug, Clone)]
pub struct Defect {
    pub kind: DefectKind,
    pub store: Option<StoreId>,
    pub message: String,
}

impl fmt::Display for Defect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.store {
            Some(store) => write!(f, "store {store}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MistakeCounters {
    pub coordinates: u32,
    pub dates_incorrect: u32,
    pub dates_missing: u32,
}

/// Append-only sequence of defects plus the final counters. The engine
/// returns one of these per run; callers persist it however they like.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub defects: Vec<Defect>,
    pub counters: MistakeCounters,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a defect, bumping the one counter bucket its kind maps to.
    pub fn record(&mut self, kind: DefectKind, store: Option<StoreId>, message: String) {
        match kind {
            DefectKind::InvalidCoordinateRange | DefectKind::CoordinateCityMismatch => {
                self.counters.coordinates += 1;
            }
            DefectKind::DateOrderViolation => self.counters.dates_incorrect += 1,
            DefectKind::MissingOpenDate => self.counters.dates_missing += 1,
            _ => {}
        }
        self.defects.push(Defect {
            kind,
            store,
            message,
        });
    }

    pub fn count(&self, kind: DefectKind) -> usize {
        self.defects.iter().filter(|x| x.kind == kind).count()
    }

    pub fn summary(&self) -> String {
        format!(
            "incorrect coordinates: {}\nincorrect dates: {}\nmissing dates: {}\n",
            self.counters.coordinates, self.counters.dates_incorrect, self.counters.dates_missing,
        )
    }
}
