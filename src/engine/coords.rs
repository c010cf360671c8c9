use crate::{
    geocode::{Place, ReverseGeocode},
    model::StoreRecord,
    report::{DefectKind, ValidationReport},
};

/// Coordinate sanity check and correction for one store. First matching
/// branch wins; a swap exchanges exactly the two recorded values and is
/// accepted without re-verification.
pub fn check<G: ReverseGeocode>(
    store: &mut StoreRecord,
    geocoder: &mut G,
    valid_counties: &[String],
    report: &mut ValidationReport,
) {
    if !(-90.0..=90.0).contains(&store.latitude) {
        let (latitude, longitude) = swap(store);
        report.record(
            DefectKind::InvalidCoordinateRange,
            Some(store.store),
            format!(
                "invalid latitude, coordinates swapped: {latitude}, {longitude} -> {longitude}, {latitude}"
            ),
        );
        return;
    }

    if !(-180.0..=180.0).contains(&store.longitude) {
        report.record(
            DefectKind::InvalidLongitude,
            Some(store.store),
            format!("invalid longitude {}, no change made", store.longitude),
        );
        return;
    }

    match geocoder.reverse(store.latitude, store.longitude) {
        Ok(result) => {
            if confirms(result.as_ref(), &store.city, valid_counties) {
                report.record(
                    DefectKind::CoordinatesVerified,
                    Some(store.store),
                    format!("valid coordinates: {}, {}", store.latitude, store.longitude),
                );
            } else {
                let (latitude, longitude) = swap(store);
                report.record(
                    DefectKind::CoordinateCityMismatch,
                    Some(store.store),
                    format!("coordinates swapped: {latitude}, {longitude} -> {longitude}, {latitude}"),
                );
            }
        }
        Err(error) => {
            report.record(
                DefectKind::GeocodingFailure,
                Some(store.store),
                format!("error during geocoding: {error}, no change made"),
            );
        }
    }
}

fn swap(store: &mut StoreRecord) -> (f64, f64) {
    let (latitude, longitude) = (store.latitude, store.longitude);
    store.latitude = longitude;
    store.longitude = latitude;
    (latitude, longitude)
}

/// A lookup confirms the record when its city contains the recorded city
/// (case-insensitively) or its county is one of the configured valid
/// counties. A missing result never confirms.
fn confirms(place: Option<&Place>, city: &str, valid_counties: &[String]) -> bool {
    let Some(place) = place else {
        return false;
    };

    let city = city.to_lowercase();
    if place
        .city
        .as_deref()
        .is_some_and(|x| x.to_lowercase().contains(&city))
    {
        return true;
    }

    place.county.as_deref().is_some_and(|x| {
        let x = x.to_lowercase();
        valid_counties.iter().any(|county| county.to_lowercase() == x)
    })
}
