use std::{
    collections::BTreeMap,
    thread,
    time::{Duration, Instant},
};

use serde::Deserialize;
use thiserror::Error;
use ureq::{Agent, AgentBuilder};

/// Administrative address fields a reverse lookup can return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Place {
    pub city: Option<String>,
    pub county: Option<String>,
}

#[derive(Debug, Clone, Error)]
pub enum GeocodeError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// The one capability the validation engine needs from a geocoding
/// provider. `Ok(None)` means the provider had no result for the point,
/// which is distinct from a technical failure.
pub trait ReverseGeocode {
    fn reverse(&mut self, latitude: f64, longitude: f64) -> Result<Option<Place>, GeocodeError>;
}

pub struct Nominatim {
    agent: Agent,
    language: String,
    last_request: Option<Instant>,
}

impl Nominatim {
    const ENDPOINT: &'static str = "https://nominatim.openstreetmap.org/reverse";
    // usage policy of the shared public endpoint
    const MIN_INTERVAL: Duration = Duration::from_secs(1);

    pub fn new(language: &str) -> Self {
        Nominatim {
            agent: AgentBuilder::new()
                .user_agent("reconcile (store master cleanup)")
                .timeout(Duration::from_secs(10))
                .build(),
            language: language.to_string(),
            last_request: None,
        }
    }

    fn throttle(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < Self::MIN_INTERVAL {
                thread::sleep(Self::MIN_INTERVAL - elapsed);
            }
        }
        self.last_request = Some(Instant::now());
    }
}

impl ReverseGeocode for Nominatim {
    fn reverse(&mut self, latitude: f64, longitude: f64) -> Result<Option<Place>, GeocodeError> {
        self.throttle();

        let response: Reverse = self
            .agent
            .get(&format!(
                "{}?lat={latitude}&lon={longitude}&format=jsonv2&accept-language={}",
                Self::ENDPOINT,
                self.language
            ))
            .call()
            .map_err(|x| GeocodeError::Transport(x.to_string()))?
            .into_json()
            .map_err(|x| GeocodeError::Malformed(x.to_string()))?;

        // "Unable to geocode" comes back as a 200 with an error field
        if response.error.is_some() {
            return Ok(None);
        }

        let address = response.address.unwrap_or_default();
        Ok(Some(Place {
            city: address.get("city").cloned(),
            county: address.get("county").cloned(),
        }))
    }
}

#[derive(Deserialize)]
struct Reverse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    address: Option<BTreeMap<String, String>>,
}
