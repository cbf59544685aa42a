use anyhow::{bail, Context, Result};
use std::path::PathBuf;

use crate::constants::OPENWEATHER_API_BASE;
use crate::location::FixedLocation;
use crate::models::Coordinates;

pub const API_KEY_VAR: &str = "OPENWEATHER_API_KEY";
pub const API_BASE_VAR: &str = "NOVA_WEATHER_API_BASE";
pub const DATA_DIR_VAR: &str = "NOVA_WEATHER_DATA_DIR";
pub const LOCATION_VAR: &str = "NOVA_WEATHER_LOCATION";

/// Location value that makes "use my location" report a refused permission
pub const LOCATION_DENIED: &str = "denied";

/// Runtime settings, read from the environment
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// OpenWeatherMap API key
    pub api_key: String,

    /// Provider base URL
    pub api_base: String,

    /// Directory holding the preference files
    pub data_dir: PathBuf,

    /// Reading reported for "use my location": a position, `denied`, or
    /// unsupported when unset
    pub location: FixedLocation,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = var(API_KEY_VAR)
            .with_context(|| format!("{} must be set", API_KEY_VAR))?;

        let api_base = var(API_BASE_VAR).unwrap_or_else(|| OPENWEATHER_API_BASE.to_string());

        let data_dir = match var(DATA_DIR_VAR) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_dir()
                .context("Failed to get data directory")?
                .join("nova-weather"),
        };

        let location = match var(LOCATION_VAR) {
            None => FixedLocation::unsupported(),
            Some(raw) if raw.trim() == LOCATION_DENIED => FixedLocation::denied(),
            Some(raw) => parse_coordinates(&raw)
                .map(|coords| FixedLocation::new(Some(coords)))
                .with_context(|| format!("Invalid {}", LOCATION_VAR))?,
        };

        Ok(Self {
            api_key,
            api_base,
            data_dir,
            location,
        })
    }
}

/// Parses `"lat,lon"` in decimal degrees
fn parse_coordinates(raw: &str) -> Result<Coordinates> {
    let Some((lat, lon)) = raw.split_once(',') else {
        bail!("expected \"latitude,longitude\", got {:?}", raw);
    };

    let latitude: f64 = lat.trim().parse().context("latitude is not a number")?;
    let longitude: f64 = lon.trim().parse().context("longitude is not a number")?;

    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        bail!("coordinates out of range: {}, {}", latitude, longitude);
    }

    Ok(Coordinates {
        latitude,
        longitude,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_minimal_config() {
        let config = Config::from_lookup(lookup(&[
            (API_KEY_VAR, "secret"),
            (DATA_DIR_VAR, "/tmp/nova"),
        ]))
        .unwrap();

        assert_eq!(config.api_key, "secret");
        assert_eq!(config.api_base, OPENWEATHER_API_BASE);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/nova"));
        assert_eq!(config.location, FixedLocation::unsupported());
    }

    #[test]
    fn test_missing_api_key() {
        let err = Config::from_lookup(lookup(&[(DATA_DIR_VAR, "/tmp/nova")])).unwrap_err();
        assert!(err.to_string().contains(API_KEY_VAR));

        assert!(Config::from_lookup(lookup(&[(API_KEY_VAR, "  ")])).is_err());
    }

    #[test]
    fn test_location() {
        let config = Config::from_lookup(lookup(&[
            (API_KEY_VAR, "secret"),
            (DATA_DIR_VAR, "/tmp/nova"),
            (LOCATION_VAR, "48.85, 2.35"),
        ]))
        .unwrap();

        assert_eq!(
            config.location,
            FixedLocation::new(Some(Coordinates {
                latitude: 48.85,
                longitude: 2.35,
            }))
        );
    }

    #[test]
    fn test_denied_location() {
        let config = Config::from_lookup(lookup(&[
            (API_KEY_VAR, "secret"),
            (DATA_DIR_VAR, "/tmp/nova"),
            (LOCATION_VAR, "denied"),
        ]))
        .unwrap();

        assert_eq!(config.location, FixedLocation::denied());
    }

    #[test]
    fn test_malformed_location() {
        for raw in ["48.85", "north,east", "91,0", "0,181"] {
            let result = Config::from_lookup(lookup(&[
                (API_KEY_VAR, "secret"),
                (DATA_DIR_VAR, "/tmp/nova"),
                (LOCATION_VAR, raw),
            ]));
            assert!(result.is_err(), "{} should be rejected", raw);
        }
    }
}
