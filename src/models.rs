use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ============================================================================
// Query and Preference Types
// ============================================================================

/// Measurement convention sent to the provider and used for display suffixes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn toggle(self) -> Self {
        match self {
            Self::Metric => Self::Imperial,
            Self::Imperial => Self::Metric,
        }
    }

    /// Value of the provider's `units` query parameter
    pub fn as_param(self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
        }
    }

    pub fn temperature_suffix(self) -> &'static str {
        match self {
            Self::Metric => "C",
            Self::Imperial => "F",
        }
    }

    pub fn wind_suffix(self) -> &'static str {
        match self {
            Self::Metric => "m/s",
            Self::Imperial => "mph",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Parses a persisted theme name; anything unknown yields `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }
}

/// Device position reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// What the provider is asked about: a place name or a coordinate pair
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    PlaceName(String),
    Coordinates(Coordinates),
}

impl LocationQuery {
    /// Builds a place-name query, or `None` when the text is blank.
    pub fn place_name(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self::PlaceName(trimmed.to_string()))
        }
    }

    /// Query parameters identifying the location
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::PlaceName(name) => vec![("q", name.clone())],
            Self::Coordinates(coords) => vec![
                ("lat", coords.latitude.to_string()),
                ("lon", coords.longitude.to_string()),
            ],
        }
    }
}

/// Persisted user preferences
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Preferences {
    pub cities: Vec<String>,
    pub theme: Theme,
}

// ============================================================================
// OpenWeatherMap API Models
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherDescriptor {
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentReadings {
    pub temp: f64,
    pub humidity: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CountryInfo {
    #[serde(default)]
    pub country: Option<String>,
}

/// Response of the current-conditions endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub name: String,
    #[serde(default)]
    pub sys: CountryInfo,
    pub main: CurrentReadings,
    pub wind: Wind,
    #[serde(default)]
    pub weather: Vec<WeatherDescriptor>,
    #[serde(default)]
    pub dt: i64,
}

impl CurrentConditions {
    pub fn country(&self) -> Option<&str> {
        self.sys.country.as_deref().filter(|c| !c.is_empty())
    }

    /// The provider lists conditions by relevance; the first one is shown.
    pub fn primary_weather(&self) -> Option<&WeatherDescriptor> {
        self.weather.first()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleReadings {
    pub temp: f64,
}

/// One 3-hour entry of the forecast series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    pub dt: i64,
    pub dt_txt: String,
    pub main: SampleReadings,
    #[serde(default)]
    pub weather: Vec<WeatherDescriptor>,
}

impl ForecastSample {
    pub fn primary_weather(&self) -> Option<&WeatherDescriptor> {
        self.weather.first()
    }
}

/// Response of the forecast endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastResponse {
    pub list: Vec<ForecastSample>,
}

/// Both halves of a successful lookup, forecast still unreduced
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub current: CurrentConditions,
    pub forecast: Vec<ForecastSample>,
}

// ============================================================================
// MCP Tool Request Models
// ============================================================================

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct SearchRequest {
    pub city: String,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct SelectSavedCityRequest {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_toggle_twice_restores_suffix() {
        let unit = UnitSystem::Metric;
        assert_eq!(unit.toggle().temperature_suffix(), "F");
        assert_eq!(unit.toggle().toggle().temperature_suffix(), "C");
        assert_eq!(unit.toggle().wind_suffix(), "mph");
    }

    #[test]
    fn test_theme_parse() {
        assert_eq!(Theme::parse("dark"), Some(Theme::Dark));
        assert_eq!(Theme::parse("light\n"), Some(Theme::Light));
        assert_eq!(Theme::parse("sepia"), None);
    }

    #[test]
    fn test_blank_place_name_is_rejected() {
        assert_eq!(LocationQuery::place_name(""), None);
        assert_eq!(LocationQuery::place_name("   "), None);
        assert_eq!(
            LocationQuery::place_name("  Paris "),
            Some(LocationQuery::PlaceName("Paris".to_string()))
        );
    }

    #[test]
    fn test_coordinate_query_params() {
        let query = LocationQuery::Coordinates(Coordinates {
            latitude: 51.5,
            longitude: -0.12,
        });
        assert_eq!(
            query.to_params(),
            vec![("lat", "51.5".to_string()), ("lon", "-0.12".to_string())]
        );
    }

    #[test]
    fn test_current_conditions_deserialize() {
        let json = serde_json::json!({
            "name": "London",
            "sys": { "country": "GB" },
            "main": { "temp": 11.6, "humidity": 81, "pressure": 1012 },
            "wind": { "speed": 4.1, "deg": 240 },
            "weather": [{ "id": 500, "main": "Rain", "description": "light rain", "icon": "10d" }],
            "dt": 1704110400
        });
        let current: CurrentConditions = serde_json::from_value(json).unwrap();
        assert_eq!(current.name, "London");
        assert_eq!(current.country(), Some("GB"));
        assert_eq!(current.main.humidity, 81);
        assert_eq!(current.primary_weather().unwrap().icon, "10d");
    }

    #[test]
    fn test_missing_country_is_none() {
        let json = serde_json::json!({
            "name": "Open Sea",
            "sys": {},
            "main": { "temp": 3.0, "humidity": 90 },
            "wind": { "speed": 12.0 },
            "weather": []
        });
        let current: CurrentConditions = serde_json::from_value(json).unwrap();
        assert_eq!(current.country(), None);
        assert!(current.primary_weather().is_none());
    }
}
