/// User agent string for HTTP requests
pub const USER_AGENT: &str = "nova-weather/0.1.0";

/// OpenWeatherMap API base URL
pub const OPENWEATHER_API_BASE: &str = "https://api.openweathermap.org/data/2.5";

/// Base URL for weather condition icons
pub const WEATHER_ICON_BASE: &str = "https://openweathermap.org/img/wn";

/// Base URL for country flag images
pub const FLAG_ICON_BASE: &str = "https://flagsapi.com";

/// Shown in place of a flag when the provider returns no country code
pub const FALLBACK_FLAG: &str = "\u{1F30D}";

/// Preference key holding the saved-city list as a JSON array
pub const SAVED_CITIES_KEY: &str = "savedCities";

/// Preference key holding the theme name
pub const THEME_KEY: &str = "theme";
