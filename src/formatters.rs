use chrono::{DateTime, Local, TimeZone};

use crate::constants::{FALLBACK_FLAG, FLAG_ICON_BASE, WEATHER_ICON_BASE};
use crate::controller::AppState;
use crate::models::{CurrentConditions, ForecastSample, UnitSystem};

/// Builds the image URL for a provider icon id (e.g. `10d`)
pub fn weather_icon_url(icon: &str) -> String {
    format!("{}/{}@2x.png", WEATHER_ICON_BASE, icon)
}

/// Builds the flag image URL for a two-letter country code, or a globe when
/// the code is unknown
pub fn country_flag_url(code: Option<&str>) -> String {
    match code.filter(|c| !c.is_empty()) {
        Some(code) => format!("{}/{}/flat/32.png", FLAG_ICON_BASE, code),
        None => FALLBACK_FLAG.to_string(),
    }
}

/// Short day label such as `Mon, 1 Jan` for a unix timestamp (UTC)
pub fn format_day(timestamp: i64) -> String {
    match DateTime::from_timestamp(timestamp, 0) {
        Some(date) => date.format("%a, %-d %b").to_string(),
        None => timestamp.to_string(),
    }
}

/// Nearest integer, halves rounded up (-2.5 becomes -2)
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

fn format_temperature(temp: f64, unit: UnitSystem) -> String {
    format!("{}\u{00b0}{}", round_half_up(temp), unit.temperature_suffix())
}

/// Formats the current-conditions block
pub fn format_current(current: &CurrentConditions, unit: UnitSystem) -> String {
    let mut output = format!(
        "{}, {} {}\n",
        current.name,
        current.country().unwrap_or("--"),
        country_flag_url(current.country())
    );

    if let Some(weather) = current.primary_weather() {
        output.push_str(&format!(
            "  Conditions: {} ({})\n",
            weather.description,
            weather_icon_url(&weather.icon)
        ));
    }
    output.push_str(&format!(
        "  Temperature: {}\n  Humidity: {}%\n  Wind: {} {}\n",
        format_temperature(current.main.temp, unit),
        current.main.humidity,
        current.wind.speed,
        unit.wind_suffix()
    ));
    output
}

/// Formats the reduced forecast as one line per day
pub fn format_forecast(forecast: &[ForecastSample], unit: UnitSystem) -> String {
    let mut output = String::from("Forecast:\n");
    for sample in forecast {
        let (main, icon) = match sample.primary_weather() {
            Some(w) => (w.main.as_str(), weather_icon_url(&w.icon)),
            None => ("Unknown", String::new()),
        };
        output.push_str(&format!(
            "  {}: {} {} {}\n",
            format_day(sample.dt),
            format_temperature(sample.main.temp, unit),
            main,
            icon
        ));
    }
    output
}

/// Renders the whole application state as text, dated now
pub fn render_state(state: &AppState) -> String {
    render_state_at(state, &Local::now())
}

/// Renders the whole application state as text, dated `now`
pub fn render_state_at<Tz: TimeZone>(state: &AppState, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let mut output = format!(
        "Weather Forecast [theme: {}, units: {}]\n{}\n\n",
        state.theme.as_str(),
        state.unit.as_param(),
        now.format("%a, %-d %b %Y %H:%M:%S")
    );

    if state.is_loading() {
        output.push_str("Loading weather...\n");
    } else if let Some(current) = &state.current {
        output.push_str(&format_current(current, state.unit));
        if !state.forecast.is_empty() {
            output.push('\n');
            output.push_str(&format_forecast(&state.forecast, state.unit));
        }
    } else {
        output.push_str("No city loaded. Search for a city or use your location.\n");
    }

    if !state.saved_cities.is_empty() {
        output.push_str(&format!("\nSaved Cities: {}\n", state.saved_cities.join(", ")));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::models::{CountryInfo, CurrentReadings, SampleReadings, WeatherDescriptor, Wind};

    fn london() -> CurrentConditions {
        CurrentConditions {
            name: "London".to_string(),
            sys: CountryInfo {
                country: Some("GB".to_string()),
            },
            main: CurrentReadings {
                temp: 11.6,
                humidity: 81,
            },
            wind: Wind { speed: 4.1 },
            weather: vec![WeatherDescriptor {
                main: "Rain".to_string(),
                description: "light rain".to_string(),
                icon: "10d".to_string(),
            }],
            dt: 0,
        }
    }

    #[test]
    fn test_asset_urls() {
        assert_eq!(
            weather_icon_url("10d"),
            "https://openweathermap.org/img/wn/10d@2x.png"
        );
        assert_eq!(
            country_flag_url(Some("GB")),
            "https://flagsapi.com/GB/flat/32.png"
        );
        assert_eq!(country_flag_url(Some("")), FALLBACK_FLAG);
        assert_eq!(country_flag_url(None), FALLBACK_FLAG);
    }

    #[test]
    fn test_halves_round_up() {
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(-2.6), -3);
        assert_eq!(round_half_up(11.4), 11);
        assert_eq!(format_temperature(-0.5, UnitSystem::Metric), "0\u{00b0}C");
    }

    #[test]
    fn test_format_day() {
        // 2024-01-01 12:00:00 UTC
        assert_eq!(format_day(1_704_110_400), "Mon, 1 Jan");
    }

    #[test]
    fn test_format_current_uses_unit_suffix() {
        let metric = format_current(&london(), UnitSystem::Metric);
        assert!(metric.contains("Temperature: 12\u{00b0}C"));
        assert!(metric.contains("Wind: 4.1 m/s"));
        assert!(metric.contains("Humidity: 81%"));
        assert!(metric.contains("light rain"));

        let imperial = format_current(&london(), UnitSystem::Imperial);
        assert!(imperial.contains("Temperature: 12\u{00b0}F"));
        assert!(imperial.contains("Wind: 4.1 mph"));
    }

    #[test]
    fn test_format_forecast_lines() {
        let forecast = vec![ForecastSample {
            dt: 1_704_110_400,
            dt_txt: "2024-01-01 12:00:00".to_string(),
            main: SampleReadings { temp: -0.4 },
            weather: vec![WeatherDescriptor {
                main: "Snow".to_string(),
                description: "light snow".to_string(),
                icon: "13d".to_string(),
            }],
        }];

        let output = format_forecast(&forecast, UnitSystem::Metric);

        assert!(output.contains("Mon, 1 Jan: 0\u{00b0}C Snow"));
        assert!(output.contains("13d@2x.png"));
    }

    #[test]
    fn test_render_state() {
        let mut state = AppState::default();
        state.current = Some(london());
        state.saved_cities = vec!["London".to_string(), "Paris".to_string()];
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, 0).unwrap();

        let output = render_state_at(&state, &now);

        assert!(output.starts_with(
            "Weather Forecast [theme: light, units: metric]\nMon, 1 Jan 2024 09:30:00\n"
        ));
        assert!(output.contains("London, GB https://flagsapi.com/GB/flat/32.png"));
        assert!(output.contains("Saved Cities: London, Paris"));
    }

    #[test]
    fn test_render_empty_state() {
        let output = render_state(&AppState::default());
        assert!(output.contains("No city loaded"));
        assert!(!output.contains("Saved Cities"));
    }
}
