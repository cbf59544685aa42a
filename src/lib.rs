//! Weather lookup client for OpenWeatherMap, served as MCP tools.
//!
//! Current conditions and a 5-day forecast for a city or the device
//! location, with persisted saved cities and theme.

pub mod client;
pub mod config;
pub mod constants;
pub mod controller;
pub mod error;
pub mod forecast;
pub mod formatters;
pub mod location;
pub mod models;
pub mod service;
pub mod store;

pub use client::{OpenWeatherClient, WeatherSource};
pub use config::Config;
pub use controller::{AppState, Controller, Event, Notice, Phase};
pub use error::{LocationError, StoreError, WeatherError};
pub use forecast::reduce_forecast;
pub use location::{FixedLocation, Geolocator};
pub use service::NovaWeather;
pub use store::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore};
