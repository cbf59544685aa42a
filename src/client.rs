use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;

use crate::constants::USER_AGENT;
use crate::error::WeatherError;
use crate::models::{
    CurrentConditions, ForecastResponse, LocationQuery, UnitSystem, WeatherReport,
};

/// Source of current conditions plus the raw forecast series
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn fetch_weather(
        &self,
        query: &LocationQuery,
        units: UnitSystem,
    ) -> Result<WeatherReport, WeatherError>;
}

/// OpenWeatherMap client
#[derive(Clone)]
pub struct OpenWeatherClient {
    client: Arc<Client>,
    api_key: String,
    base_url: String,
}

impl OpenWeatherClient {
    /// Creates a client for the API at `base_url`, normally
    /// [`OPENWEATHER_API_BASE`](crate::constants::OPENWEATHER_API_BASE)
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            client: Arc::new(client),
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Makes an HTTP GET request for an endpoint and deserializes the JSON response
    async fn make_request<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        query: &LocationQuery,
        units: UnitSystem,
    ) -> Result<T> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let mut params = query.to_params();
        params.push(("appid", self.api_key.clone()));
        params.push(("units", units.as_param().to_string()));

        let response = self.client.get(&url).query(&params).send().await?;

        if !response.status().is_success() {
            anyhow::bail!("Request failed with status: {}", response.status());
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn fetch_weather(
        &self,
        query: &LocationQuery,
        units: UnitSystem,
    ) -> Result<WeatherReport, WeatherError> {
        tracing::info!("Fetching weather for {:?} in {} units", query, units.as_param());

        let lookup = tokio::try_join!(
            self.make_request::<CurrentConditions>("weather", query, units),
            self.make_request::<ForecastResponse>("forecast", query, units),
        );

        match lookup {
            Ok((current, forecast)) => Ok(WeatherReport {
                current,
                forecast: forecast.list,
            }),
            Err(e) => {
                tracing::warn!("Weather lookup for {:?} failed: {}", query, e);
                Err(WeatherError::ProviderUnavailable)
            }
        }
    }
}
