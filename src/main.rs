use anyhow::Result;
use nova_weather::{
    Config, Controller, FilePreferenceStore, NovaWeather, OpenWeatherClient,
};
use rmcp::ServiceExt;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nova_weather=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Nova weather server");

    let config = Config::from_env()?;
    tracing::info!("Preferences stored in {:?}", config.data_dir);

    let client = OpenWeatherClient::with_base_url(&config.api_key, &config.api_base)?;
    let store = Arc::new(FilePreferenceStore::new(&config.data_dir));
    let controller = Controller::new(client, config.location, store);

    let server = NovaWeather::new(controller).serve(rmcp::transport::stdio()).await?;
    server.waiting().await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}
