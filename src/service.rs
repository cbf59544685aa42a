use rmcp::{
    handler::server::{wrapper::Parameters, ServerHandler, tool::ToolRouter},
    model::{CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
    ErrorData as McpError,
};
use std::sync::Arc;

use crate::client::OpenWeatherClient;
use crate::controller::{AppState, Controller};
use crate::error::StoreError;
use crate::formatters::render_state;
use crate::location::FixedLocation;
use crate::models::{SearchRequest, SelectSavedCityRequest};

pub type WeatherController = Controller<OpenWeatherClient, FixedLocation>;

/// MCP front end exposing the weather controller as tools
#[derive(Clone)]
pub struct NovaWeather {
    controller: Arc<WeatherController>,
    tool_router: ToolRouter<Self>,
}

impl NovaWeather {
    pub fn new(controller: WeatherController) -> Self {
        Self {
            controller: Arc::new(controller),
            tool_router: Self::tool_router(),
        }
    }

    /// Turns a controller outcome into a tool result.
    ///
    /// A pending notice is reported once as an error result and then
    /// acknowledged so the next call shows the settled state.
    async fn respond(
        &self,
        outcome: Result<AppState, StoreError>,
    ) -> Result<CallToolResult, McpError> {
        let state = outcome.map_err(|e| {
            McpError::internal_error(format!("Failed to save preferences: {}", e), None)
        })?;

        if let Some(notice) = state.notice {
            tracing::info!("Notice: {}", notice.message());
            self.controller
                .acknowledge()
                .await
                .map_err(|e| McpError::internal_error(e.to_string(), None))?;
            return Ok(CallToolResult::error(vec![Content::text(notice.message())]));
        }

        Ok(CallToolResult::success(vec![Content::text(render_state(&state))]))
    }
}

#[tool_handler]
impl ServerHandler for NovaWeather {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "nova-weather".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some(
                "A weather lookup client powered by OpenWeatherMap. \
                Search a city or use the device location to get current conditions and a \
                5-day forecast; save cities for quick recall and switch units or theme."
                    .to_string(),
            ),
        }
    }
}

#[tool_router]
impl NovaWeather {
    /// Looks up weather for a place name
    #[tool(description = "Get current conditions and a 5-day forecast for a city (e.g., 'London', 'Paris, FR').")]
    async fn search(
        &self,
        Parameters(request): Parameters<SearchRequest>,
    ) -> Result<CallToolResult, McpError> {
        let outcome = self.controller.search(&request.city).await;
        self.respond(outcome).await
    }

    #[tool(description = "Get weather for one of the saved cities by name.")]
    async fn select_saved_city(
        &self,
        Parameters(request): Parameters<SelectSavedCityRequest>,
    ) -> Result<CallToolResult, McpError> {
        let outcome = self.controller.select_saved_city(&request.name).await;
        self.respond(outcome).await
    }

    #[tool(description = "Get weather for the device's current location.")]
    async fn use_my_location(&self) -> Result<CallToolResult, McpError> {
        let outcome = self.controller.use_my_location().await;
        self.respond(outcome).await
    }

    #[tool(description = "Save the currently displayed city to the saved-city list.")]
    async fn save_current_city(&self) -> Result<CallToolResult, McpError> {
        let outcome = self.controller.save_current_city().await;
        self.respond(outcome).await
    }

    #[tool(description = "Switch between metric (\u{00b0}C, m/s) and imperial (\u{00b0}F, mph) units. Displayed values are not re-fetched.")]
    async fn toggle_unit(&self) -> Result<CallToolResult, McpError> {
        let outcome = self.controller.toggle_unit().await;
        self.respond(outcome).await
    }

    #[tool(description = "Switch between the light and dark theme.")]
    async fn toggle_theme(&self) -> Result<CallToolResult, McpError> {
        let outcome = self.controller.toggle_theme().await;
        self.respond(outcome).await
    }

    #[tool(description = "Show the currently loaded weather, saved cities and settings.")]
    async fn show_weather(&self) -> Result<CallToolResult, McpError> {
        let state = self.controller.state();
        self.respond(Ok(state)).await
    }

    #[tool(description = "Abandon a weather lookup that is still in progress.")]
    async fn cancel_pending(&self) -> Result<CallToolResult, McpError> {
        let outcome = self.controller.cancel().await;
        self.respond(outcome).await
    }
}
