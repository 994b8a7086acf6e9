use crate::{
    Credentials, ForecastEntry, ForecastRequest,
    credentials::OPENWEATHER,
    error::Result,
    format::format_forecast,
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use reqwest::Client;
use std::fmt::Debug;

pub mod openweather;

#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    /// Fetch the raw, chronologically ordered samples for `request`.
    async fn fetch_entries(&self, request: &ForecastRequest) -> Result<Vec<ForecastEntry>>;

    /// Fetch and format the forecast: one summary per requested day.
    async fn forecast(&self, request: &ForecastRequest) -> Result<Vec<String>> {
        let entries = self.fetch_entries(request).await?;
        format_forecast(&entries, request.days())
    }
}

/// Construct the OpenWeather provider from the loaded credentials.
pub fn provider_from_credentials(
    credentials: &Credentials,
    http: Client,
) -> Result<Box<dyn ForecastProvider>> {
    let token = credentials.require(OPENWEATHER)?;
    Ok(Box::new(OpenWeatherProvider::new(token, http)?))
}
