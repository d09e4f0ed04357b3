//! Open-Meteo forecast API client
//!
//! This module fetches the daily maximum and minimum temperature and the
//! precipitation sum for one date from the Open-Meteo API and parses them into
//! a [`Forecast`].

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::validate::DATE_FORMAT;
use super::{check_status, Coordinates, FetchError, Forecast, ForecastSource};

/// Base URL for the Open-Meteo API
const OPEN_METEO_BASE_URL: &str = "https://api.open-meteo.com";

/// Forecast endpoint, relative to the base URL
const FORECAST_PATH: &str = "/v1/forecast";

/// Day boundaries follow the location being forecast
const TIMEZONE: &str = "auto";

/// Daily variables requested from the API
const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,precipitation_sum";

/// Client for fetching daily forecasts from Open-Meteo
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: Client,
    base_url: String,
}

impl Default for OpenMeteoClient {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenMeteoClient {
    /// Create a new OpenMeteoClient with default settings
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    /// Create a new OpenMeteoClient with a custom HTTP client
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            base_url: OPEN_METEO_BASE_URL.to_string(),
        }
    }

    /// Point the client at another host (mock servers, self-hosted instances)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Fetch the daily forecast for the given coordinates and date
    ///
    /// # Arguments
    /// * `lat` - Latitude coordinate
    /// * `lon` - Longitude coordinate
    /// * `date` - Day to forecast
    ///
    /// # Returns
    /// * `Ok(Forecast)` - Values for the day; a `null` in the response becomes `None`
    /// * `Err(FetchError)` - If the request or parsing fails, or the day is missing
    pub async fn fetch_daily(
        &self,
        lat: f64,
        lon: f64,
        date: NaiveDate,
    ) -> Result<Forecast, FetchError> {
        let day = date.format(DATE_FORMAT).to_string();
        debug!(lat, lon, date = %day, "Requesting Open-Meteo daily forecast");

        let response = self
            .client
            .get(format!("{}{}", self.base_url, FORECAST_PATH))
            .query(&[
                ("latitude", lat.to_string()),
                ("longitude", lon.to_string()),
                ("daily", DAILY_FIELDS.to_string()),
                ("start_date", day.clone()),
                ("end_date", day),
                ("timezone", TIMEZONE.to_string()),
            ])
            .send()
            .await?;
        let text = check_status(response).await?.text().await?;
        let api_response: OpenMeteoResponse = serde_json::from_str(&text)?;

        parse_response(api_response, date)
    }
}

#[async_trait]
impl ForecastSource for OpenMeteoClient {
    fn name(&self) -> &'static str {
        "Open-Meteo"
    }

    async fn fetch(
        &self,
        coordinates: Coordinates,
        date: NaiveDate,
    ) -> Result<Forecast, FetchError> {
        self.fetch_daily(coordinates.latitude, coordinates.longitude, date)
            .await
    }
}

/// Require a daily array to be present
fn required<T>(field: Option<Vec<T>>, name: &str) -> Result<Vec<T>, FetchError> {
    field.ok_or_else(|| FetchError::MissingField(format!("daily.{}", name)))
}

/// Parse the Open-Meteo API response into a Forecast for `date`
fn parse_response(response: OpenMeteoResponse, date: NaiveDate) -> Result<Forecast, FetchError> {
    let daily = response
        .daily
        .ok_or_else(|| FetchError::MissingField("daily".to_string()))?;

    let time = required(daily.time, "time")?;
    let max = required(daily.temperature_2m_max, "temperature_2m_max")?;
    let min = required(daily.temperature_2m_min, "temperature_2m_min")?;
    let precipitation = required(daily.precipitation_sum, "precipitation_sum")?;

    // Validate that all arrays have the same length
    let len = time.len();
    if max.len() != len || min.len() != len || precipitation.len() != len {
        return Err(FetchError::MissingField(
            "daily arrays have inconsistent lengths".to_string(),
        ));
    }

    let day = date.format(DATE_FORMAT).to_string();
    let index = time
        .iter()
        .position(|t| *t == day)
        .ok_or(FetchError::NoDataForDate(date))?;

    Ok(Forecast {
        max_temp: max[index],
        min_temp: min[index],
        precipitation: precipitation[index],
    })
}

/// Open-Meteo API response structure
#[derive(Debug, Deserialize)]
struct OpenMeteoResponse {
    daily: Option<DailyWeather>,
}

/// Daily weather data from Open-Meteo
///
/// Every array is indexed by `time`; individual values are `null` when the
/// model has no data for that day.
#[derive(Debug, Deserialize)]
struct DailyWeather {
    time: Option<Vec<String>>,
    temperature_2m_max: Option<Vec<Option<f64>>>,
    temperature_2m_min: Option<Vec<Option<f64>>>,
    precipitation_sum: Option<Vec<Option<f64>>>,
}
