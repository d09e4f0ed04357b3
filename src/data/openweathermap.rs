//! OpenWeatherMap One Call client
//!
//! Queries the "timemachine" endpoint for a point in time on the requested
//! date. The endpoint reports a single temperature, which is used for both the
//! maximum and the minimum.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{check_status, Coordinates, FetchError, Forecast, ForecastSource};

/// Base URL for the OpenWeatherMap API
const OPENWEATHERMAP_BASE_URL: &str = "https://api.openweathermap.org";

/// Timemachine endpoint, relative to the base URL
const TIMEMACHINE_PATH: &str = "/data/2.5/onecall/timemachine";

/// Hour of day (UTC) used as the point in time for a requested date
const REQUEST_HOUR_UTC: i64 = 12;

/// Client for the OpenWeatherMap One Call API
#[derive(Clone)]
pub struct OpenWeatherMapClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    units: String,
}

impl fmt::Debug for OpenWeatherMapClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenWeatherMapClient")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("units", &self.units)
            .finish()
    }
}

impl OpenWeatherMapClient {
    /// Create a new client; without a key every fetch fails with `MissingApiKey`
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_client(Client::new(), api_key)
    }

    /// Create a new client with a custom HTTP client
    pub fn with_client(client: Client, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: OPENWEATHERMAP_BASE_URL.to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            units: "metric".to_string(),
        }
    }

    /// Point the client at another host (mock servers, proxies)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Fetch conditions for the given coordinates on `date`
    ///
    /// # Returns
    /// * `Ok(Forecast)` - Temperature and the last hour's rain (0 when not reported)
    /// * `Err(FetchError)` - If no key is set, the request or parsing fails,
    ///   or the response carries no temperature
    pub async fn fetch_conditions(
        &self,
        lat: f64,
        lon: f64,
        date: NaiveDate,
    ) -> Result<Forecast, FetchError> {
        let api_key = self.api_key.as_deref().ok_or(FetchError::MissingApiKey)?;
        let dt = request_timestamp(date);
        debug!(lat, lon, dt, "Requesting OpenWeatherMap conditions");

        let response = self
            .client
            .get(format!("{}{}", self.base_url, TIMEMACHINE_PATH))
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("dt", dt.to_string()),
                ("appid", api_key.to_string()),
                ("units", self.units.clone()),
            ])
            .send()
            .await?;
        let text = check_status(response).await?.text().await?;
        let api_response: TimemachineResponse = serde_json::from_str(&text)?;

        parse_response(api_response)
    }
}

#[async_trait]
impl ForecastSource for OpenWeatherMapClient {
    fn name(&self) -> &'static str {
        "OpenWeatherMap"
    }

    async fn fetch(
        &self,
        coordinates: Coordinates,
        date: NaiveDate,
    ) -> Result<Forecast, FetchError> {
        self.fetch_conditions(coordinates.latitude, coordinates.longitude, date)
            .await
    }
}

/// Unix timestamp sent as `dt` for a requested date (midday UTC)
pub fn request_timestamp(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp() + REQUEST_HOUR_UTC * 3600
}

/// Parse the timemachine response into a Forecast
fn parse_response(response: TimemachineResponse) -> Result<Forecast, FetchError> {
    let current = response
        .current
        .ok_or_else(|| FetchError::MissingField("current".to_string()))?;
    let temp = current
        .temp
        .ok_or_else(|| FetchError::MissingField("current.temp".to_string()))?;

    // The rain object is omitted on dry hours
    let precipitation = current
        .rain
        .and_then(|rain| rain.get("1h").copied())
        .unwrap_or(0.0);

    Ok(Forecast {
        max_temp: Some(temp),
        min_temp: Some(temp),
        precipitation: Some(precipitation),
    })
}

/// OpenWeatherMap timemachine response structure
#[derive(Debug, Deserialize)]
struct TimemachineResponse {
    current: Option<CurrentConditions>,
}

/// Conditions at the requested time
#[derive(Debug, Deserialize)]
struct CurrentConditions {
    temp: Option<f64>,
    /// Precipitation volume keyed by period, e.g. `{"1h": 0.4}`
    rain: Option<HashMap<String, f64>>,
}
