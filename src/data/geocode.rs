//! Open-Meteo geocoding API client
//!
//! Resolves a city name plus a free-text country filter to coordinates using
//! the first search result.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{check_status, Coordinates, FetchError, Geocoder};

/// Base URL for the Open-Meteo geocoding API
const GEOCODING_BASE_URL: &str = "https://geocoding-api.open-meteo.com";

/// Search endpoint, relative to the base URL
const SEARCH_PATH: &str = "/v1/search";

/// Client for looking up coordinates by place name
#[derive(Debug, Clone)]
pub struct GeocodingClient {
    client: Client,
    base_url: String,
}

impl Default for GeocodingClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GeocodingClient {
    /// Create a new GeocodingClient against the public endpoint
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    /// Create a new GeocodingClient with a custom HTTP client
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            base_url: GEOCODING_BASE_URL.to_string(),
        }
    }

    /// Point the client at another host (mock servers, mirrors)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Look up the first match for `city`, filtered by `country`
    ///
    /// # Returns
    /// * `Ok(Some(Coordinates))` - Position of the first result
    /// * `Ok(None)` - The provider returned no results
    /// * `Err(FetchError)` - If the request or parsing fails
    pub async fn search(
        &self,
        city: &str,
        country: &str,
    ) -> Result<Option<Coordinates>, FetchError> {
        debug!(city, country, "Geocoding city");

        let response = self
            .client
            .get(format!("{}{}", self.base_url, SEARCH_PATH))
            .query(&[("name", city), ("country", country)])
            .send()
            .await?;
        let text = check_status(response).await?.text().await?;
        let api_response: GeocodingResponse = serde_json::from_str(&text)?;

        parse_response(api_response)
    }
}

#[async_trait]
impl Geocoder for GeocodingClient {
    async fn locate(&self, city: &str, country: &str) -> Result<Option<Coordinates>, FetchError> {
        self.search(city, country).await
    }
}

/// Take the first result's position, if there is one
fn parse_response(response: GeocodingResponse) -> Result<Option<Coordinates>, FetchError> {
    let Some(first) = response.results.unwrap_or_default().into_iter().next() else {
        return Ok(None);
    };

    let latitude = first
        .latitude
        .ok_or_else(|| FetchError::MissingField("results[0].latitude".to_string()))?;
    let longitude = first
        .longitude
        .ok_or_else(|| FetchError::MissingField("results[0].longitude".to_string()))?;

    debug!(
        place = first.name.as_deref().unwrap_or("?"),
        latitude, longitude, "Geocoded city"
    );
    Ok(Some(Coordinates::new(latitude, longitude)))
}

/// Geocoding API response structure
///
/// `results` is left out entirely when nothing matches.
#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    results: Option<Vec<GeocodingResult>>,
}

/// A single search hit
#[derive(Debug, Deserialize)]
struct GeocodingResult {
    name: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}
