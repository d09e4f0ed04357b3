//! Core data models for dualcast
//!
//! This module contains the forecast and location types shared by the
//! provider clients, plus the traits the forecast pipeline is written against.

pub mod countries;
pub mod geocode;
pub mod icon;
pub mod merge;
pub mod open_meteo;
pub mod openweathermap;
pub mod validate;

pub use countries::{country_name, COUNTRY_CODES};
pub use geocode::GeocodingClient;
pub use icon::WeatherIcon;
pub use merge::merge;
pub use open_meteo::OpenMeteoClient;
pub use openweathermap::OpenWeatherMapClient;
pub use validate::{
    validate_country_code, validate_date, validate_query, DateError, ValidationError,
};

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Daily weather summary for one location and date
///
/// `None` marks a value that could not be obtained. It is never the same
/// thing as `Some(0.0)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    /// Maximum temperature in Celsius
    pub max_temp: Option<f64>,
    /// Minimum temperature in Celsius
    pub min_temp: Option<f64>,
    /// Precipitation in millimetres
    pub precipitation: Option<f64>,
}

impl Forecast {
    /// Creates a forecast with every field present
    pub fn new(max_temp: f64, min_temp: f64, precipitation: f64) -> Self {
        Self {
            max_temp: Some(max_temp),
            min_temp: Some(min_temp),
            precipitation: Some(precipitation),
        }
    }

    /// A forecast with every field present and set to zero
    pub fn zeroed() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Returns true if no field carries a value
    pub fn is_empty(&self) -> bool {
        self.max_temp.is_none() && self.min_temp.is_none() && self.precipitation.is_none()
    }
}

/// A geographic position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude coordinate
    pub latitude: f64,
    /// Longitude coordinate
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Input that passed validation and is ready to be looked up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastQuery {
    /// City name as typed, trimmed
    pub city: String,
    /// Phone country code, known to be in [`COUNTRY_CODES`]
    pub country_code: String,
    /// Requested forecast date
    pub date: NaiveDate,
}

/// Errors that can occur when talking to a weather or geocoding provider
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Provider answered with a non-success status
    #[error("Provider returned {status}: {reason}")]
    Rejected { status: u16, reason: String },

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Missing expected field in response
    #[error("Missing expected field in response: {0}")]
    MissingField(String),

    /// Provider has no entry for the requested day
    #[error("No data for {0}")]
    NoDataForDate(NaiveDate),

    /// Provider needs an API key and none was configured
    #[error("No API key configured")]
    MissingApiKey,
}

/// Resolves a place name to coordinates
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Looks up the first match for `city` in `country`
    ///
    /// Returns `Ok(None)` when the provider knows no such place.
    async fn locate(&self, city: &str, country: &str) -> Result<Option<Coordinates>, FetchError>;
}

/// A weather provider that can produce a daily [`Forecast`]
#[async_trait]
pub trait ForecastSource: Send + Sync {
    /// Short provider name used in logs and in the report
    fn name(&self) -> &'static str;

    /// Fetches the forecast for `date` at `coordinates`
    async fn fetch(&self, coordinates: Coordinates, date: NaiveDate)
        -> Result<Forecast, FetchError>;
}

/// Reads a short, human-readable reason out of a provider error body
///
/// Open-Meteo uses `reason`, OpenWeatherMap uses `message`.
pub(crate) fn error_reason(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        reason: Option<String>,
        message: Option<String>,
    }

    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.reason.or(b.message))
        .unwrap_or_else(|| body.trim().chars().take(200).collect())
}

/// Turns a non-success response into [`FetchError::Rejected`], passing successes through
pub(crate) async fn check_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, FetchError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let reason = match response.text().await {
        Ok(body) => error_reason(&body),
        Err(err) => {
            debug!(error = %err, "Could not read error body");
            String::new()
        }
    };
    let reason = if reason.is_empty() {
        status.canonical_reason().unwrap_or("Unknown status").to_string()
    } else {
        reason
    };
    Err(FetchError::Rejected {
        status: status.as_u16(),
        reason,
    })
}
