//! Forecast pipeline
//!
//! Validates raw input, geocodes the city, asks both providers in turn and
//! merges what they return. Nothing here touches the terminal; both shells
//! call [`ForecastPipeline::compute_forecast`] and render the result.

use chrono::{Local, NaiveDate};
use thiserror::Error;
use tracing::{info, warn};

use crate::data::{
    merge, validate_query, Coordinates, FetchError, Forecast, ForecastQuery,
    ForecastSource, Geocoder, GeocodingClient, OpenMeteoClient, OpenWeatherMapClient,
    ValidationError, WeatherIcon,
};

/// Errors that stop a forecast request
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Input did not pass validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The city could not be turned into coordinates
    #[error("Could not find coordinates for '{city}, {country}'.")]
    LookupFailed {
        city: String,
        country: String,
        /// `None` when the provider simply had no match
        cause: Option<FetchError>,
    },

    /// Neither provider returned a forecast
    #[error("No forecast available.")]
    NoForecast {
        source_a: SourceFailure,
        source_b: SourceFailure,
    },
}

impl ForecastError {
    /// Heading for the notice shown to the user
    pub fn title(&self) -> &'static str {
        match self {
            ForecastError::Validation(ValidationError::InputMissing(_)) => "Input Error",
            ForecastError::Validation(ValidationError::Date(_)) => "Date Error",
            ForecastError::Validation(ValidationError::UnknownCode(_)) => "Country Code Error",
            ForecastError::LookupFailed { .. } => "Location Error",
            ForecastError::NoForecast { .. } => "No Forecast",
        }
    }
}

/// Why a named provider produced nothing
#[derive(Debug)]
pub struct SourceFailure {
    /// Provider name
    pub source: &'static str,
    pub error: FetchError,
}

/// What one provider produced for a request
#[derive(Debug)]
pub struct SourceOutcome {
    /// Provider name
    pub source: &'static str,
    /// The provider's forecast, or why there is none
    pub result: Result<Forecast, FetchError>,
}

impl SourceOutcome {
    /// The forecast if the provider delivered one
    pub fn forecast(&self) -> Option<Forecast> {
        self.result.as_ref().ok().copied()
    }
}

/// Result of a successful forecast request
#[derive(Debug)]
pub struct ForecastReport {
    /// The validated request
    pub query: ForecastQuery,
    /// Where the city was found
    pub coordinates: Coordinates,
    /// Merged forecast
    pub forecast: Forecast,
    /// Icon for the merged precipitation; `None` when precipitation is unknown
    pub icon: Option<WeatherIcon>,
    /// Outcome of the first provider
    pub source_a: SourceOutcome,
    /// Outcome of the second provider
    pub source_b: SourceOutcome,
}

impl ForecastReport {
    /// Outcomes of both providers, in request order
    pub fn sources(&self) -> [&SourceOutcome; 2] {
        [&self.source_a, &self.source_b]
    }
}

/// Geocoder plus two forecast providers
pub struct ForecastPipeline {
    geocoder: Box<dyn Geocoder>,
    source_a: Box<dyn ForecastSource>,
    source_b: Box<dyn ForecastSource>,
}

impl ForecastPipeline {
    /// Create a pipeline from any geocoder and pair of providers
    pub fn new(
        geocoder: Box<dyn Geocoder>,
        source_a: Box<dyn ForecastSource>,
        source_b: Box<dyn ForecastSource>,
    ) -> Self {
        Self {
            geocoder,
            source_a,
            source_b,
        }
    }

    /// Create a pipeline against the public Open-Meteo and OpenWeatherMap APIs
    pub fn with_public_apis(openweathermap_api_key: Option<String>) -> Self {
        Self::new(
            Box::new(GeocodingClient::new()),
            Box::new(OpenMeteoClient::new()),
            Box::new(OpenWeatherMapClient::new(openweathermap_api_key)),
        )
    }

    /// Validate, geocode, fetch and merge, using today's local date
    pub async fn compute_forecast(
        &self,
        city: &str,
        country: &str,
        date: &str,
    ) -> Result<ForecastReport, ForecastError> {
        self.compute_forecast_on(city, country, date, Local::now().date_naive())
            .await
    }

    /// Same as [`compute_forecast`](Self::compute_forecast) with an explicit "today"
    ///
    /// Providers are queried one after the other. A provider failure is
    /// logged and recorded in the report; only when both fail is the request
    /// an error.
    pub async fn compute_forecast_on(
        &self,
        city: &str,
        country: &str,
        date: &str,
        today: NaiveDate,
    ) -> Result<ForecastReport, ForecastError> {
        let query = validate_query(city, country, date, today)?;

        let coordinates = self.locate(&query).await?;

        let source_a = self.fetch_from(self.source_a.as_ref(), coordinates, query.date).await;
        let source_b = self.fetch_from(self.source_b.as_ref(), coordinates, query.date).await;

        let (source_a, source_b) = match (source_a, source_b) {
            (
                SourceOutcome {
                    source: name_a,
                    result: Err(a),
                },
                SourceOutcome {
                    source: name_b,
                    result: Err(b),
                },
            ) => {
                warn!(city = %query.city, date = %query.date, "Both providers failed");
                return Err(ForecastError::NoForecast {
                    source_a: SourceFailure {
                        source: name_a,
                        error: a,
                    },
                    source_b: SourceFailure {
                        source: name_b,
                        error: b,
                    },
                });
            }
            outcomes => outcomes,
        };

        let forecast = merge(source_a.forecast(), source_b.forecast());
        let icon = forecast.precipitation.map(WeatherIcon::for_precipitation);

        info!(
            city = %query.city,
            date = %query.date,
            max_temp = ?forecast.max_temp,
            min_temp = ?forecast.min_temp,
            precipitation = ?forecast.precipitation,
            "Forecast computed"
        );

        Ok(ForecastReport {
            query,
            coordinates,
            forecast,
            icon,
            source_a,
            source_b,
        })
    }

    /// Geocode the query, turning "no match" and failures into `LookupFailed`
    async fn locate(&self, query: &ForecastQuery) -> Result<Coordinates, ForecastError> {
        let lookup_failed = |cause| ForecastError::LookupFailed {
            city: query.city.clone(),
            country: query.country_code.clone(),
            cause,
        };

        match self.geocoder.locate(&query.city, &query.country_code).await {
            Ok(Some(coordinates)) => Ok(coordinates),
            Ok(None) => {
                warn!(city = %query.city, country = %query.country_code, "No geocoding results");
                Err(lookup_failed(None))
            }
            Err(err) => {
                warn!(city = %query.city, country = %query.country_code, error = %err, "Geocoding failed");
                Err(lookup_failed(Some(err)))
            }
        }
    }

    /// Fetch from one provider; a forecast with every field absent counts as no data
    async fn fetch_from(
        &self,
        source: &dyn ForecastSource,
        coordinates: Coordinates,
        date: NaiveDate,
    ) -> SourceOutcome {
        let result = match source.fetch(coordinates, date).await {
            Ok(forecast) if forecast.is_empty() => Err(FetchError::NoDataForDate(date)),
            other => other,
        };
        if let Err(err) = &result {
            warn!(source = source.name(), error = %err, "Forecast fetch failed");
        }
        SourceOutcome {
            source: source.name(),
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DateError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FixedGeocoder(Option<Coordinates>);

    #[async_trait]
    impl Geocoder for FixedGeocoder {
        async fn locate(&self, _: &str, _: &str) -> Result<Option<Coordinates>, FetchError> {
            Ok(self.0)
        }
    }

    struct FailingGeocoder;

    #[async_trait]
    impl Geocoder for FailingGeocoder {
        async fn locate(&self, _: &str, _: &str) -> Result<Option<Coordinates>, FetchError> {
            Err(FetchError::Rejected {
                status: 503,
                reason: "maintenance".to_string(),
            })
        }
    }

    /// Returns a fixed forecast, or NoDataForDate when `None`, and counts calls
    struct FixedSource {
        forecast: Option<Forecast>,
        calls: Arc<AtomicUsize>,
    }

    impl FixedSource {
        fn boxed(forecast: Option<Forecast>) -> Box<dyn ForecastSource> {
            Box::new(Self {
                forecast,
                calls: Arc::new(AtomicUsize::new(0)),
            })
        }
    }

    #[async_trait]
    impl ForecastSource for FixedSource {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn fetch(&self, _: Coordinates, date: NaiveDate) -> Result<Forecast, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.forecast.ok_or(FetchError::NoDataForDate(date))
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn pipeline(a: Option<Forecast>, b: Option<Forecast>) -> ForecastPipeline {
        ForecastPipeline::new(
            Box::new(FixedGeocoder(Some(Coordinates::new(12.9, 77.6)))),
            FixedSource::boxed(a),
            FixedSource::boxed(b),
        )
    }

    #[tokio::test]
    async fn test_identical_sources_merge_to_same_values() {
        let forecast = Forecast::new(30.0, 20.0, 0.0);
        let report = pipeline(Some(forecast), Some(forecast))
            .compute_forecast_on("Bengaluru", "91", "2026-10-20", today())
            .await
            .expect("Forecast should succeed");

        assert_eq!(report.forecast, forecast);
        assert_eq!(report.icon, Some(WeatherIcon::Clear));
        assert_eq!(report.coordinates, Coordinates::new(12.9, 77.6));
        assert_eq!(report.query.city, "Bengaluru");
    }

    #[tokio::test]
    async fn test_one_failed_source_uses_the_other() {
        let forecast = Forecast::new(12.0, 4.0, 7.0);
        let report = pipeline(None, Some(forecast))
            .compute_forecast_on("London", "44", "2026-10-20", today())
            .await
            .unwrap();

        assert_eq!(report.forecast, forecast);
        assert_eq!(report.icon, Some(WeatherIcon::Rain));
        assert!(matches!(
            report.source_a.result,
            Err(FetchError::NoDataForDate(_))
        ));
        assert!(report.source_b.result.is_ok());
    }

    #[tokio::test]
    async fn test_both_sources_failing_is_no_forecast() {
        let err = pipeline(None, None)
            .compute_forecast_on("London", "44", "2026-10-20", today())
            .await
            .unwrap_err();

        assert_eq!(err.title(), "No Forecast");
        match err {
            ForecastError::NoForecast { source_a, source_b } => {
                assert_eq!(source_a.source, "fixed");
                assert!(matches!(source_a.error, FetchError::NoDataForDate(_)));
                assert!(matches!(source_b.error, FetchError::NoDataForDate(_)));
            }
            other => panic!("Expected NoForecast, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_all_absent_values_count_as_no_data() {
        let err = pipeline(Some(Forecast::default()), None)
            .compute_forecast_on("London", "44", "2026-10-20", today())
            .await
            .unwrap_err();

        match err {
            ForecastError::NoForecast { source_a, .. } => {
                assert!(matches!(source_a.error, FetchError::NoDataForDate(_)));
            }
            other => panic!("Expected NoForecast, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_all_absent_source_is_recorded_as_failed() {
        let forecast = Forecast::new(18.0, 9.0, 1.0);
        let report = pipeline(Some(Forecast::default()), Some(forecast))
            .compute_forecast_on("London", "44", "2026-10-20", today())
            .await
            .unwrap();

        assert_eq!(report.forecast, forecast);
        assert!(report.source_a.result.is_err());
    }

    #[tokio::test]
    async fn test_genuine_zero_forecast_is_reported() {
        let zero = Forecast::zeroed();
        let report = pipeline(Some(zero), None)
            .compute_forecast_on("Moscow", "7", "2026-10-20", today())
            .await
            .expect("A real zero forecast is still a forecast");
        assert_eq!(report.forecast, zero);
    }

    #[tokio::test]
    async fn test_unknown_precipitation_has_no_icon() {
        let forecast = Forecast {
            max_temp: Some(10.0),
            min_temp: Some(2.0),
            precipitation: None,
        };
        let report = pipeline(Some(forecast), None)
            .compute_forecast_on("Beijing", "86", "2026-10-20", today())
            .await
            .unwrap();
        assert_eq!(report.icon, None);
    }

    #[tokio::test]
    async fn test_validation_runs_before_any_lookup() {
        let calls = Arc::new(AtomicUsize::new(0));
        let pipeline = ForecastPipeline::new(
            Box::new(FixedGeocoder(Some(Coordinates::new(0.0, 0.0)))),
            Box::new(FixedSource {
                forecast: Some(Forecast::zeroed()),
                calls: calls.clone(),
            }),
            FixedSource::boxed(None),
        );

        let err = pipeline
            .compute_forecast_on("Paris", "33", "2026-10-20", today())
            .await
            .unwrap_err();
        assert_eq!(err.title(), "Country Code Error");

        let err = pipeline
            .compute_forecast_on("Paris", "1", "2026-10-01", today())
            .await
            .unwrap_err();
        assert_eq!(err.title(), "Date Error");
        assert!(matches!(
            err,
            ForecastError::Validation(ValidationError::Date(DateError::PastDate { .. }))
        ));

        let err = pipeline
            .compute_forecast_on("", "1", "2026-10-20", today())
            .await
            .unwrap_err();
        assert_eq!(err.title(), "Input Error");

        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_no_geocoding_result_is_lookup_failure() {
        let pipeline = ForecastPipeline::new(
            Box::new(FixedGeocoder(None)),
            FixedSource::boxed(Some(Forecast::zeroed())),
            FixedSource::boxed(Some(Forecast::zeroed())),
        );
        let err = pipeline
            .compute_forecast_on("Atlantis", "1", "2026-10-20", today())
            .await
            .unwrap_err();

        assert_eq!(err.title(), "Location Error");
        assert_eq!(
            err.to_string(),
            "Could not find coordinates for 'Atlantis, 1'."
        );
        assert!(matches!(err, ForecastError::LookupFailed { cause: None, .. }));
    }

    #[tokio::test]
    async fn test_geocoder_failure_keeps_cause() {
        let pipeline = ForecastPipeline::new(
            Box::new(FailingGeocoder),
            FixedSource::boxed(Some(Forecast::zeroed())),
            FixedSource::boxed(Some(Forecast::zeroed())),
        );
        let err = pipeline
            .compute_forecast_on("Delhi", "91", "2026-10-20", today())
            .await
            .unwrap_err();

        match err {
            ForecastError::LookupFailed {
                cause: Some(FetchError::Rejected { status, .. }),
                ..
            } => assert_eq!(status, 503),
            other => panic!("Expected LookupFailed with cause, got {:?}", other),
        }
    }
}
