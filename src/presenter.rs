//! Text rendering of forecast reports
//!
//! Shared by the terminal form and the one-shot command line output.

use crate::data::{country_name, validate::DATE_FORMAT};
use crate::forecast::{ForecastError, ForecastReport};

/// Placeholder for a value that could not be obtained
const ABSENT: &str = "n/a";

/// Convert Celsius to Fahrenheit, rounded to two decimals
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    ((celsius * 9.0 / 5.0 + 32.0) * 100.0).round() / 100.0
}

/// Format a temperature as `"21.5°C (70.7°F)"`, or the absent marker
pub fn format_temperature(celsius: Option<f64>) -> String {
    match celsius {
        Some(c) => format!("{}°C ({}°F)", c, celsius_to_fahrenheit(c)),
        None => ABSENT.to_string(),
    }
}

/// Format precipitation as `"3.2 mm"`, or the absent marker
pub fn format_precipitation(mm: Option<f64>) -> String {
    match mm {
        Some(mm) => format!("{} mm", mm),
        None => ABSENT.to_string(),
    }
}

/// Heading line, e.g. `"Forecast for Bengaluru (India) on 2026-10-20:"`
pub fn heading(report: &ForecastReport) -> String {
    let query = &report.query;
    let date = query.date.format(DATE_FORMAT);
    match country_name(&query.country_code) {
        Some(country) => format!("Forecast for {} ({}) on {}:", query.city, country, date),
        None => format!("Forecast for {} on {}:", query.city, date),
    }
}

/// Body lines for a report: temperatures, precipitation, then provider notes
pub fn present(report: &ForecastReport) -> Vec<String> {
    let forecast = &report.forecast;
    let mut lines = vec![
        heading(report),
        format!("Max Temp: {}", format_temperature(forecast.max_temp)),
        format!("Min Temp: {}", format_temperature(forecast.min_temp)),
        format!("Precipitation: {}", format_precipitation(forecast.precipitation)),
    ];

    if let Some(icon) = report.icon {
        lines.push(format!("Sky: {} {}", icon.symbol(), icon.label()));
    }

    for outcome in report.sources() {
        if let Err(err) = &outcome.result {
            lines.push(format!("{}: unavailable ({})", outcome.source, err));
        }
    }

    lines
}

/// Lines describing a failed request
///
/// For `NoForecast` both provider causes are listed so an outage and a date
/// without data read differently.
pub fn present_error(err: &ForecastError) -> Vec<String> {
    let mut lines = vec![err.to_string()];
    match err {
        ForecastError::NoForecast { source_a, source_b } => {
            for failure in [source_a, source_b] {
                lines.push(format!("{}: {}", failure.source, failure.error));
            }
        }
        ForecastError::LookupFailed {
            cause: Some(cause), ..
        } => {
            lines.push(format!("Cause: {}", cause));
        }
        _ => {}
    }
    lines
}
