//! Combining forecasts from two providers

use super::Forecast;

/// Mean of two optional readings; a missing side falls back to the other
fn average(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some((a + b) / 2.0),
        (a, b) => a.or(b),
    }
}

/// Merges two provider forecasts into one
///
/// - both absent: a zero-filled forecast
/// - one absent: the other, unchanged
/// - both present: field-wise mean, where a field missing on one side takes the
///   other side's value instead of counting as zero
pub fn merge(first: Option<Forecast>, second: Option<Forecast>) -> Forecast {
    match (first, second) {
        (None, None) => Forecast::zeroed(),
        (Some(only), None) | (None, Some(only)) => only,
        (Some(a), Some(b)) => Forecast {
            max_temp: average(a.max_temp, b.max_temp),
            min_temp: average(a.min_temp, b.min_temp),
            precipitation: average(a.precipitation, b.precipitation),
        },
    }
}
