//! Weather icon selection from precipitation

use serde::{Deserialize, Serialize};

/// Upper bound (inclusive) of precipitation shown as cloudy, in mm
const CLOUDY_MAX_MM: f64 = 2.0;

/// Upper bound (inclusive) of precipitation shown as rain, in mm
const RAIN_MAX_MM: f64 = 10.0;

/// Icon categories for the forecast panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeatherIcon {
    Clear,
    Cloudy,
    Rain,
    Snow,
}

impl WeatherIcon {
    /// Picks an icon from the precipitation amount in mm
    ///
    /// Thresholds: 0 → clear, (0, 2] → cloudy, (2, 10] → rain, above 10 → snow.
    /// Negative amounts count as dry.
    pub fn for_precipitation(mm: f64) -> Self {
        if mm <= 0.0 {
            WeatherIcon::Clear
        } else if mm <= CLOUDY_MAX_MM {
            WeatherIcon::Cloudy
        } else if mm <= RAIN_MAX_MM {
            WeatherIcon::Rain
        } else {
            WeatherIcon::Snow
        }
    }

    /// Terminal symbol for the icon
    pub fn symbol(&self) -> &'static str {
        match self {
            WeatherIcon::Clear => "\u{2600}",   // ☀
            WeatherIcon::Cloudy => "\u{2601}",  // ☁
            WeatherIcon::Rain => "\u{1F327}",   // 🌧
            WeatherIcon::Snow => "\u{2744}",    // ❄
        }
    }

    /// Lowercase label for the icon
    pub fn label(&self) -> &'static str {
        match self {
            WeatherIcon::Clear => "clear",
            WeatherIcon::Cloudy => "cloudy",
            WeatherIcon::Rain => "rain",
            WeatherIcon::Snow => "snow",
        }
    }
}
