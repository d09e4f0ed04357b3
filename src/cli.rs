//! Command-line interface parsing for dualcast
//!
//! This module handles parsing of CLI arguments using clap. With all of
//! `--city`, `--country` and `--date` given, dualcast prints one forecast and
//! exits; otherwise it opens the interactive form, prefilled with whatever
//! was passed.

use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// An option was given an empty value
    #[error("Empty value for --{0}")]
    EmptyValue(&'static str),
}

/// dualcast - average daily forecasts from two weather providers
#[derive(Parser, Debug)]
#[command(name = "dualcast")]
#[command(about = "Averaged daily weather forecast for a city and date")]
#[command(version)]
pub struct Cli {
    /// City to forecast
    #[arg(long)]
    pub city: Option<String>,

    /// Phone country code of the city (1, 91, 44, 86 or 7)
    #[arg(long, value_name = "CODE")]
    pub country: Option<String>,

    /// Date to forecast, YYYY-MM-DD, from today up to one year ahead
    ///
    /// Examples:
    ///   dualcast --city Bengaluru --country 91 --date 2026-10-20
    ///   dualcast --city London              # opens the form with the city filled in
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub date: Option<String>,

    /// OpenWeatherMap API key; without one only Open-Meteo is used
    #[arg(long, env = "OPENWEATHERMAP_API_KEY", hide_env_values = true)]
    pub owm_api_key: Option<String>,

    /// Write logs of the interactive form here instead of the data directory
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// Values to prefill in the interactive form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormPrefill {
    pub city: String,
    pub country: String,
    pub date: String,
}

/// How the program should run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// Open the terminal form
    Interactive(FormPrefill),
    /// Compute a single forecast and print it
    OneShot {
        city: String,
        country: String,
        date: String,
    },
}

impl Default for RunMode {
    fn default() -> Self {
        RunMode::Interactive(FormPrefill::default())
    }
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, Default)]
pub struct StartupConfig {
    /// Interactive or one-shot
    pub mode: RunMode,
    /// Key for the OpenWeatherMap provider
    pub openweathermap_api_key: Option<String>,
    /// Log file override for interactive mode
    pub log_file: Option<PathBuf>,
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Arguments
    /// * `cli` - The parsed CLI struct
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with the run mode and provider settings
    /// * `Err(CliError)` if `--city`, `--country` or `--date` was passed a blank value
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let query_flags = [
            ("city", &cli.city),
            ("country", &cli.country),
            ("date", &cli.date),
        ];
        for (name, value) in query_flags {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(CliError::EmptyValue(name));
            }
        }

        let mode = match (&cli.city, &cli.country, &cli.date) {
            (Some(city), Some(country), Some(date)) => RunMode::OneShot {
                city: city.clone(),
                country: country.clone(),
                date: date.clone(),
            },
            (city, country, date) => RunMode::Interactive(FormPrefill {
                city: city.clone().unwrap_or_default(),
                country: country.clone().unwrap_or_default(),
                date: date.clone().unwrap_or_default(),
            }),
        };

        Ok(StartupConfig {
            mode,
            openweathermap_api_key: cli
                .owm_api_key
                .clone()
                .filter(|key| !key.trim().is_empty()),
            log_file: cli.log_file.clone(),
        })
    }

    /// True when the forecast is printed instead of shown in the form
    pub fn is_one_shot(&self) -> bool {
        matches!(self.mode, RunMode::OneShot { .. })
    }
}
