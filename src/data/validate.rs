//! Input validation for forecast requests
//!
//! Checks that all fields are filled in, that the date lies between today and
//! one year from today, and that the country code is one we accept.

use chrono::{Months, NaiveDate};
use thiserror::Error;

use super::countries::{accepted_codes, is_known_code};
use super::ForecastQuery;

/// Date format accepted by the form and the command line
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// How far ahead a forecast may be requested
const MAX_MONTHS_AHEAD: u32 = 12;

/// Errors for the requested date
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    /// Text is not a `YYYY-MM-DD` calendar date
    #[error("Invalid date format: '{0}'. Please use YYYY-MM-DD.")]
    InvalidFormat(String),

    /// Date is before today
    #[error("The date cannot be in the past ({date} is before {today}).")]
    PastDate { date: NaiveDate, today: NaiveDate },

    /// Date is more than a year ahead
    #[error("The date is too far in the future. Maximum allowed: {max}.")]
    TooFarFuture { date: NaiveDate, max: NaiveDate },
}

/// Errors for the form input as a whole
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// One or more fields were left blank
    #[error("Provide all inputs: city, country, date. Missing: {}.", .0.join(", "))]
    InputMissing(Vec<&'static str>),

    /// The date failed validation
    #[error(transparent)]
    Date(#[from] DateError),

    /// The country code is not in the table
    #[error("Invalid country code: {code}. Accepted codes: {accepted}.", code = .0, accepted = accepted_codes())]
    UnknownCode(String),
}

/// Latest date a forecast may be requested for, given today
///
/// Adding twelve calendar months clamps Feb 29 to Feb 28 in non-leap years.
pub fn max_forecast_date(today: NaiveDate) -> NaiveDate {
    today
        .checked_add_months(Months::new(MAX_MONTHS_AHEAD))
        .unwrap_or(NaiveDate::MAX)
}

/// Parses and range-checks a `YYYY-MM-DD` date against `today`
///
/// # Returns
/// * `Ok(NaiveDate)` if the date is between today and one year ahead, inclusive
/// * `Err(DateError)` otherwise
pub fn validate_date(text: &str, today: NaiveDate) -> Result<NaiveDate, DateError> {
    let text = text.trim();
    let date = NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map_err(|_| DateError::InvalidFormat(text.to_string()))?;

    if date < today {
        return Err(DateError::PastDate { date, today });
    }

    let max = max_forecast_date(today);
    if date > max {
        return Err(DateError::TooFarFuture { date, max });
    }

    Ok(date)
}

/// Checks that `code` is one of the accepted phone country codes
pub fn validate_country_code(code: &str) -> Result<(), ValidationError> {
    if is_known_code(code) {
        Ok(())
    } else {
        Err(ValidationError::UnknownCode(code.to_string()))
    }
}

/// Validates raw form input into a [`ForecastQuery`]
///
/// Fields are trimmed first. Checks run in order: blanks, date, country code.
/// The first failure is returned.
pub fn validate_query(
    city: &str,
    country: &str,
    date: &str,
    today: NaiveDate,
) -> Result<ForecastQuery, ValidationError> {
    let (city, country, date) = (city.trim(), country.trim(), date.trim());

    let missing: Vec<&'static str> = [("city", city), ("country", country), ("date", date)]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::InputMissing(missing));
    }

    let date = validate_date(date, today)?;
    validate_country_code(country)?;

    Ok(ForecastQuery {
        city: city.to_string(),
        country_code: country.to_string(),
        date,
    })
}
