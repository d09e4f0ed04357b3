//! Static table of accepted phone country codes
//!
//! The form asks for a country as its international dialling code. Only the
//! codes listed here are accepted; the names are used for display.

/// Accepted phone country codes and the countries they stand for
pub static COUNTRY_CODES: [(&str, &str); 5] = [
    ("1", "United States/Canada"),
    ("91", "India"),
    ("44", "United Kingdom"),
    ("86", "China"),
    ("7", "Russia"),
];

/// Look up the country name for a phone code
///
/// The match is exact: no trimming, no leading `+`.
pub fn country_name(code: &str) -> Option<&'static str> {
    COUNTRY_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Returns true if `code` is a key of [`COUNTRY_CODES`]
pub fn is_known_code(code: &str) -> bool {
    country_name(code).is_some()
}

/// Comma-separated list of accepted codes, for hints and error messages
pub fn accepted_codes() -> String {
    COUNTRY_CODES
        .iter()
        .map(|(code, _)| *code)
        .collect::<Vec<_>>()
        .join(", ")
}
