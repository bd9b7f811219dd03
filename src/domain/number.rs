//! Numeric parsing for form fields and spreadsheet cells.
//!
//! Two flavors exist because the CRM forms and the import pipeline disagree:
//! forms accept a numeric prefix ("1500 EUR" is 1500), while spreadsheet
//! transforms want the whole cell to be a number.

use once_cell::sync::Lazy;
use regex::Regex;

static NUMERIC_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").expect("valid regex")
});

/// Parse the longest numeric prefix of `input`, falling back to 0.
///
/// # Example
///
/// ```
/// use crm_mcp_server::domain::parse_number_lenient;
///
/// assert_eq!(parse_number_lenient("1500 EUR"), 1500.0);
/// assert_eq!(parse_number_lenient("abc"), 0.0);
/// ```
pub fn parse_number_lenient(input: &str) -> f64 {
    NUMERIC_PREFIX
        .find(input)
        .and_then(|m| m.as_str().trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Parse the whole (trimmed) string as a number; anything else is 0.
pub fn parse_number_strict(input: &str) -> f64 {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}
