//! Tracking-number input handling
//!
//! User input is trimmed and uppercased before it is checked against the
//! catalog, which matches case-sensitively.

use parcel_tracker::RouteCatalog;

/// Why a tracking-number input was rejected. The display text is shown to
/// the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("Enter a tracking number")]
    Empty,

    #[error("Not found in demo. Use one of the sample numbers.")]
    Unknown(String),
}

/// Trim and uppercase raw input
pub fn normalize(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Normalize `raw` and accept it only if the catalog knows it
pub fn parse_tracking_input(raw: &str, catalog: &RouteCatalog) -> Result<String, InputError> {
    let tracking_number = normalize(raw);
    if tracking_number.is_empty() {
        return Err(InputError::Empty);
    }
    if !catalog.contains(&tracking_number) {
        return Err(InputError::Unknown(tracking_number));
    }
    Ok(tracking_number)
}
