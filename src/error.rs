use thiserror::Error;

use crate::models::Intent;

/// Errors that are allowed to surface past the data-access facade.
///
/// Upstream unavailability and malformed payloads never appear here: those
/// are recovered inside the facade by substituting synthetic data. What
/// remains is the handful of conditions the caller can actually act on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MarketQueryError {
    #[error("no data handler for intent '{}'", .0.as_str())]
    UnsupportedIntent(Intent),

    #[error("need at least two data points to compute statistics")]
    InsufficientData,

    #[error("series contained no numeric values")]
    InvalidSeries,

    #[error("country '{0}' is not in the fuel-profile registry")]
    UnknownCountry(String),

    #[error("no recent benchmark price available")]
    NoRecentData,

    #[error("'{0}' is not a valid ISO date")]
    BadDate(String),
}
