// Booking Core - Error Taxonomy
// Every failure here is recoverable: the aggregator degrades to a tax-free
// total and store operations report what was missing. Checkout is never
// hard-blocked by a tax or lookup failure.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum BookingError {
    /// Bad caller input: negative subtotal, zero nights, incomplete context.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// The tax context could not be resolved (unsupported jurisdiction).
    #[error("no tax rules for location '{location}'")]
    ResolutionFailure { location: String },

    /// A store lookup came up empty.
    #[error("{what} not found: {id}")]
    NotFound { what: &'static str, id: String },
}

impl BookingError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        BookingError::InvalidInput {
            reason: reason.into(),
        }
    }

    pub fn resolution_failure(location: impl Into<String>) -> Self {
        BookingError::ResolutionFailure {
            location: location.into(),
        }
    }

    pub fn not_found(what: &'static str, id: impl Into<String>) -> Self {
        BookingError::NotFound {
            what,
            id: id.into(),
        }
    }
}
