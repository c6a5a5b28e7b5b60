//! Error taxonomy for the calculator engine

use thiserror::Error;

/// Errors surfaced by calculator operations.
///
/// Variable-mode projections that differ between calls are not errors;
/// only rejected inputs and undefined math are reported here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("computation undefined: {0}")]
    ComputationUndefined(String),
}

impl CalcError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    pub fn undefined(reason: impl Into<String>) -> Self {
        Self::ComputationUndefined(reason.into())
    }
}

pub type Result<T> = std::result::Result<T, CalcError>;

/// Reject NaN and infinities for a required numeric field.
pub(crate) fn require_finite(field: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::invalid(field, format!("must be a finite number, got {}", value)))
    }
}

/// Require a finite, strictly positive value.
pub(crate) fn require_positive(field: &'static str, value: f64) -> Result<f64> {
    let value = require_finite(field, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(CalcError::invalid(field, format!("must be positive, got {}", value)))
    }
}

/// Require a finite, non-negative value.
pub(crate) fn require_non_negative(field: &'static str, value: f64) -> Result<f64> {
    let value = require_finite(field, value)?;
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(CalcError::invalid(field, format!("must not be negative, got {}", value)))
    }
}
