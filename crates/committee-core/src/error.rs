//! Engine Errors

use thiserror::Error;

/// Errors raised while assembling a committee.
///
/// Nothing in the engine fails once a [`crate::Simulation`] has been built;
/// every check happens at construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommitteeError {
    /// Counts or lengths that do not line up
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A value outside its valid numeric domain
    #[error("domain error: {field} = {value} is outside {expected}")]
    Domain {
        field: String,
        value: f64,
        expected: &'static str,
    },
}

impl CommitteeError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        CommitteeError::Configuration(message.into())
    }

    pub(crate) fn unit_interval(field: impl Into<String>, value: f64) -> Self {
        CommitteeError::Domain {
            field: field.into(),
            value,
            expected: "[0, 1]",
        }
    }
}

/// Checks that a scalar parameter lies in [0, 1].
pub(crate) fn check_unit(field: impl Into<String>, value: f64) -> Result<f64, CommitteeError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(CommitteeError::unit_interval(field, value))
    }
}
