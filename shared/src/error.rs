use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorSeverity {
    /// Expected to clear up on its own; the session keeps running.
    Transient,
    /// Ends the current acquisition session.
    Permanent,
}

/// Failures reported by the location source, plus the synthetic timeout.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LocationError {
    #[error("location is currently unknown")]
    Unavailable,

    #[error("location access denied")]
    PermissionDenied,

    #[error("no usable location fix within {seconds} seconds")]
    TimedOut { seconds: u64 },

    #[error("location source failed ({code}): {message}")]
    Other { code: i64, message: String },
}

impl LocationError {
    #[must_use]
    pub fn other(code: i64, message: impl Into<String>) -> Self {
        Self::Other {
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Unavailable => "LOCATION_UNAVAILABLE",
            Self::PermissionDenied => "LOCATION_PERMISSION_DENIED",
            Self::TimedOut { .. } => "LOCATION_TIMEOUT",
            Self::Other { .. } => "LOCATION_ERROR",
        }
    }

    #[must_use]
    pub const fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Unavailable => ErrorSeverity::Transient,
            Self::PermissionDenied | Self::TimedOut { .. } | Self::Other { .. } => {
                ErrorSeverity::Permanent
            }
        }
    }

    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self.severity(), ErrorSeverity::Transient)
    }

    #[must_use]
    pub const fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied)
    }
}

/// Reverse geocoding never ends a session; these only change the address line.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GeocodeError {
    #[error("no address found for this location")]
    NoResults,

    #[error("reverse geocoding failed: {message}")]
    Failed { message: String },
}

impl GeocodeError {
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NoResults => "GEOCODE_NO_RESULTS",
            Self::Failed { .. } => "GEOCODE_FAILED",
        }
    }

    /// An empty answer is not a failure of the lookup itself.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CoordinateError {
    #[error("Latitude {0} is out of valid range [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("Longitude {0} is out of valid range [-180, 180]")]
    LongitudeOutOfRange(f64),
    #[error("Coordinate value is not finite (NaN or Infinity)")]
    NonFinite,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_unknown_location_is_transient() {
        assert!(LocationError::Unavailable.is_transient());
        assert!(!LocationError::PermissionDenied.is_transient());
        assert!(!LocationError::TimedOut { seconds: 60 }.is_transient());
        assert!(!LocationError::other(2, "network").is_transient());
    }

    #[test]
    fn empty_geocode_result_is_not_a_failure() {
        assert!(!GeocodeError::NoResults.is_failure());
        assert!(GeocodeError::failed("offline").is_failure());
    }

    #[test]
    fn timeout_message_names_the_budget() {
        let err = LocationError::TimedOut { seconds: 60 };
        assert_eq!(err.to_string(), "no usable location fix within 60 seconds");
        assert_eq!(err.code(), "LOCATION_TIMEOUT");
    }
}
