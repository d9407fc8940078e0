use reqwest::StatusCode;
use thiserror::Error;

/// Failure to obtain a forecast for a destination.
#[derive(Debug, Error)]
pub enum ForecastError {
    /// The request never produced a response (connection, timeout, ...).
    #[error("Request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The provider answered with a non-success status.
    #[error("{url} returned status {status}: {body}")]
    Status { url: String, status: StatusCode, body: String },

    /// The response body was not the expected forecast document.
    #[error("Failed to parse forecast response: {0}")]
    Parse(String),

    #[error("Invalid coordinates ({latitude}, {longitude}): latitude must be -90 to 90, longitude must be -180 to 180")]
    InvalidCoordinates { latitude: f64, longitude: f64 },
}

impl ForecastError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request { .. } => true,
            Self::Status { status, .. } => {
                status.is_server_error()
                    || *status == StatusCode::TOO_MANY_REQUESTS
                    || *status == StatusCode::REQUEST_TIMEOUT
            }
            Self::Parse(_) | Self::InvalidCoordinates { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: u16) -> ForecastError {
        ForecastError::Status {
            url: "http://x".into(),
            status: StatusCode::from_u16(code).unwrap(),
            body: String::new(),
        }
    }

    #[test]
    fn server_errors_and_throttling_are_retryable() {
        for code in [500, 502, 503, 504, 429, 408] {
            assert!(status(code).is_retryable(), "{code} should be retryable");
        }
    }

    #[test]
    fn client_errors_are_not_retryable() {
        for code in [400, 401, 404] {
            assert!(!status(code).is_retryable(), "{code} should not be retryable");
        }
        assert!(!ForecastError::Parse("bad".into()).is_retryable());
    }

    #[test]
    fn invalid_coordinates_message() {
        let err = ForecastError::InvalidCoordinates { latitude: 91.0, longitude: 0.0 };
        assert!(err.to_string().contains("latitude must be -90 to 90"));
    }
}
