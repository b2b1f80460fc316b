//! Error taxonomy for a single tracking request

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

pub const CONFIGURATION_MISSING_MESSAGE: &str =
    "HMAC_TOKEN or RETAILER_MONIKER not set in the environment";
pub const GENERIC_FAILURE_MESSAGE: &str = "Error occurred while tracking order";

/// JSON body for failures that are not forwarded from the tracking API
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
}

impl ErrorBody {
    fn render(error: &'static str) -> String {
        serde_json::to_string(&ErrorBody { error })
            .unwrap_or_else(|_| format!("{{\"error\":\"{}\"}}", error))
    }
}

#[derive(Debug, Error)]
pub enum TrackError {
    #[error("{}", CONFIGURATION_MISSING_MESSAGE)]
    ConfigurationMissing,

    /// The tracking API answered with a top-level `errors` array
    #[error("tracking API reported errors: {errors}")]
    UpstreamReported { errors: Value },

    #[error("tracking API unavailable: {0:#}")]
    UpstreamUnavailable(anyhow::Error),

    #[error("malformed tracking API response: {0}")]
    MalformedResponse(String),

    #[error("tracking API returned unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("failed to sign request: {0}")]
    Signing(String),
}

impl TrackError {
    pub fn status_code(&self) -> u16 {
        match self {
            TrackError::ConfigurationMissing | TrackError::UpstreamReported { .. } => 400,
            TrackError::UpstreamUnavailable(_)
            | TrackError::MalformedResponse(_)
            | TrackError::UnexpectedStatus { .. }
            | TrackError::Signing(_) => 500,
        }
    }

    /// Body returned to the caller. Server-side failures never carry internal detail.
    pub fn client_body(&self) -> String {
        match self {
            TrackError::ConfigurationMissing => ErrorBody::render(CONFIGURATION_MISSING_MESSAGE),
            TrackError::UpstreamReported { errors } => errors.to_string(),
            _ => ErrorBody::render(GENERIC_FAILURE_MESSAGE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn configuration_missing_is_a_client_error() {
        let err = TrackError::ConfigurationMissing;
        assert_eq!(err.status_code(), 400);

        let body: Value = serde_json::from_str(&err.client_body()).unwrap();
        assert_eq!(body["error"], CONFIGURATION_MISSING_MESSAGE);
    }

    #[test]
    fn upstream_errors_are_passed_through() {
        let err = TrackError::UpstreamReported { errors: json!(["not found"]) };
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.client_body(), r#"["not found"]"#);
    }

    #[test]
    fn error_bodies_are_json_objects() {
        let body: Value = serde_json::from_str(&TrackError::UnexpectedStatus {
            status: 502,
            body: String::new(),
        }
        .client_body())
        .unwrap();
        assert_eq!(body, json!({ "error": GENERIC_FAILURE_MESSAGE }));
    }

    #[test]
    fn unexpected_status_keeps_upstream_body_for_logs() {
        let err = TrackError::UnexpectedStatus {
            status: 502,
            body: r#"{"message": "bad gateway"}"#.to_string(),
        };
        let logged = err.to_string();

        assert!(logged.contains("502"));
        assert!(logged.contains("bad gateway"));
        assert!(!err.client_body().contains("bad gateway"));
    }

    #[test]
    fn server_errors_hide_detail() {
        let errors = [
            TrackError::UpstreamUnavailable(anyhow::anyhow!("connection refused (os error 111)")),
            TrackError::MalformedResponse("expected value at line 1 column 1".to_string()),
            TrackError::UnexpectedStatus {
                status: 503,
                body: "upstream maintenance window".to_string(),
            },
            TrackError::Signing("invalid length".to_string()),
        ];

        for err in errors {
            assert_eq!(err.status_code(), 500);
            let body = err.client_body();
            assert!(body.contains(GENERIC_FAILURE_MESSAGE));
            assert!(!body.contains("os error"));
            assert!(!body.contains("line 1"));
            assert!(!body.contains("503"));
            assert!(!body.contains("maintenance"));
        }
    }
}
