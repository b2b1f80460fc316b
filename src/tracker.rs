use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

use crate::config::Config;
use crate::error::TrackError;
use crate::models::{TrackingQuery, UpstreamReply};
use crate::narvar::TrackingApi;
use crate::signing::{Signature, current_epoch};

/// Status and JSON body handed back to the inbound caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackResponse {
    pub status: u16,
    pub body: String,
}

pub struct OrderTracker {
    config: Config,
    api: Arc<dyn TrackingApi>,
}

impl OrderTracker {
    pub fn new(config: Config, api: Arc<dyn TrackingApi>) -> Self {
        Self { config, api }
    }

    pub async fn handle(&self, order_id: &str) -> TrackResponse {
        self.handle_at(order_id, current_epoch()).await
    }

    /// Sign with the given epoch second and forward one tracking request.
    pub async fn handle_at(&self, order_id: &str, epoch: i64) -> TrackResponse {
        match self.track(order_id, epoch).await {
            Ok(body) => {
                info!(order_id = %order_id, "Tracking order successful");
                TrackResponse { status: 200, body }
            }
            Err(err) => {
                match &err {
                    TrackError::ConfigurationMissing => {
                        error!("HMAC_TOKEN or RETAILER_MONIKER not set in the environment");
                    }
                    TrackError::UpstreamReported { errors } => {
                        error!(order_id = %order_id, errors = %errors, "Error in tracking order response");
                    }
                    other => {
                        error!(order_id = %order_id, error = %other, "Error occurred while tracking order");
                    }
                }
                TrackResponse {
                    status: err.status_code(),
                    body: err.client_body(),
                }
            }
        }
    }

    async fn track(&self, order_id: &str, epoch: i64) -> Result<String, TrackError> {
        let credentials = self.config.credentials()?;
        let signature = Signature::sign(&credentials.hmac_token, order_id, epoch)?;

        let query = TrackingQuery {
            order_id: order_id.to_string(),
            retailer_moniker: credentials.retailer_moniker,
            signature,
        };

        let reply = self
            .api
            .fetch(&query)
            .await
            .map_err(TrackError::UpstreamUnavailable)?;

        classify(reply)
    }
}

/// Success bodies pass through verbatim; an `errors` array wins over the status code.
///
/// A 4xx/5xx carrying `errors` is answered with 400 on purpose, where a client that throws on
/// non-2xx statuses would have turned it into a 500.
fn classify(reply: UpstreamReply) -> Result<String, TrackError> {
    let parsed: Value = serde_json::from_str(&reply.body)
        .map_err(|e| TrackError::MalformedResponse(e.to_string()))?;

    let document = parsed
        .as_object()
        .ok_or_else(|| TrackError::MalformedResponse("expected a JSON object".to_string()))?;

    if let Some(errors) = document.get("errors") {
        if !errors.is_array() {
            return Err(TrackError::MalformedResponse(
                "`errors` is not an array".to_string(),
            ));
        }
        return Err(TrackError::UpstreamReported {
            errors: errors.clone(),
        });
    }

    if !(200..300).contains(&reply.status) {
        return Err(TrackError::UnexpectedStatus {
            status: reply.status,
            body: reply.body,
        });
    }

    Ok(reply.body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(status: u16, body: &str) -> UpstreamReply {
        UpstreamReply {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn success_body_is_untouched() {
        let body = "{\"tracking_number\":  \"1Z999\" }";
        assert_eq!(classify(reply(200, body)).unwrap(), body);
    }

    #[test]
    fn errors_array_is_reported_even_on_error_status() {
        for status in [200, 404] {
            match classify(reply(status, r#"{"errors": ["not found"]}"#)) {
                Err(TrackError::UpstreamReported { errors }) => {
                    assert_eq!(errors.to_string(), r#"["not found"]"#)
                }
                other => panic!("unexpected result: {:?}", other),
            }
        }
    }

    #[test]
    fn non_array_errors_field_is_malformed() {
        assert!(matches!(
            classify(reply(200, r#"{"errors": "boom"}"#)),
            Err(TrackError::MalformedResponse(_))
        ));
    }

    #[test]
    fn non_object_or_invalid_json_is_malformed() {
        for body in ["", "<html>oops</html>", "[1, 2]", "\"text\""] {
            assert!(matches!(
                classify(reply(200, body)),
                Err(TrackError::MalformedResponse(_))
            ));
        }
    }

    #[test]
    fn error_status_without_errors_field_is_unexpected() {
        assert!(matches!(
            classify(reply(502, r#"{"message": "bad gateway"}"#)),
            Err(TrackError::UnexpectedStatus { status: 502, ref body }) if body.contains("bad gateway")
        ));
    }
}
