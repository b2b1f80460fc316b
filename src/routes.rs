//! Axum router for the inbound tracking endpoint.
//!
//! Middleware layers are attached in `main.rs` so tests can drive the bare router.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};

use crate::tracker::{OrderTracker, TrackResponse};

pub fn build_router(tracker: Arc<OrderTracker>) -> Router {
    Router::new()
        .route("/track/order/:order_id", get(track_order))
        .with_state(tracker)
}

pub(crate) async fn track_order(
    State(tracker): State<Arc<OrderTracker>>,
    Path(order_id): Path<String>,
) -> Response {
    tracker.handle(&order_id).await.into_response()
}

impl IntoResponse for TrackResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, [(header::CONTENT_TYPE, "application/json")], self.body).into_response()
    }
}
