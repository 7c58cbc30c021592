//! Event intake handler for the order-processing collaborator.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::domain::OrderEvent;
use crate::error::{ErrorResponse, GatewayError};

/// Response to an accepted domain event.
#[derive(Debug, Serialize, ToSchema)]
pub struct PublishResponse {
    /// Number of sessions the event was queued for. Informational only;
    /// delivery is best-effort and carries no partial-failure signal.
    pub delivered: usize,
}

/// `POST /events` — Ingest a domain event and fan it out.
///
/// The collaborator is trusted: order existence is not validated, only the
/// shape of the event and a non-empty order id.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidOrderId`] when the order id is empty.
#[utoipa::path(
    post,
    path = "/api/v1/events",
    tag = "Events",
    summary = "Publish an order domain event",
    description = "Accepts an order lifecycle event from the order-processing service and delivers it to every session subscribed to the order's channel or to the admin firehose.",
    request_body = OrderEvent,
    responses(
        (status = 202, description = "Event accepted for fan-out", body = PublishResponse),
        (status = 400, description = "Malformed event or empty order id", body = ErrorResponse),
    )
)]
pub async fn publish_event(
    State(state): State<AppState>,
    Json(event): Json<OrderEvent>,
) -> Result<impl IntoResponse, GatewayError> {
    if event.order_id().trim().is_empty() {
        return Err(GatewayError::InvalidOrderId);
    }

    let delivered = state.broadcaster.publish(event).await;

    Ok((StatusCode::ACCEPTED, Json(PublishResponse { delivered })))
}

/// Event intake routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/events", post(publish_event))
}
