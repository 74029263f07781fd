use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::state::AppState;
use crate::utils::error::AppError;

pub mod tickets;

pub use tickets::{create_ticket, delete_ticket, list_tickets, mark_ticket_paid};

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
    store: &'static str,
}

pub async fn health_check(State(state): State<AppState>) -> Response {
    let (status, store) = match state.store.ping().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(e) => {
            tracing::warn!(error = %e, "Health check: store unreachable");
            (StatusCode::SERVICE_UNAVAILABLE, "unreachable")
        }
    };

    let payload = HealthPayload {
        status: if status == StatusCode::OK { "ok" } else { "degraded" },
        service: "raffle-api",
        store,
    };

    (status, Json(payload)).into_response()
}

pub async fn route_not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for '{}'", uri.path()))
}
