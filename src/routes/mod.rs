use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer, HttpConfig};
use crate::handlers::{
    create_ticket, delete_ticket, health_check, list_tickets, mark_ticket_paid, route_not_found,
};
use crate::state::AppState;

pub fn create_routes(state: AppState, http: &HttpConfig) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/tickets", get(list_tickets).post(create_ticket))
        .route("/tickets/", post(create_ticket))
        .route("/tickets/:ticket_number", delete(delete_ticket))
        .route("/tickets/:ticket_number/pay", put(mark_ticket_paid))
        .fallback(route_not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(create_security_headers_layer(http))
        .layer(create_cors_layer(http.cors_allowed_origins.as_deref()))
}
