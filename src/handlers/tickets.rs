use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use chrono::Local;
use serde::Deserialize;
use tracing::info;

use crate::models::ticket::{Ticket, TicketSearch};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::extract::{ValidJson, ValidPath, ValidQuery};
use crate::utils::response::message;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
    pub search: Option<String>,
}

pub async fn create_ticket(
    State(state): State<AppState>,
    ValidJson(ticket): ValidJson<Ticket>,
) -> Result<Response, AppError> {
    ticket.validate().map_err(AppError::ValidationError)?;

    state.store.insert(&ticket).await?;
    info!(ticket_number = ticket.ticket_number, "Ticket created");

    Ok(message(StatusCode::CREATED, "Ticket created successfully"))
}

pub async fn list_tickets(
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<ListParams>,
) -> Result<Json<Vec<Ticket>>, AppError> {
    let limit = match params.limit {
        None => state.limits.default,
        Some(n) if n < 1 => {
            return Err(AppError::ValidationError(
                "limit must be at least 1".to_string(),
            ))
        }
        // Anything above the cap, including values past u32, is clamped
        Some(n) => u32::try_from(n)
            .unwrap_or(u32::MAX)
            .min(state.limits.max),
    };
    let search = params.search.as_deref().and_then(TicketSearch::parse);

    let tickets = state.store.query(limit, search.as_ref()).await?;
    Ok(Json(tickets))
}

pub async fn mark_ticket_paid(
    State(state): State<AppState>,
    ValidPath(ticket_number): ValidPath<u32>,
) -> Result<Response, AppError> {
    let today = Local::now().date_naive();

    let updated = state.store.update_to_paid(ticket_number, today).await?;
    info!(ticket_number, updated, %today, "Ticket marked as paid");

    Ok(message(
        StatusCode::OK,
        format!("Ticket {ticket_number} marked as paid"),
    ))
}

pub async fn delete_ticket(
    State(state): State<AppState>,
    ValidPath(ticket_number): ValidPath<u32>,
) -> Result<Response, AppError> {
    let deleted = state.store.delete_by_number(ticket_number).await?;
    info!(ticket_number, deleted, "Ticket deleted");

    Ok(message(
        StatusCode::OK,
        format!("Ticket {ticket_number} deleted successfully"),
    ))
}
