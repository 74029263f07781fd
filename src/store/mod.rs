//! Ticket persistence.
//!
//! [`TicketStore`] is the seam between the HTTP layer and the database. Updates and
//! deletes are predicate based (`ticket_number = N`), so both are idempotent and a
//! missing ticket is reported as zero affected rows rather than an error.

use std::sync::Arc;

use axum::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::config::{DatabaseConfig, StoreBackend};
use crate::models::ticket::{Ticket, TicketSearch, UnknownVariant};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryTicketStore;
pub use postgres::PgTicketStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("ticket {0} already exists")]
    Duplicate(u32),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("invalid stored row: {0}")]
    InvalidRow(String),
}

impl From<UnknownVariant> for StoreError {
    fn from(err: UnknownVariant) -> Self {
        StoreError::InvalidRow(err.to_string())
    }
}

#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Creates the tickets table if it does not exist. Safe to call on every start.
    async fn ensure_schema(&self) -> Result<(), StoreError>;

    /// Stores one ticket. Fails with [`StoreError::Duplicate`] if the number is taken.
    async fn insert(&self, ticket: &Ticket) -> Result<(), StoreError>;

    /// Returns at most `limit` tickets in ascending `ticket_number` order.
    ///
    /// The search predicate is applied before the limit, so matches beyond the
    /// first page of the whole table are still found.
    async fn query(
        &self,
        limit: u32,
        search: Option<&TicketSearch>,
    ) -> Result<Vec<Ticket>, StoreError>;

    /// Marks every ticket with this number as paid on `payment_date`.
    /// Returns the number of rows touched.
    async fn update_to_paid(
        &self,
        ticket_number: u32,
        payment_date: NaiveDate,
    ) -> Result<u64, StoreError>;

    /// Removes every ticket with this number. Returns the number of rows removed.
    async fn delete_by_number(&self, ticket_number: u32) -> Result<u64, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;

    async fn query_all(&self, limit: u32) -> Result<Vec<Ticket>, StoreError> {
        self.query(limit, None).await
    }
}

/// Builds the store selected by configuration.
pub async fn connect(config: &DatabaseConfig) -> Result<Arc<dyn TicketStore>, StoreError> {
    match config.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory ticket store; data is lost on restart");
            Ok(Arc::new(InMemoryTicketStore::new()))
        }
        StoreBackend::Postgres => {
            let store = PgTicketStore::connect(config).await?;
            tracing::info!("Successfully connected to database");
            Ok(Arc::new(store))
        }
    }
}
