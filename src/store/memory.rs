//! In-memory ticket store.
//!
//! Backs the HTTP tests and `TICKET_STORE=memory` local runs. A `BTreeMap` keyed
//! by ticket number gives the same ascending order and uniqueness as the
//! database primary key.

use std::collections::BTreeMap;

use axum::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;

use super::{StoreError, TicketStore};
use crate::models::ticket::{Ticket, TicketSearch};

#[derive(Debug, Default)]
pub struct InMemoryTicketStore {
    tickets: RwLock<BTreeMap<u32, Ticket>>,
}

impl InMemoryTicketStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn is_empty(&self) -> bool {
        self.tickets.read().await.is_empty()
    }
}

#[async_trait]
impl TicketStore for InMemoryTicketStore {
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn insert(&self, ticket: &Ticket) -> Result<(), StoreError> {
        let mut tickets = self.tickets.write().await;
        if tickets.contains_key(&ticket.ticket_number) {
            return Err(StoreError::Duplicate(ticket.ticket_number));
        }
        tickets.insert(ticket.ticket_number, ticket.clone());
        Ok(())
    }

    async fn query(
        &self,
        limit: u32,
        search: Option<&TicketSearch>,
    ) -> Result<Vec<Ticket>, StoreError> {
        let tickets = self.tickets.read().await;
        Ok(tickets
            .values()
            .filter(|t| search.map_or(true, |s| s.matches(t)))
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn update_to_paid(
        &self,
        ticket_number: u32,
        payment_date: NaiveDate,
    ) -> Result<u64, StoreError> {
        let mut tickets = self.tickets.write().await;
        match tickets.get_mut(&ticket_number) {
            Some(ticket) => {
                ticket.mark_paid(payment_date);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_by_number(&self, ticket_number: u32) -> Result<u64, StoreError> {
        let mut tickets = self.tickets.write().await;
        Ok(u64::from(tickets.remove(&ticket_number).is_some()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
