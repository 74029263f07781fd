use std::sync::Arc;

use crate::config::ListLimits;
use crate::store::TicketStore;

/// Shared handler state. Holds the store handle built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TicketStore>,
    pub limits: ListLimits,
}

impl AppState {
    pub fn new(store: Arc<dyn TicketStore>, limits: ListLimits) -> Self {
        Self { store, limits }
    }
}
