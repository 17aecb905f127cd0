//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{AuthService, InventoryService, SweetService};
use crate::domain::repositories::{StockStore, SweetRepository, TokenRepository};

/// Handles to the application services.
///
/// Services hold their stores as trait objects so the same router runs on
/// PostgreSQL in production and on the in-memory stores in tests.
#[derive(Clone)]
pub struct AppState {
    pub sweet_service: Arc<SweetService<dyn SweetRepository>>,
    pub inventory_service: Arc<InventoryService<dyn StockStore>>,
    pub auth_service: Arc<AuthService<dyn TokenRepository>>,
}

impl AppState {
    pub fn new(
        sweet_service: Arc<SweetService<dyn SweetRepository>>,
        inventory_service: Arc<InventoryService<dyn StockStore>>,
        auth_service: Arc<AuthService<dyn TokenRepository>>,
    ) -> Self {
        Self {
            sweet_service,
            inventory_service,
            auth_service,
        }
    }
}
