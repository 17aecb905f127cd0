//! Domain layer containing business entities and rules.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`inventory`] - Stock change decision logic
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Repository traits define contracts implemented by infrastructure layer
//! - Orchestration lives in services (see [`crate::application::services`])
//!
//! # Purchase Flow
//!
//! 1. HTTP handler receives `POST /api/sweets/{id}/purchase`
//! 2. [`crate::application::services::InventoryService`] reads the stock level
//! 3. [`inventory::StockChange::apply_to`] decides the new quantity
//! 4. [`repositories::StockStore::write_quantity_if_version`] commits it, or
//!    reports a lost race and the service retries

pub mod entities;
pub mod inventory;
pub mod repositories;
