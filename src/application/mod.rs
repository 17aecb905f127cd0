//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! validation, and business rules. Services consume repository traits and provide
//! a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::inventory_service::InventoryService`] - Race-safe purchase and restock
//! - [`services::sweet_service::SweetService`] - Catalog browsing and administration
//! - [`services::auth_service::AuthService`] - API token authentication

pub mod services;
