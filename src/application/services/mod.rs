//! Business logic services for the application layer.

pub mod auth_service;
pub mod inventory_service;
pub mod sweet_service;

pub use auth_service::{AuthService, Principal, hash_token};
pub use inventory_service::{InventoryService, RetryPolicy};
pub use sweet_service::SweetService;
