//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod inventory;
pub mod sweets;

pub use health::health_handler;
pub use inventory::{purchase_handler, restock_handler};
pub use sweets::{
    create_sweet_handler, delete_sweet_handler, get_sweet_handler, list_sweets_handler,
    search_sweets_handler, update_sweet_handler,
};
