//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access following the Repository pattern. They
//! are implemented by the infrastructure layer.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - PostgreSQL implementations live in `crate::infrastructure::persistence`
//! - In-process implementations live in `crate::infrastructure::memory`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Available Repositories
//!
//! - [`SweetRepository`] - Catalog CRUD and search
//! - [`StockStore`] - Versioned read and conditional write of quantities
//! - [`TokenRepository`] - API token authentication

pub mod stock_store;
pub mod sweet_repository;
pub mod token_repository;

pub use stock_store::{StockLevel, StockStore, WriteOutcome};
pub use sweet_repository::SweetRepository;
pub use token_repository::{ApiToken, Role, TokenRepository};

#[cfg(test)]
pub use stock_store::MockStockStore;
#[cfg(test)]
pub use sweet_repository::MockSweetRepository;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
