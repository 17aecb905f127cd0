//! In-process repository implementations.
//!
//! Same contracts as the PostgreSQL repositories, backed by maps behind
//! `tokio::sync::RwLock`. Used by the integration tests and by embedders that
//! do not need durability.
//!
//! - [`InMemorySweetStore`] - Catalog and conditional stock writes
//! - [`InMemoryTokenRepository`] - API tokens

pub mod sweet_store;
pub mod token_repository;

pub use sweet_store::InMemorySweetStore;
pub use token_repository::InMemoryTokenRepository;
