//! Core domain entities.
//!
//! Entities are plain data structures. Creation and partial updates use
//! separate input types:
//!
//! - [`Sweet`] - a catalog item with its stock level and version token
//! - [`NewSweet`] - input for creating a sweet
//! - [`SweetPatch`] - partial administrative update
//! - [`SweetFilter`] - catalog search criteria

pub mod sweet;

pub use sweet::{NewSweet, Sweet, SweetFilter, SweetPatch};
