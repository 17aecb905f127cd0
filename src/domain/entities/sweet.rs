//! Sweet entity: a catalog item with a stock quantity.

use chrono::{DateTime, Utc};

/// A sweet on sale with its current stock level.
///
/// `version` is the optimistic-lock token. Every write to the row (purchase,
/// restock, admin edit) increments it, so a conditional write that names a
/// stale version is rejected by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Sweet {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub quantity: i64,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Sweet {
    /// Creates a new Sweet instance.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: i64,
        name: String,
        category: String,
        price: f64,
        quantity: i64,
        version: i64,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            category,
            price,
            quantity,
            version,
            created_at,
            updated_at,
        }
    }
}

/// Input data for creating a new sweet.
#[derive(Debug, Clone)]
pub struct NewSweet {
    pub name: String,
    pub category: String,
    pub price: f64,
    pub quantity: i64,
}

/// Partial administrative update. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct SweetPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
}

impl SweetPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.price.is_none()
            && self.quantity.is_none()
    }
}

/// Catalog search criteria. All fields are optional and combined with AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweetFilter {
    /// Case-insensitive substring of the name.
    pub name: Option<String>,
    /// Exact category.
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl SweetFilter {
    /// Returns true if `sweet` satisfies every criterion.
    pub fn matches(&self, sweet: &Sweet) -> bool {
        if let Some(ref name) = self.name
            && !sweet.name.to_lowercase().contains(&name.to_lowercase())
        {
            return false;
        }
        if let Some(ref category) = self.category
            && &sweet.category != category
        {
            return false;
        }
        if self.min_price.is_some_and(|min| sweet.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| sweet.price > max) {
            return false;
        }
        true
    }
}
