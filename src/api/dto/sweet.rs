//! DTOs for catalog endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{NoneAsEmptyString, serde_as};
use validator::{Validate, ValidationError};

use crate::domain::entities::{NewSweet, Sweet, SweetFilter, SweetPatch};

/// Rejects values that are empty once surrounding whitespace is trimmed.
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("Must not be blank".into()));
    }
    Ok(())
}

/// Request body for `POST /api/sweets`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSweetRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[validate(custom(function = "not_blank"))]
    pub name: String,

    #[validate(length(min = 1, max = 50, message = "Category must be 1-50 characters"))]
    #[validate(custom(function = "not_blank"))]
    pub category: String,

    #[validate(range(exclusive_min = 0.0, message = "Price must be greater than 0"))]
    pub price: f64,

    #[validate(range(min = 0, message = "Quantity must be zero or more"))]
    pub quantity: i64,
}

impl From<CreateSweetRequest> for NewSweet {
    fn from(req: CreateSweetRequest) -> Self {
        NewSweet {
            name: req.name.trim().to_string(),
            category: req.category.trim().to_string(),
            price: req.price,
            quantity: req.quantity,
        }
    }
}

/// Request body for `PUT /api/sweets/{id}`.
///
/// Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateSweetRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[validate(custom(function = "not_blank"))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 50, message = "Category must be 1-50 characters"))]
    #[validate(custom(function = "not_blank"))]
    pub category: Option<String>,

    #[validate(range(exclusive_min = 0.0, message = "Price must be greater than 0"))]
    pub price: Option<f64>,

    #[validate(range(min = 0, message = "Quantity must be zero or more"))]
    pub quantity: Option<i64>,
}

impl From<UpdateSweetRequest> for SweetPatch {
    fn from(req: UpdateSweetRequest) -> Self {
        SweetPatch {
            name: req.name.map(|n| n.trim().to_string()),
            category: req.category.map(|c| c.trim().to_string()),
            price: req.price,
            quantity: req.quantity,
        }
    }
}

/// Query string for `GET /api/sweets/search`.
///
/// Empty parameters (`?min_price=`) are treated as absent. The storefront's
/// camelCase names (`minPrice`, `maxPrice`) are accepted as well.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub name: Option<String>,
    pub category: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default, alias = "minPrice")]
    pub min_price: Option<f64>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default, alias = "maxPrice")]
    pub max_price: Option<f64>,
}

impl From<SearchParams> for SweetFilter {
    fn from(params: SearchParams) -> Self {
        SweetFilter {
            name: params.name,
            category: params.category,
            min_price: params.min_price,
            max_price: params.max_price,
        }
    }
}

/// JSON representation of a sweet.
#[derive(Debug, Serialize, Deserialize)]
pub struct SweetResponse {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub quantity: i64,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Sweet> for SweetResponse {
    fn from(sweet: Sweet) -> Self {
        Self {
            id: sweet.id,
            name: sweet.name,
            category: sweet.category,
            price: sweet.price,
            quantity: sweet.quantity,
            version: sweet.version,
            created_at: sweet.created_at,
            updated_at: sweet.updated_at,
        }
    }
}

/// Confirmation body for deletes.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request(name: &str, category: &str, price: f64, quantity: i64) -> CreateSweetRequest {
        CreateSweetRequest {
            name: name.to_string(),
            category: category.to_string(),
            price,
            quantity,
        }
    }

    #[test]
    fn test_valid_create_request() {
        assert!(
            create_request("Kaju Katli", "Dry Fruit", 450.0, 25)
                .validate()
                .is_ok()
        );
        assert!(create_request("Peda", "Milk-based", 0.5, 0).validate().is_ok());
    }

    #[test]
    fn test_create_request_rejects_bad_fields() {
        assert!(create_request("", "Fried", 10.0, 1).validate().is_err());
        assert!(
            create_request(&"x".repeat(101), "Fried", 10.0, 1)
                .validate()
                .is_err()
        );
        assert!(
            create_request("Jalebi", &"c".repeat(51), 10.0, 1)
                .validate()
                .is_err()
        );
        assert!(create_request("Jalebi", "Fried", 0.0, 1).validate().is_err());
        assert!(create_request("Jalebi", "Fried", 10.0, -1).validate().is_err());
    }

    #[test]
    fn test_update_request_allows_absent_fields() {
        assert!(UpdateSweetRequest::default().validate().is_ok());

        let req = UpdateSweetRequest {
            price: Some(-3.0),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_search_params_empty_prices_are_absent() {
        let params: SearchParams =
            serde_json::from_value(serde_json::json!({ "min_price": "", "max_price": "300" }))
                .unwrap();

        assert_eq!(params.min_price, None);
        assert_eq!(params.max_price, Some(300.0));
    }

    #[test]
    fn test_search_params_accept_camel_case() {
        let params: SearchParams =
            serde_json::from_value(serde_json::json!({ "minPrice": "100", "maxPrice": "250" }))
                .unwrap();

        assert_eq!(params.min_price, Some(100.0));
        assert_eq!(params.max_price, Some(250.0));
    }

    #[test]
    fn test_blank_names_are_rejected() {
        let errors = create_request("   ", "Fried", 10.0, 1)
            .validate()
            .unwrap_err();
        assert!(errors.field_errors().contains_key("name"));

        assert!(create_request("Jalebi", " \t ", 10.0, 1).validate().is_err());

        let req = UpdateSweetRequest {
            name: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }
}
