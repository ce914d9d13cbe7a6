use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema, Clone)]
pub struct CreateOrderItemRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "product_id is required"))]
    pub product_id: String,

    #[serde(default)]
    #[validate(range(min = 1, message = "quantity must be greater than 0"))]
    pub quantity: i32,

    /// Checked for positivity only; the stored product price is what gets persisted.
    #[serde(default)]
    #[validate(custom(function = "validate_positive_price"))]
    #[schema(value_type = String, example = "9.99")]
    pub price: Decimal,
}

/// One entry of an order patch.
///
/// * `delete: true` removes the item named by `order_item_id`.
/// * an `order_item_id` without `delete` updates that item.
/// * no `order_item_id` adds a new item.
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema, Clone, Default)]
pub struct UpdateOrderItemRequest {
    #[serde(default)]
    pub order_item_id: Option<Uuid>,

    #[serde(default)]
    #[validate(length(min = 1, message = "product_id must not be empty"))]
    pub product_id: Option<String>,

    #[serde(default)]
    #[validate(range(min = 1, message = "quantity must be greater than 0"))]
    pub quantity: Option<i32>,

    #[serde(default)]
    #[validate(custom(function = "validate_positive_price"))]
    #[schema(value_type = Option<String>, example = "9.99")]
    pub price: Option<Decimal>,

    #[serde(default)]
    pub delete: bool,
}

#[derive(Debug, Clone)]
pub struct CreateOrderItemRecordRequest {
    pub order_item_id: Uuid,
    pub order_id: Uuid,
    pub product_id: String,
    pub quantity: i32,
    pub price: Decimal,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct UpdateOrderItemRecordRequest {
    pub order_item_id: Uuid,
    pub order_id: Uuid,
    pub product_id: String,
    pub quantity: i32,
    pub price: Decimal,
    pub updated_at: NaiveDateTime,
}

fn validate_positive_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price > Decimal::ZERO {
        Ok(())
    } else {
        let mut err = ValidationError::new("range");
        err.message = Some("price must be greater than 0".into());
        Err(err)
    }
}
