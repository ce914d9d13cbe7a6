use crate::model::{order::Order as OrderModel, order_item::OrderItem as OrderItemModel};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct OrderItemResponse {
    pub order_item_id: Uuid,
    pub order_id: Uuid,
    pub product_id: String,
    pub quantity: i32,
    #[schema(value_type = String, example = "9.99")]
    pub price: Decimal,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct OrderResponse {
    pub order_id: Uuid,
    pub user_id: String,
    pub status: String,
    #[schema(value_type = String, example = "39.98")]
    pub total_amount: Decimal,
    pub items: Vec<OrderItemResponse>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

// model to response
impl From<OrderItemModel> for OrderItemResponse {
    fn from(value: OrderItemModel) -> Self {
        OrderItemResponse {
            order_item_id: value.order_item_id,
            order_id: value.order_id,
            product_id: value.product_id,
            quantity: value.quantity,
            price: value.price,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

// model to response
impl From<OrderModel> for OrderResponse {
    fn from(value: OrderModel) -> Self {
        OrderResponse {
            order_id: value.order_id,
            user_id: value.user_id,
            status: value.status,
            total_amount: value.total_amount,
            items: value.items.into_iter().map(OrderItemResponse::from).collect(),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}
