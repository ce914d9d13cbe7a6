use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct OrderItem {
    pub order_item_id: Uuid,
    pub order_id: Uuid,
    pub product_id: String,
    pub quantity: i32,
    pub price: Decimal,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl OrderItem {
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.price
    }
}

/// Σ quantity × price over `(quantity, price)` lines.
pub fn total_amount(lines: impl IntoIterator<Item = (i32, Decimal)>) -> Decimal {
    lines
        .into_iter()
        .map(|(quantity, price)| Decimal::from(quantity) * price)
        .sum()
}

pub fn total_of(items: &[OrderItem]) -> Decimal {
    items.iter().map(OrderItem::line_total).sum()
}
