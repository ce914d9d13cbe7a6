use crate::domain::requests::order_item::{CreateOrderItemRequest, UpdateOrderItemRequest};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

pub const DEFAULT_LIST_LIMIT: i64 = 10;
pub const MAX_LIST_LIMIT: i64 = 100;
pub const DEFAULT_ORDER_STATUS: &str = "pending";

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub user_id: String,

    /// Defaults to `pending` when empty.
    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub items: Vec<CreateOrderItemRequest>,
}

/// Fields left out are not touched. Item patches apply in list order.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Default)]
pub struct UpdateOrderRequest {
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub items: Vec<UpdateOrderItemRequest>,
}

#[derive(Debug, Clone)]
pub struct CreateOrderRecordRequest {
    pub order_id: Uuid,
    pub user_id: String,
    pub status: String,
    pub total_amount: Decimal,
    pub created_at: NaiveDateTime,
}

/// Raw `limit`/`offset` query values. Anything that fails to parse counts as absent.
#[derive(Debug, Serialize, Deserialize, IntoParams, Clone, Default)]
#[into_params(parameter_in = Query)]
pub struct ListOrdersParams {
    /// Page size, default 10, at most 100
    pub limit: Option<String>,
    /// Rows to skip, default 0
    pub offset: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListOrdersQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListOrdersQuery {
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self { limit, offset }
    }

    /// Returns the `(limit, offset)` pair actually applied to the store.
    pub fn normalize(&self) -> (i64, i64) {
        let limit = match self.limit {
            Some(limit) if limit > MAX_LIST_LIMIT => MAX_LIST_LIMIT,
            Some(limit) if limit > 0 => limit,
            _ => DEFAULT_LIST_LIMIT,
        };
        let offset = self.offset.filter(|offset| *offset > 0).unwrap_or(0);

        (limit, offset)
    }
}

impl From<ListOrdersParams> for ListOrdersQuery {
    fn from(params: ListOrdersParams) -> Self {
        let parse = |value: Option<String>| value.and_then(|v| v.trim().parse::<i64>().ok());

        Self {
            limit: parse(params.limit),
            offset: parse(params.offset),
        }
    }
}
