use crate::domain::{
    requests::order::{CreateOrderRequest, UpdateOrderRequest},
    response::order::OrderResponse,
};
use anyhow::Result;
use async_trait::async_trait;
use shared::{domain::responses::ApiResponse, errors::ServiceError};
use std::sync::Arc;
use uuid::Uuid;

pub type DynOrderCommandService = Arc<dyn OrderCommandServiceTrait + Send + Sync>;

#[async_trait]
pub trait OrderCommandServiceTrait {
    async fn create_order(
        &self,
        req: &CreateOrderRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError>;
    async fn update_order(
        &self,
        order_id: Uuid,
        req: &UpdateOrderRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError>;
    async fn delete_order(&self, order_id: Uuid) -> Result<ApiResponse<()>, ServiceError>;
    async fn delete_order_item(
        &self,
        order_item_id: Uuid,
    ) -> Result<ApiResponse<()>, ServiceError>;
}
