use crate::domain::{requests::order::ListOrdersQuery, response::order::OrderResponse};
use anyhow::Result;
use async_trait::async_trait;
use shared::{domain::responses::ApiResponse, errors::ServiceError};
use std::sync::Arc;
use uuid::Uuid;

pub type DynOrderQueryService = Arc<dyn OrderQueryServiceTrait + Send + Sync>;

#[async_trait]
pub trait OrderQueryServiceTrait {
    async fn find_by_id(&self, order_id: Uuid) -> Result<ApiResponse<OrderResponse>, ServiceError>;
    async fn find_all(
        &self,
        req: &ListOrdersQuery,
    ) -> Result<ApiResponse<Vec<OrderResponse>>, ServiceError>;
    async fn find_by_user(
        &self,
        user_id: &str,
    ) -> Result<ApiResponse<Vec<OrderResponse>>, ServiceError>;
}
