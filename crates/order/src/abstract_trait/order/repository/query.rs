use crate::model::order::Order as OrderModel;
use anyhow::Result;
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;
use uuid::Uuid;

pub type DynOrderQueryRepository = Arc<dyn OrderQueryRepositoryTrait + Send + Sync>;

/// Reads return orders with their items already loaded.
#[async_trait]
pub trait OrderQueryRepositoryTrait {
    async fn find_by_id(&self, order_id: Uuid) -> Result<Option<OrderModel>, RepositoryError>;
    /// Newest first.
    async fn find_all(&self, limit: i64, offset: i64)
    -> Result<Vec<OrderModel>, RepositoryError>;
    async fn find_by_user(&self, user_id: &str) -> Result<Vec<OrderModel>, RepositoryError>;
}
