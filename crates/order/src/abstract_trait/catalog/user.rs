use anyhow::Result;
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynUserStore = Arc<dyn UserStoreTrait + Send + Sync>;

#[async_trait]
pub trait UserStoreTrait {
    async fn exists(&self, user_id: &str) -> Result<bool, RepositoryError>;
}
