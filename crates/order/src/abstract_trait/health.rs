use anyhow::Result;
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynStoreHealth = Arc<dyn StoreHealthTrait + Send + Sync>;

#[async_trait]
pub trait StoreHealthTrait {
    /// Round trip to the backing store.
    async fn ping(&self) -> Result<(), RepositoryError>;
}
