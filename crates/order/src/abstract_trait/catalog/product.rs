use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynProductStore = Arc<dyn ProductStoreTrait + Send + Sync>;

#[async_trait]
pub trait ProductStoreTrait {
    /// Current stored price, `None` when the product does not exist.
    async fn lookup_price(&self, product_id: &str) -> Result<Option<Decimal>, RepositoryError>;
}
