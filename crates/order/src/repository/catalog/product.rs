use crate::abstract_trait::catalog::ProductStoreTrait;
use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::error;

/// Read-only view over the `products` table.
#[derive(Clone)]
pub struct ProductRepository {
    db: ConnectionPool,
}

impl ProductRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductStoreTrait for ProductRepository {
    async fn lookup_price(&self, product_id: &str) -> Result<Option<Decimal>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_scalar::<_, Decimal>("SELECT price FROM products WHERE product_id = $1")
            .bind(product_id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|err| {
                error!("❌ Failed to look up price of product {}: {:?}", product_id, err);
                RepositoryError::from_sqlx(err)
            })
    }
}
