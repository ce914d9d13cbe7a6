use crate::{
    abstract_trait::order::repository::{OrderCommandRepositoryTrait, OrderUnitOfWork},
    repository::order::unit_of_work::PgOrderUnitOfWork,
};
use anyhow::Result;
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info};
use uuid::Uuid;

#[derive(Clone)]
pub struct OrderCommandRepository {
    db: ConnectionPool,
}

impl OrderCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderCommandRepositoryTrait for OrderCommandRepository {
    async fn begin(&self) -> Result<Box<dyn OrderUnitOfWork>, RepositoryError> {
        let tx = self.db.begin().await.map_err(|err| {
            error!("❌ Failed to begin transaction: {:?}", err);
            RepositoryError::from(err)
        })?;

        Ok(Box::new(PgOrderUnitOfWork::new(tx)))
    }

    async fn delete_order(&self, order_id: Uuid) -> Result<u64, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query("DELETE FROM orders WHERE order_id = $1")
            .bind(order_id)
            .execute(&mut *conn)
            .await
            .map_err(|err| {
                error!("❌ Failed to delete order {}: {:?}", order_id, err);
                RepositoryError::from_sqlx(err)
            })?;

        info!(
            "🗑️ Deleted order {} ({} rows)",
            order_id,
            result.rows_affected()
        );
        Ok(result.rows_affected())
    }

    async fn delete_order_item(&self, order_item_id: Uuid) -> Result<u64, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query("DELETE FROM order_items WHERE order_item_id = $1")
            .bind(order_item_id)
            .execute(&mut *conn)
            .await
            .map_err(|err| {
                error!("❌ Failed to delete order item {}: {:?}", order_item_id, err);
                RepositoryError::from_sqlx(err)
            })?;

        info!(
            "🗑️ Deleted order item {} ({} rows)",
            order_item_id,
            result.rows_affected()
        );
        Ok(result.rows_affected())
    }
}
