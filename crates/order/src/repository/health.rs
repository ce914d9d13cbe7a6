use crate::abstract_trait::health::StoreHealthTrait;
use anyhow::Result;
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::error;

#[derive(Clone)]
pub struct HealthRepository {
    db: ConnectionPool,
}

impl HealthRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StoreHealthTrait for HealthRepository {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1")
            .execute(&self.db)
            .await
            .map_err(|err| {
                error!("❌ Database ping failed: {:?}", err);
                RepositoryError::from_sqlx(err)
            })?;

        Ok(())
    }
}
