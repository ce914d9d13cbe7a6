use crate::{
    abstract_trait::order::repository::OrderQueryRepositoryTrait,
    model::{order::Order as OrderModel, order_item::OrderItem as OrderItemModel},
};
use anyhow::Result;
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use sqlx::PgConnection;
use std::collections::HashMap;
use tracing::{error, info};
use uuid::Uuid;

#[derive(Clone)]
pub struct OrderQueryRepository {
    db: ConnectionPool,
}

impl OrderQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

/// Loads the items of every order in one round trip and attaches them in place.
async fn attach_items(
    conn: &mut PgConnection,
    mut orders: Vec<OrderModel>,
) -> Result<Vec<OrderModel>, RepositoryError> {
    if orders.is_empty() {
        return Ok(orders);
    }

    let order_ids: Vec<Uuid> = orders.iter().map(|order| order.order_id).collect();

    let items = sqlx::query_as::<_, OrderItemModel>(
        r#"
        SELECT order_item_id, order_id, product_id, quantity, price, created_at, updated_at
        FROM order_items
        WHERE order_id = ANY($1)
        ORDER BY created_at ASC, order_item_id ASC
        "#,
    )
    .bind(&order_ids)
    .fetch_all(&mut *conn)
    .await
    .map_err(|err| {
        error!("❌ Failed to load items for {} orders: {:?}", order_ids.len(), err);
        RepositoryError::from_sqlx(err)
    })?;

    let mut by_order: HashMap<Uuid, Vec<OrderItemModel>> = HashMap::new();
    for item in items {
        by_order.entry(item.order_id).or_default().push(item);
    }

    for order in &mut orders {
        order.items = by_order.remove(&order.order_id).unwrap_or_default();
    }

    Ok(orders)
}

#[async_trait]
impl OrderQueryRepositoryTrait for OrderQueryRepository {
    async fn find_by_id(&self, order_id: Uuid) -> Result<Option<OrderModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let order = sqlx::query_as::<_, OrderModel>(
            r#"
            SELECT order_id, user_id, status, total_amount, created_at, updated_at
            FROM orders
            WHERE order_id = $1
            "#,
        )
        .bind(order_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|err| {
            error!("❌ Failed to fetch order {}: {:?}", order_id, err);
            RepositoryError::from_sqlx(err)
        })?;

        let Some(order) = order else {
            info!("🔍 Order {} not found", order_id);
            return Ok(None);
        };

        let mut orders = attach_items(&mut *conn, vec![order]).await?;

        Ok(orders.pop())
    }

    async fn find_all(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<OrderModel>, RepositoryError> {
        info!("🔍 Listing orders limit={} offset={}", limit, offset);

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let orders = sqlx::query_as::<_, OrderModel>(
            r#"
            SELECT order_id, user_id, status, total_amount, created_at, updated_at
            FROM orders
            ORDER BY created_at DESC, order_id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *conn)
        .await
        .map_err(|err| {
            error!("❌ Failed to list orders: {:?}", err);
            RepositoryError::from_sqlx(err)
        })?;

        attach_items(&mut *conn, orders).await
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<OrderModel>, RepositoryError> {
        info!("🔍 Listing orders for user {}", user_id);

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let orders = sqlx::query_as::<_, OrderModel>(
            r#"
            SELECT order_id, user_id, status, total_amount, created_at, updated_at
            FROM orders
            WHERE user_id = $1
            ORDER BY created_at ASC, order_id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(|err| {
            error!("❌ Failed to list orders for user {}: {:?}", user_id, err);
            RepositoryError::from_sqlx(err)
        })?;

        attach_items(&mut *conn, orders).await
    }
}
