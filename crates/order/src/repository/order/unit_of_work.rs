use crate::{
    abstract_trait::order::repository::OrderUnitOfWork,
    domain::requests::{
        order::CreateOrderRecordRequest,
        order_item::{CreateOrderItemRecordRequest, UpdateOrderItemRecordRequest},
    },
    model::{order::Order as OrderModel, order_item::OrderItem as OrderItemModel},
};
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use shared::errors::RepositoryError;
use sqlx::{Postgres, Transaction};
use tracing::{debug, error, info};
use uuid::Uuid;

/// A PostgreSQL transaction. sqlx rolls it back when dropped uncommitted.
pub struct PgOrderUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

impl PgOrderUnitOfWork {
    pub fn new(tx: Transaction<'static, Postgres>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl OrderUnitOfWork for PgOrderUnitOfWork {
    async fn insert_order(
        &mut self,
        req: &CreateOrderRecordRequest,
    ) -> Result<OrderModel, RepositoryError> {
        let order = sqlx::query_as::<_, OrderModel>(
            r#"
            INSERT INTO orders (order_id, user_id, status, total_amount, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING order_id, user_id, status, total_amount, created_at, updated_at
            "#,
        )
        .bind(req.order_id)
        .bind(&req.user_id)
        .bind(&req.status)
        .bind(req.total_amount)
        .bind(req.created_at)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|err| {
            error!(
                "❌ Failed to insert order for user {}: {:?}",
                req.user_id, err
            );
            RepositoryError::from_sqlx(err)
        })?;

        info!("✅ Staged order {} for user {}", order.order_id, order.user_id);
        Ok(order)
    }

    async fn insert_order_item(
        &mut self,
        req: &CreateOrderItemRecordRequest,
    ) -> Result<OrderItemModel, RepositoryError> {
        let item = sqlx::query_as::<_, OrderItemModel>(
            r#"
            INSERT INTO order_items
                (order_item_id, order_id, product_id, quantity, price, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING order_item_id, order_id, product_id, quantity, price, created_at, updated_at
            "#,
        )
        .bind(req.order_item_id)
        .bind(req.order_id)
        .bind(&req.product_id)
        .bind(req.quantity)
        .bind(req.price)
        .bind(req.created_at)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|err| {
            error!(
                "❌ Failed to insert item for order {} (product {}): {:?}",
                req.order_id, req.product_id, err
            );
            RepositoryError::from_sqlx(err)
        })?;

        info!(
            "✅ Staged order item {} on order {}",
            item.order_item_id, item.order_id
        );
        Ok(item)
    }

    async fn update_order_status(
        &mut self,
        order_id: Uuid,
        status: Option<&str>,
        updated_at: NaiveDateTime,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET status = COALESCE($2, status),
                updated_at = $3
            WHERE order_id = $1
            "#,
        )
        .bind(order_id)
        .bind(status)
        .bind(updated_at)
        .execute(&mut *self.tx)
        .await
        .map_err(|err| {
            error!("❌ Failed to update order {}: {:?}", order_id, err);
            RepositoryError::from_sqlx(err)
        })?;

        Ok(result.rows_affected())
    }

    async fn find_order_item(
        &mut self,
        order_id: Uuid,
        order_item_id: Uuid,
    ) -> Result<Option<OrderItemModel>, RepositoryError> {
        sqlx::query_as::<_, OrderItemModel>(
            r#"
            SELECT order_item_id, order_id, product_id, quantity, price, created_at, updated_at
            FROM order_items
            WHERE order_id = $1 AND order_item_id = $2
            "#,
        )
        .bind(order_id)
        .bind(order_item_id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|err| {
            error!(
                "❌ Failed to fetch order item {} of order {}: {:?}",
                order_item_id, order_id, err
            );
            RepositoryError::from_sqlx(err)
        })
    }

    async fn update_order_item(
        &mut self,
        req: &UpdateOrderItemRecordRequest,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE order_items
            SET product_id = $3,
                quantity = $4,
                price = $5,
                updated_at = $6
            WHERE order_id = $1 AND order_item_id = $2
            "#,
        )
        .bind(req.order_id)
        .bind(req.order_item_id)
        .bind(&req.product_id)
        .bind(req.quantity)
        .bind(req.price)
        .bind(req.updated_at)
        .execute(&mut *self.tx)
        .await
        .map_err(|err| {
            error!(
                "❌ Failed to update order item {}: {:?}",
                req.order_item_id, err
            );
            RepositoryError::from_sqlx(err)
        })?;

        info!("🔄 Staged update of order item {}", req.order_item_id);
        Ok(result.rows_affected())
    }

    async fn delete_order_item(
        &mut self,
        order_id: Uuid,
        order_item_id: Uuid,
    ) -> Result<u64, RepositoryError> {
        let result =
            sqlx::query("DELETE FROM order_items WHERE order_id = $1 AND order_item_id = $2")
                .bind(order_id)
                .bind(order_item_id)
                .execute(&mut *self.tx)
                .await
                .map_err(|err| {
                    error!("❌ Failed to delete order item {}: {:?}", order_item_id, err);
                    RepositoryError::from_sqlx(err)
                })?;

        Ok(result.rows_affected())
    }

    async fn lookup_price(&mut self, product_id: &str) -> Result<Option<Decimal>, RepositoryError> {
        sqlx::query_scalar::<_, Decimal>("SELECT price FROM products WHERE product_id = $1")
            .bind(product_id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|err| {
                error!("❌ Failed to look up price of product {}: {:?}", product_id, err);
                RepositoryError::from_sqlx(err)
            })
    }

    async fn find_items_by_order(
        &mut self,
        order_id: Uuid,
    ) -> Result<Vec<OrderItemModel>, RepositoryError> {
        sqlx::query_as::<_, OrderItemModel>(
            r#"
            SELECT order_item_id, order_id, product_id, quantity, price, created_at, updated_at
            FROM order_items
            WHERE order_id = $1
            ORDER BY created_at ASC, order_item_id ASC
            "#,
        )
        .bind(order_id)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(|err| {
            error!("❌ Failed to read items of order {}: {:?}", order_id, err);
            RepositoryError::from_sqlx(err)
        })
    }

    async fn update_total_amount(
        &mut self,
        order_id: Uuid,
        total_amount: Decimal,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query("UPDATE orders SET total_amount = $2 WHERE order_id = $1")
            .bind(order_id)
            .bind(total_amount)
            .execute(&mut *self.tx)
            .await
            .map_err(|err| {
                error!("❌ Failed to update total of order {}: {:?}", order_id, err);
                RepositoryError::from_sqlx(err)
            })?;

        debug!("Order {} total set to {}", order_id, total_amount);
        Ok(result.rows_affected())
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        self.tx.commit().await.map_err(|err| {
            error!("❌ Failed to commit transaction: {:?}", err);
            RepositoryError::from(err)
        })
    }
}
