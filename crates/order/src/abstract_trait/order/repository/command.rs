use crate::{
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
use std::sync::Arc;
use uuid::Uuid;

pub type DynOrderCommandRepository = Arc<dyn OrderCommandRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait OrderCommandRepositoryTrait {
    async fn begin(&self) -> Result<Box<dyn OrderUnitOfWork>, RepositoryError>;
    /// Removes the order and, by cascade, its items. Returns rows affected.
    async fn delete_order(&self, order_id: Uuid) -> Result<u64, RepositoryError>;
    /// Removes one item without touching the parent order. Returns rows affected.
    async fn delete_order_item(&self, order_item_id: Uuid) -> Result<u64, RepositoryError>;
}

/// Writes staged inside one store transaction.
///
/// Nothing is visible to readers until [`OrderUnitOfWork::commit`] succeeds.
/// Dropping the unit without committing rolls every write back.
#[async_trait]
pub trait OrderUnitOfWork: Send {
    async fn insert_order(
        &mut self,
        req: &CreateOrderRecordRequest,
    ) -> Result<OrderModel, RepositoryError>;

    async fn insert_order_item(
        &mut self,
        req: &CreateOrderItemRecordRequest,
    ) -> Result<OrderItemModel, RepositoryError>;

    /// Refreshes `updated_at`, and sets `status` when one is given.
    async fn update_order_status(
        &mut self,
        order_id: Uuid,
        status: Option<&str>,
        updated_at: NaiveDateTime,
    ) -> Result<u64, RepositoryError>;

    /// Stored price of a product, read on the unit's own connection.
    async fn lookup_price(&mut self, product_id: &str) -> Result<Option<Decimal>, RepositoryError>;

    async fn find_order_item(
        &mut self,
        order_id: Uuid,
        order_item_id: Uuid,
    ) -> Result<Option<OrderItemModel>, RepositoryError>;

    async fn update_order_item(
        &mut self,
        req: &UpdateOrderItemRecordRequest,
    ) -> Result<u64, RepositoryError>;

    async fn delete_order_item(
        &mut self,
        order_id: Uuid,
        order_item_id: Uuid,
    ) -> Result<u64, RepositoryError>;

    async fn find_items_by_order(
        &mut self,
        order_id: Uuid,
    ) -> Result<Vec<OrderItemModel>, RepositoryError>;

    async fn update_total_amount(
        &mut self,
        order_id: Uuid,
        total_amount: Decimal,
    ) -> Result<u64, RepositoryError>;

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError>;
}
