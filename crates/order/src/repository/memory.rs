//! Process-local implementations of every store seam.
//!
//! `InMemoryStore` keeps orders and items behind one async mutex. A unit of
//! work holds that mutex for its whole lifetime and stages writes on a copy of
//! the state, so an uncommitted unit leaves the store untouched when dropped.
//! Product and user records live in `InMemoryCatalog`, behind their own locks.
//! A store built `with_catalog` lets its units of work read prices from it.

use crate::{
    abstract_trait::{
        catalog::{ProductStoreTrait, UserStoreTrait},
        health::StoreHealthTrait,
        order::repository::{
            OrderCommandRepositoryTrait, OrderQueryRepositoryTrait, OrderUnitOfWork,
        },
    },
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
use std::{
    collections::{HashMap, HashSet},
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::debug;
use uuid::Uuid;

const NO_FAILURE: usize = usize::MAX;

#[derive(Debug, Clone, Default)]
struct MemoryState {
    orders: Vec<OrderModel>,
    items: Vec<OrderItemModel>,
}

impl MemoryState {
    fn with_items(&self, order: &OrderModel) -> OrderModel {
        let mut order = order.clone();
        order.items = self
            .items
            .iter()
            .filter(|item| item.order_id == order.order_id)
            .cloned()
            .collect();
        order
    }
}

#[derive(Clone)]
pub struct InMemoryStore {
    state: Arc<Mutex<MemoryState>>,
    fail_item_insert_at: Arc<AtomicUsize>,
    available: Arc<AtomicBool>,
    catalog: InMemoryCatalog,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState::default())),
            fail_item_insert_at: Arc::new(AtomicUsize::new(NO_FAILURE)),
            available: Arc::new(AtomicBool::new(true)),
            catalog: InMemoryCatalog::new(),
        }
    }

    /// Shares order state with `self`; units of work price items from `catalog`.
    pub fn with_catalog(mut self, catalog: InMemoryCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Makes the `index`-th item insert (zero based) of every later unit of
    /// work fail with a storage error. `None` switches the failure off.
    pub fn fail_item_insert_at(&self, index: Option<usize>) {
        self.fail_item_insert_at
            .store(index.unwrap_or(NO_FAILURE), Ordering::SeqCst);
    }

    /// Makes `ping` fail until switched back on.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub async fn order_count(&self) -> usize {
        self.state.lock().await.orders.len()
    }

    pub async fn item_count(&self) -> usize {
        self.state.lock().await.items.len()
    }
}

#[async_trait]
impl StoreHealthTrait for InMemoryStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(RepositoryError::Custom("store marked unavailable".into()))
        }
    }
}

#[async_trait]
impl OrderQueryRepositoryTrait for InMemoryStore {
    async fn find_by_id(&self, order_id: Uuid) -> Result<Option<OrderModel>, RepositoryError> {
        let state = self.state.lock().await;

        Ok(state
            .orders
            .iter()
            .find(|order| order.order_id == order_id)
            .map(|order| state.with_items(order)))
    }

    async fn find_all(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<OrderModel>, RepositoryError> {
        let state = self.state.lock().await;

        let mut ranked: Vec<(usize, &OrderModel)> = state.orders.iter().enumerate().collect();
        // newest first; later inserts win ties on equal timestamps
        ranked.sort_by(|(ia, a), (ib, b)| b.created_at.cmp(&a.created_at).then(ib.cmp(ia)));

        Ok(ranked
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .map(|(_, order)| state.with_items(order))
            .collect())
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<OrderModel>, RepositoryError> {
        let state = self.state.lock().await;

        Ok(state
            .orders
            .iter()
            .filter(|order| order.user_id == user_id)
            .map(|order| state.with_items(order))
            .collect())
    }
}

#[async_trait]
impl OrderCommandRepositoryTrait for InMemoryStore {
    async fn begin(&self) -> Result<Box<dyn OrderUnitOfWork>, RepositoryError> {
        let guard = self.state.clone().lock_owned().await;
        let working = guard.clone();
        let fail_at = match self.fail_item_insert_at.load(Ordering::SeqCst) {
            NO_FAILURE => None,
            index => Some(index),
        };

        Ok(Box::new(MemoryUnitOfWork {
            guard,
            working,
            fail_item_insert_at: fail_at,
            item_inserts: 0,
            catalog: self.catalog.clone(),
        }))
    }

    async fn delete_order(&self, order_id: Uuid) -> Result<u64, RepositoryError> {
        let mut state = self.state.lock().await;

        let before = state.orders.len();
        state.orders.retain(|order| order.order_id != order_id);
        let removed = before - state.orders.len();

        if removed > 0 {
            state.items.retain(|item| item.order_id != order_id);
        }

        Ok(removed as u64)
    }

    async fn delete_order_item(&self, order_item_id: Uuid) -> Result<u64, RepositoryError> {
        let mut state = self.state.lock().await;

        let before = state.items.len();
        state.items.retain(|item| item.order_item_id != order_item_id);

        Ok((before - state.items.len()) as u64)
    }
}

pub struct MemoryUnitOfWork {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
    fail_item_insert_at: Option<usize>,
    item_inserts: usize,
    catalog: InMemoryCatalog,
}

#[async_trait]
impl OrderUnitOfWork for MemoryUnitOfWork {
    async fn insert_order(
        &mut self,
        req: &CreateOrderRecordRequest,
    ) -> Result<OrderModel, RepositoryError> {
        if self
            .working
            .orders
            .iter()
            .any(|order| order.order_id == req.order_id)
        {
            return Err(RepositoryError::Custom(format!(
                "duplicate order id {}",
                req.order_id
            )));
        }

        let order = OrderModel {
            order_id: req.order_id,
            user_id: req.user_id.clone(),
            status: req.status.clone(),
            total_amount: req.total_amount,
            created_at: req.created_at,
            updated_at: req.created_at,
            items: Vec::new(),
        };
        self.working.orders.push(order.clone());

        Ok(order)
    }

    async fn insert_order_item(
        &mut self,
        req: &CreateOrderItemRecordRequest,
    ) -> Result<OrderItemModel, RepositoryError> {
        let attempt = self.item_inserts;
        self.item_inserts += 1;

        if self.fail_item_insert_at == Some(attempt) {
            debug!("Injected failure on item insert {}", attempt);
            return Err(RepositoryError::Custom(format!(
                "injected failure on item insert {attempt}"
            )));
        }

        if !self
            .working
            .orders
            .iter()
            .any(|order| order.order_id == req.order_id)
        {
            return Err(RepositoryError::ForeignKey(format!(
                "order {} does not exist",
                req.order_id
            )));
        }

        let item = OrderItemModel {
            order_item_id: req.order_item_id,
            order_id: req.order_id,
            product_id: req.product_id.clone(),
            quantity: req.quantity,
            price: req.price,
            created_at: req.created_at,
            updated_at: req.created_at,
        };
        self.working.items.push(item.clone());

        Ok(item)
    }

    async fn update_order_status(
        &mut self,
        order_id: Uuid,
        status: Option<&str>,
        updated_at: NaiveDateTime,
    ) -> Result<u64, RepositoryError> {
        let Some(order) = self
            .working
            .orders
            .iter_mut()
            .find(|order| order.order_id == order_id)
        else {
            return Ok(0);
        };

        if let Some(status) = status {
            order.status = status.to_string();
        }
        order.updated_at = updated_at;

        Ok(1)
    }

    async fn lookup_price(&mut self, product_id: &str) -> Result<Option<Decimal>, RepositoryError> {
        self.catalog.lookup_price(product_id).await
    }

    async fn find_order_item(
        &mut self,
        order_id: Uuid,
        order_item_id: Uuid,
    ) -> Result<Option<OrderItemModel>, RepositoryError> {
        Ok(self
            .working
            .items
            .iter()
            .find(|item| item.order_id == order_id && item.order_item_id == order_item_id)
            .cloned())
    }

    async fn update_order_item(
        &mut self,
        req: &UpdateOrderItemRecordRequest,
    ) -> Result<u64, RepositoryError> {
        let Some(item) = self.working.items.iter_mut().find(|item| {
            item.order_id == req.order_id && item.order_item_id == req.order_item_id
        }) else {
            return Ok(0);
        };

        item.product_id = req.product_id.clone();
        item.quantity = req.quantity;
        item.price = req.price;
        item.updated_at = req.updated_at;

        Ok(1)
    }

    async fn delete_order_item(
        &mut self,
        order_id: Uuid,
        order_item_id: Uuid,
    ) -> Result<u64, RepositoryError> {
        let before = self.working.items.len();
        self.working
            .items
            .retain(|item| !(item.order_id == order_id && item.order_item_id == order_item_id));

        Ok((before - self.working.items.len()) as u64)
    }

    async fn find_items_by_order(
        &mut self,
        order_id: Uuid,
    ) -> Result<Vec<OrderItemModel>, RepositoryError> {
        Ok(self
            .working
            .items
            .iter()
            .filter(|item| item.order_id == order_id)
            .cloned()
            .collect())
    }

    async fn update_total_amount(
        &mut self,
        order_id: Uuid,
        total_amount: Decimal,
    ) -> Result<u64, RepositoryError> {
        let Some(order) = self
            .working
            .orders
            .iter_mut()
            .find(|order| order.order_id == order_id)
        else {
            return Ok(0);
        };

        order.total_amount = total_amount;

        Ok(1)
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        let MemoryUnitOfWork {
            mut guard, working, ..
        } = *self;
        *guard = working;

        Ok(())
    }
}

/// Product prices and user ids the order service validates against.
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    products: Arc<RwLock<HashMap<String, Decimal>>>,
    users: Arc<RwLock<HashSet<String>>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or reprices a product.
    pub async fn put_product(&self, product_id: impl Into<String>, price: Decimal) {
        self.products.write().await.insert(product_id.into(), price);
    }

    pub async fn put_user(&self, user_id: impl Into<String>) {
        self.users.write().await.insert(user_id.into());
    }
}

#[async_trait]
impl ProductStoreTrait for InMemoryCatalog {
    async fn lookup_price(&self, product_id: &str) -> Result<Option<Decimal>, RepositoryError> {
        Ok(self.products.read().await.get(product_id).copied())
    }
}

#[async_trait]
impl UserStoreTrait for InMemoryCatalog {
    async fn exists(&self, user_id: &str) -> Result<bool, RepositoryError> {
        Ok(self.users.read().await.contains(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn order_record(user_id: &str) -> CreateOrderRecordRequest {
        CreateOrderRecordRequest {
            order_id: Uuid::new_v4(),
            user_id: user_id.into(),
            status: "pending".into(),
            total_amount: Decimal::ZERO,
            created_at: Utc::now().naive_utc(),
        }
    }

    #[tokio::test]
    async fn dropped_unit_of_work_leaves_store_untouched() {
        let store = InMemoryStore::new();

        {
            let mut uow = store.begin().await.unwrap();
            uow.insert_order(&order_record("u-1")).await.unwrap();
        }

        assert_eq!(store.order_count().await, 0);
    }

    #[tokio::test]
    async fn committed_unit_of_work_is_visible() {
        let store = InMemoryStore::new();
        let record = order_record("u-1");

        let mut uow = store.begin().await.unwrap();
        uow.insert_order(&record).await.unwrap();
        uow.commit().await.unwrap();

        let found = store.find_by_id(record.order_id).await.unwrap();
        assert_eq!(found.map(|o| o.user_id), Some("u-1".to_string()));
    }

    #[tokio::test]
    async fn item_insert_requires_parent_order() {
        let store = InMemoryStore::new();
        let mut uow = store.begin().await.unwrap();

        let err = uow
            .insert_order_item(&CreateOrderItemRecordRequest {
                order_item_id: Uuid::new_v4(),
                order_id: Uuid::new_v4(),
                product_id: "P1".into(),
                quantity: 1,
                price: Decimal::ONE,
                created_at: Utc::now().naive_utc(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, RepositoryError::ForeignKey(_)));
    }

    #[tokio::test]
    async fn unit_of_work_reads_prices_from_attached_catalog() {
        let catalog = InMemoryCatalog::new();
        catalog.put_product("P1", Decimal::new(999, 2)).await;

        let bare = InMemoryStore::new();
        let priced = bare.clone().with_catalog(catalog);

        let mut uow = priced.begin().await.unwrap();
        assert_eq!(
            uow.lookup_price("P1").await.unwrap(),
            Some(Decimal::new(999, 2))
        );
        assert_eq!(uow.lookup_price("P9").await.unwrap(), None);
        drop(uow);

        let mut uow = bare.begin().await.unwrap();
        assert_eq!(uow.lookup_price("P1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_order_cascades_to_items() {
        let store = InMemoryStore::new();
        let record = order_record("u-1");

        let mut uow = store.begin().await.unwrap();
        uow.insert_order(&record).await.unwrap();
        uow.insert_order_item(&CreateOrderItemRecordRequest {
            order_item_id: Uuid::new_v4(),
            order_id: record.order_id,
            product_id: "P1".into(),
            quantity: 2,
            price: Decimal::ONE,
            created_at: record.created_at,
        })
        .await
        .unwrap();
        uow.commit().await.unwrap();

        assert_eq!(store.delete_order(record.order_id).await.unwrap(), 1);
        assert_eq!(store.item_count().await, 0);
        assert_eq!(store.delete_order(record.order_id).await.unwrap(), 0);
    }
}
