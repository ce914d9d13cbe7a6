use crate::{
    abstract_trait::{
        catalog::{DynProductStore, DynUserStore},
        order::{
            repository::{DynOrderCommandRepository, DynOrderQueryRepository, OrderUnitOfWork},
            service::OrderCommandServiceTrait,
        },
    },
    domain::{
        requests::{
            order::{
                CreateOrderRecordRequest, CreateOrderRequest, DEFAULT_ORDER_STATUS,
                UpdateOrderRequest,
            },
            order_item::{
                CreateOrderItemRecordRequest, UpdateOrderItemRecordRequest, UpdateOrderItemRequest,
            },
        },
        response::order::OrderResponse,
    },
    model::order_item::{total_amount, total_of},
};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use prometheus_client::registry::Registry;
use rust_decimal::Decimal;
use shared::{
    domain::responses::ApiResponse,
    errors::{Reference, ServiceError},
    utils::{Method, Metrics, Status as StatusUtils},
};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

#[derive(Clone)]
pub struct OrderCommandService {
    products: DynProductStore,
    users: DynUserStore,
    command: DynOrderCommandRepository,
    query: DynOrderQueryRepository,
    metrics: Metrics,
}

pub struct OrderCommandServiceDeps {
    pub products: DynProductStore,
    pub users: DynUserStore,
    pub command: DynOrderCommandRepository,
    pub query: DynOrderQueryRepository,
}

/// An item whose price has been resolved from the product store.
struct PricedItem {
    product_id: String,
    quantity: i32,
    price: Decimal,
}

fn invalid_item(index: usize, errors: ValidationErrors) -> ServiceError {
    match ServiceError::from(errors) {
        ServiceError::InvalidInput(msg) => {
            ServiceError::InvalidInput(format!("item {index}: {msg}"))
        }
        other => other,
    }
}

impl OrderCommandService {
    pub fn new(deps: OrderCommandServiceDeps, registry: &mut Registry) -> Self {
        let OrderCommandServiceDeps {
            products,
            users,
            command,
            query,
        } = deps;

        let metrics = Metrics::new();
        metrics.register("order_command_service", "OrderCommandService", registry);

        Self {
            products,
            users,
            command,
            query,
            metrics,
        }
    }

    fn complete<T>(
        &self,
        method: Method,
        operation: &str,
        start: Instant,
        result: &Result<T, ServiceError>,
    ) {
        let elapsed = start.elapsed().as_secs_f64();

        match result {
            Ok(_) => {
                info!("✅ Operation completed successfully: {operation}");
                self.metrics.record(method, StatusUtils::Success, elapsed);
            }
            Err(err) => {
                error!("❌ Operation failed: {operation}: {err}");
                self.metrics.record(method, StatusUtils::Error, elapsed);
            }
        }
    }

    async fn resolve_price(&self, product_id: &str) -> Result<Decimal, ServiceError> {
        self.products
            .lookup_price(product_id)
            .await
            .map_err(ServiceError::storage(format!("looking up product {product_id}")))?
            .ok_or_else(|| {
                ServiceError::ReferenceNotFound(Reference::Product(product_id.to_string()))
            })
    }

    /// Same lookup as `resolve_price`, on the connection that holds the
    /// transaction, so an open update never waits on the pool.
    async fn resolve_price_in(
        uow: &mut dyn OrderUnitOfWork,
        product_id: &str,
    ) -> Result<Decimal, ServiceError> {
        uow.lookup_price(product_id)
            .await
            .map_err(ServiceError::storage(format!("looking up product {product_id}")))?
            .ok_or_else(|| {
                ServiceError::ReferenceNotFound(Reference::Product(product_id.to_string()))
            })
    }

    async fn load_response(&self, order_id: Uuid) -> Result<OrderResponse, ServiceError> {
        self.query
            .find_by_id(order_id)
            .await
            .map_err(ServiceError::storage(format!("reloading order {order_id}")))?
            .map(OrderResponse::from)
            .ok_or_else(|| ServiceError::NotFound(format!("order {order_id}")))
    }

    /// Every check runs before the first write.
    async fn validate_create(
        &self,
        req: &CreateOrderRequest,
    ) -> Result<Vec<PricedItem>, ServiceError> {
        if req.user_id.trim().is_empty() {
            return Err(ServiceError::InvalidInput("user_id is required".into()));
        }

        let user_exists = self
            .users
            .exists(&req.user_id)
            .await
            .map_err(ServiceError::storage(format!("checking user {}", req.user_id)))?;

        if !user_exists {
            return Err(ServiceError::ReferenceNotFound(Reference::User(
                req.user_id.clone(),
            )));
        }

        if req.items.is_empty() {
            return Err(ServiceError::InvalidInput(
                "order must contain at least one item".into(),
            ));
        }

        let mut priced = Vec::with_capacity(req.items.len());

        for (index, item) in req.items.iter().enumerate() {
            item.validate().map_err(|e| invalid_item(index, e))?;

            let price = self.resolve_price(&item.product_id).await?;

            if price != item.price {
                debug!(
                    "Item {} price {} replaced by stored price {} of product {}",
                    index, item.price, price, item.product_id
                );
            }

            priced.push(PricedItem {
                product_id: item.product_id.clone(),
                quantity: item.quantity,
                price,
            });
        }

        Ok(priced)
    }

    async fn create_order_inner(
        &self,
        req: &CreateOrderRequest,
    ) -> Result<OrderResponse, ServiceError> {
        let items = self.validate_create(req).await?;

        let now = Utc::now().naive_utc();
        let order_id = Uuid::new_v4();
        let status = if req.status.trim().is_empty() {
            DEFAULT_ORDER_STATUS.to_string()
        } else {
            req.status.clone()
        };
        let total = total_amount(items.iter().map(|item| (item.quantity, item.price)));

        let mut uow = self
            .command
            .begin()
            .await
            .map_err(ServiceError::storage("starting order transaction"))?;

        uow.insert_order(&CreateOrderRecordRequest {
            order_id,
            user_id: req.user_id.clone(),
            status,
            total_amount: total,
            created_at: now,
        })
        .await
        .map_err(ServiceError::storage(format!("inserting order {order_id}")))?;

        for (index, item) in items.into_iter().enumerate() {
            uow.insert_order_item(&CreateOrderItemRecordRequest {
                order_item_id: Uuid::new_v4(),
                order_id,
                product_id: item.product_id,
                quantity: item.quantity,
                price: item.price,
                created_at: now,
            })
            .await
            .map_err(ServiceError::storage(format!(
                "inserting order item {index} of order {order_id}"
            )))?;
        }

        uow.commit()
            .await
            .map_err(ServiceError::storage(format!("committing order {order_id}")))?;

        info!("✅ Order {} committed with total {}", order_id, total);

        self.load_response(order_id).await
    }

    async fn apply_item_patch(
        uow: &mut dyn OrderUnitOfWork,
        order_id: Uuid,
        index: usize,
        patch: &UpdateOrderItemRequest,
        now: NaiveDateTime,
    ) -> Result<(), ServiceError> {
        if patch.delete {
            let order_item_id = patch.order_item_id.ok_or_else(|| {
                ServiceError::InvalidInput(format!(
                    "item {index}: order_item_id is required to delete an item"
                ))
            })?;

            let rows = uow
                .delete_order_item(order_id, order_item_id)
                .await
                .map_err(ServiceError::storage(format!(
                    "deleting order item {order_item_id} (item {index})"
                )))?;

            if rows == 0 {
                warn!(
                    "⚠️ Order item {} already absent from order {}, nothing deleted",
                    order_item_id, order_id
                );
            } else {
                info!("🗑️ Removed order item {} from order {}", order_item_id, order_id);
            }

            return Ok(());
        }

        patch.validate().map_err(|e| invalid_item(index, e))?;

        match patch.order_item_id {
            Some(order_item_id) => {
                let current = uow
                    .find_order_item(order_id, order_item_id)
                    .await
                    .map_err(ServiceError::storage(format!(
                        "loading order item {order_item_id} (item {index})"
                    )))?
                    .ok_or_else(|| {
                        ServiceError::NotFound(format!(
                            "order item {order_item_id} in order {order_id}"
                        ))
                    })?;

                let product_id = patch
                    .product_id
                    .clone()
                    .unwrap_or_else(|| current.product_id.clone());

                let price = if patch.product_id.is_some() || patch.price.is_some() {
                    Self::resolve_price_in(uow, &product_id).await?
                } else {
                    current.price
                };

                uow.update_order_item(&UpdateOrderItemRecordRequest {
                    order_item_id,
                    order_id,
                    product_id,
                    quantity: patch.quantity.unwrap_or(current.quantity),
                    price,
                    updated_at: now,
                })
                .await
                .map_err(ServiceError::storage(format!(
                    "updating order item {order_item_id} (item {index})"
                )))?;
            }
            None => {
                let product_id = patch.product_id.as_deref().ok_or_else(|| {
                    ServiceError::InvalidInput(format!(
                        "item {index}: product_id is required for a new item"
                    ))
                })?;
                let quantity = patch.quantity.ok_or_else(|| {
                    ServiceError::InvalidInput(format!(
                        "item {index}: quantity is required for a new item"
                    ))
                })?;

                let price = Self::resolve_price_in(uow, product_id).await?;

                uow.insert_order_item(&CreateOrderItemRecordRequest {
                    order_item_id: Uuid::new_v4(),
                    order_id,
                    product_id: product_id.to_string(),
                    quantity,
                    price,
                    created_at: now,
                })
                .await
                .map_err(ServiceError::storage(format!(
                    "inserting new order item (item {index})"
                )))?;
            }
        }

        Ok(())
    }

    async fn update_order_inner(
        &self,
        order_id: Uuid,
        req: &UpdateOrderRequest,
    ) -> Result<OrderResponse, ServiceError> {
        let now = Utc::now().naive_utc();
        let status = req.status.as_deref().filter(|s| !s.trim().is_empty());

        let mut uow = self
            .command
            .begin()
            .await
            .map_err(ServiceError::storage("starting order transaction"))?;

        let rows = uow
            .update_order_status(order_id, status, now)
            .await
            .map_err(ServiceError::storage(format!("updating order {order_id}")))?;

        if rows == 0 {
            return Err(ServiceError::NotFound(format!("order {order_id}")));
        }

        for (index, patch) in req.items.iter().enumerate() {
            Self::apply_item_patch(uow.as_mut(), order_id, index, patch, now)
                .await?;
        }

        let items = uow
            .find_items_by_order(order_id)
            .await
            .map_err(ServiceError::storage(format!("re-reading items of order {order_id}")))?;
        let total = total_of(&items);

        uow.update_total_amount(order_id, total)
            .await
            .map_err(ServiceError::storage(format!("updating total of order {order_id}")))?;

        uow.commit()
            .await
            .map_err(ServiceError::storage(format!("committing order {order_id}")))?;

        info!(
            "🔄 Order {} updated: {} items, total {}",
            order_id,
            items.len(),
            total
        );

        self.load_response(order_id).await
    }
}

#[async_trait]
impl OrderCommandServiceTrait for OrderCommandService {
    async fn create_order(
        &self,
        req: &CreateOrderRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        info!("🏗️ Creating new order for user_id={}", req.user_id);
        let start = Instant::now();

        let result = self
            .create_order_inner(req)
            .await
            .map(|order| ApiResponse::success("Order created successfully", order));

        self.complete(Method::Post, "create_order", start, &result);
        result
    }

    async fn update_order(
        &self,
        order_id: Uuid,
        req: &UpdateOrderRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        info!("✏️ Updating order ID={order_id}");
        let start = Instant::now();

        let result = self
            .update_order_inner(order_id, req)
            .await
            .map(|order| ApiResponse::success("Order updated successfully", order));

        self.complete(Method::Put, "update_order", start, &result);
        result
    }

    async fn delete_order(&self, order_id: Uuid) -> Result<ApiResponse<()>, ServiceError> {
        info!("🗑️ Deleting order ID={order_id}");
        let start = Instant::now();

        let result = match self.command.delete_order(order_id).await {
            Ok(0) => Err(ServiceError::NotFound(format!("order {order_id}"))),
            Ok(_) => Ok(ApiResponse::success("Order deleted successfully", ())),
            Err(err) => Err(ServiceError::storage(format!("deleting order {order_id}"))(err)),
        };

        self.complete(Method::Delete, "delete_order", start, &result);
        result
    }

    async fn delete_order_item(
        &self,
        order_item_id: Uuid,
    ) -> Result<ApiResponse<()>, ServiceError> {
        info!("🗑️ Deleting order item ID={order_item_id}");
        let start = Instant::now();

        // the parent order total is left as is until its next update
        let result = match self.command.delete_order_item(order_item_id).await {
            Ok(0) => Err(ServiceError::NotFound(format!("order item {order_item_id}"))),
            Ok(_) => Ok(ApiResponse::success("Order item deleted successfully", ())),
            Err(err) => Err(ServiceError::storage(format!(
                "deleting order item {order_item_id}"
            ))(err)),
        };

        self.complete(Method::Delete, "delete_order_item", start, &result);
        result
    }
}
