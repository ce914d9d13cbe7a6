use crate::{
    abstract_trait::order::{repository::DynOrderQueryRepository, service::OrderQueryServiceTrait},
    domain::{requests::order::ListOrdersQuery, response::order::OrderResponse},
};
use anyhow::Result;
use async_trait::async_trait;
use prometheus_client::registry::Registry;
use shared::{
    domain::responses::ApiResponse,
    errors::ServiceError,
    utils::{Method, Metrics, Status as StatusUtils},
};
use tokio::time::Instant;
use tracing::{error, info};
use uuid::Uuid;

#[derive(Clone)]
pub struct OrderQueryService {
    query: DynOrderQueryRepository,
    metrics: Metrics,
}

impl OrderQueryService {
    pub fn new(query: DynOrderQueryRepository, registry: &mut Registry) -> Self {
        let metrics = Metrics::new();
        metrics.register("order_query_service", "OrderQueryService", registry);

        Self { query, metrics }
    }

    fn complete<T>(
        &self,
        operation: &str,
        start: Instant,
        result: &Result<T, ServiceError>,
    ) {
        let elapsed = start.elapsed().as_secs_f64();

        match result {
            Ok(_) => {
                info!("✅ Operation completed successfully: {operation}");
                self.metrics
                    .record(Method::Get, StatusUtils::Success, elapsed);
            }
            Err(err) => {
                error!("❌ Operation failed: {operation}: {err}");
                self.metrics.record(Method::Get, StatusUtils::Error, elapsed);
            }
        }
    }
}

#[async_trait]
impl OrderQueryServiceTrait for OrderQueryService {
    async fn find_by_id(&self, order_id: Uuid) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        info!("🔍 Fetching order {order_id}");
        let start = Instant::now();

        let result = match self.query.find_by_id(order_id).await {
            Ok(Some(order)) => Ok(ApiResponse::success(
                "Order retrieved successfully",
                OrderResponse::from(order),
            )),
            Ok(None) => Err(ServiceError::NotFound(format!("order {order_id}"))),
            Err(err) => Err(ServiceError::storage(format!("loading order {order_id}"))(
                err,
            )),
        };

        self.complete("find_by_id", start, &result);
        result
    }

    async fn find_all(
        &self,
        req: &ListOrdersQuery,
    ) -> Result<ApiResponse<Vec<OrderResponse>>, ServiceError> {
        let (limit, offset) = req.normalize();
        info!("🔍 Listing orders limit={limit} offset={offset}");
        let start = Instant::now();

        let result = self
            .query
            .find_all(limit, offset)
            .await
            .map_err(ServiceError::storage("listing orders"))
            .map(|orders| {
                ApiResponse::success(
                    "Orders retrieved successfully",
                    orders.into_iter().map(OrderResponse::from).collect(),
                )
            });

        self.complete("find_all", start, &result);
        result
    }

    async fn find_by_user(
        &self,
        user_id: &str,
    ) -> Result<ApiResponse<Vec<OrderResponse>>, ServiceError> {
        info!("🔍 Listing orders of user {user_id}");
        let start = Instant::now();

        let result = if user_id.trim().is_empty() {
            Err(ServiceError::InvalidInput("user_id is required".into()))
        } else {
            self.query
                .find_by_user(user_id)
                .await
                .map_err(ServiceError::storage(format!(
                    "listing orders of user {user_id}"
                )))
                .map(|orders| {
                    ApiResponse::success(
                        "Orders retrieved successfully",
                        orders.into_iter().map(OrderResponse::from).collect(),
                    )
                })
        };

        self.complete("find_by_user", start, &result);
        result
    }
}
