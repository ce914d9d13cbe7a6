use crate::{
    abstract_trait::{
        catalog::{DynProductStore, DynUserStore},
        health::DynStoreHealth,
        order::{
            repository::{DynOrderCommandRepository, DynOrderQueryRepository},
            service::{DynOrderCommandService, DynOrderQueryService},
        },
    },
    repository::{
        catalog::{ProductRepository, UserRepository},
        health::HealthRepository,
        memory::{InMemoryCatalog, InMemoryStore},
        order::{OrderCommandRepository, OrderQueryRepository},
    },
    service::order::{OrderCommandService, OrderCommandServiceDeps, OrderQueryService},
};
use prometheus_client::registry::Registry;
use shared::config::ConnectionPool;
use std::{fmt, sync::Arc};

#[derive(Clone)]
pub struct DependenciesInject {
    pub order_command: DynOrderCommandService,
    pub order_query: DynOrderQueryService,
    pub health: DynStoreHealth,
}

impl fmt::Debug for DependenciesInject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependenciesInject")
            .field("order_command", &"OrderCommandService")
            .field("order_query", &"OrderQueryService")
            .field("health", &"StoreHealth")
            .finish()
    }
}

/// The store handles the services are built from.
#[derive(Clone)]
pub struct DependenciesInjectDeps {
    pub products: DynProductStore,
    pub users: DynUserStore,
    pub order_command: DynOrderCommandRepository,
    pub order_query: DynOrderQueryRepository,
    pub health: DynStoreHealth,
}

impl DependenciesInjectDeps {
    pub fn from_pool(pool: ConnectionPool) -> Self {
        Self {
            products: Arc::new(ProductRepository::new(pool.clone())),
            users: Arc::new(UserRepository::new(pool.clone())),
            order_command: Arc::new(OrderCommandRepository::new(pool.clone())),
            order_query: Arc::new(OrderQueryRepository::new(pool.clone())),
            health: Arc::new(HealthRepository::new(pool)),
        }
    }

    pub fn in_memory(store: InMemoryStore, catalog: InMemoryCatalog) -> Self {
        Self {
            products: Arc::new(catalog.clone()),
            users: Arc::new(catalog.clone()),
            order_command: Arc::new(store.clone().with_catalog(catalog)),
            order_query: Arc::new(store.clone()),
            health: Arc::new(store),
        }
    }
}

impl DependenciesInject {
    pub fn new(deps: DependenciesInjectDeps, registry: &mut Registry) -> Self {
        let DependenciesInjectDeps {
            products,
            users,
            order_command,
            order_query,
            health,
        } = deps;

        let order_query_service: DynOrderQueryService =
            Arc::new(OrderQueryService::new(order_query.clone(), registry));

        let order_command_service: DynOrderCommandService = Arc::new(OrderCommandService::new(
            OrderCommandServiceDeps {
                products,
                users,
                command: order_command,
                query: order_query,
            },
            registry,
        ));

        Self {
            order_command: order_command_service,
            order_query: order_query_service,
            health,
        }
    }
}
