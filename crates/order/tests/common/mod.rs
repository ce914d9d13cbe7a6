#![allow(dead_code)]

use order::{
    di::DependenciesInjectDeps,
    domain::requests::{order::CreateOrderRequest, order_item::CreateOrderItemRequest},
    repository::memory::{InMemoryCatalog, InMemoryStore},
    state::AppState,
};
use rust_decimal::Decimal;
use std::str::FromStr;

pub const USER: &str = "user-1";
pub const OTHER_USER: &str = "user-2";

pub struct Fixture {
    pub store: InMemoryStore,
    pub catalog: InMemoryCatalog,
    pub state: AppState,
}

pub fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).expect("valid decimal literal")
}

/// Users `user-1`/`user-2` and products P1 = 9.99, P2 = 20.00, P3 = 50.00.
pub async fn fixture() -> Fixture {
    let store = InMemoryStore::new();
    let catalog = InMemoryCatalog::new();

    catalog.put_user(USER).await;
    catalog.put_user(OTHER_USER).await;
    catalog.put_product("P1", dec("9.99")).await;
    catalog.put_product("P2", dec("20.00")).await;
    catalog.put_product("P3", dec("50.00")).await;

    let state = AppState::new(DependenciesInjectDeps::in_memory(
        store.clone(),
        catalog.clone(),
    ));

    Fixture {
        store,
        catalog,
        state,
    }
}

pub fn item(product_id: &str, quantity: i32, price: &str) -> CreateOrderItemRequest {
    CreateOrderItemRequest {
        product_id: product_id.into(),
        quantity,
        price: dec(price),
    }
}

pub fn create_request(user_id: &str, items: Vec<CreateOrderItemRequest>) -> CreateOrderRequest {
    CreateOrderRequest {
        user_id: user_id.into(),
        status: "pending".into(),
        items,
    }
}
