mod common;

use common::{OTHER_USER, USER, create_request, dec, fixture, item};
use order::{
    abstract_trait::order::service::{OrderCommandServiceTrait, OrderQueryServiceTrait},
    domain::{
        requests::{
            order::{ListOrdersQuery, UpdateOrderRequest},
            order_item::UpdateOrderItemRequest,
        },
        response::order::OrderResponse,
    },
};
use rust_decimal::Decimal;
use shared::errors::{ErrorKind, Reference, ServiceError};
use uuid::Uuid;

fn assert_total_invariant(order: &OrderResponse) {
    let expected: Decimal = order
        .items
        .iter()
        .map(|item| Decimal::from(item.quantity) * item.price)
        .sum();
    assert_eq!(order.total_amount, expected);
}

async fn two_item_order(fx: &common::Fixture) -> OrderResponse {
    fx.state
        .di_container
        .order_command
        .create_order(&create_request(
            USER,
            vec![item("P1", 2, "1.00"), item("P2", 1, "1.00")],
        ))
        .await
        .unwrap()
        .data
}

#[tokio::test]
async fn create_resolves_prices_and_totals_exactly() {
    let fx = fixture().await;

    let order = two_item_order(&fx).await;

    assert_eq!(order.user_id, USER);
    assert_eq!(order.status, "pending");
    assert_eq!(order.items.len(), 2);
    assert_eq!(order.items[0].price, dec("9.99"));
    assert_eq!(order.items[1].price, dec("20.00"));
    assert_eq!(order.total_amount, dec("39.98"));
    assert!(order.items.iter().all(|i| i.order_id == order.order_id));
    assert_total_invariant(&order);
}

#[tokio::test]
async fn item_delete_leaves_total_stale_until_next_update() {
    let fx = fixture().await;
    let commands = &fx.state.di_container.order_command;
    let queries = &fx.state.di_container.order_query;

    let order = two_item_order(&fx).await;
    let p1_item = order.items[0].order_item_id;

    commands.delete_order_item(p1_item).await.unwrap();

    let reloaded = queries.find_by_id(order.order_id).await.unwrap().data;
    assert_eq!(reloaded.items.len(), 1);
    assert_eq!(reloaded.items[0].product_id, "P2");
    assert_eq!(reloaded.total_amount, dec("39.98"));

    let updated = commands
        .update_order(order.order_id, &UpdateOrderRequest::default())
        .await
        .unwrap()
        .data;
    assert_eq!(updated.total_amount, dec("20.00"));
    assert_total_invariant(&updated);
}

#[tokio::test]
async fn stored_price_wins_over_client_price() {
    let fx = fixture().await;

    let order = fx
        .state
        .di_container
        .order_command
        .create_order(&create_request(USER, vec![item("P3", 1, "1.00")]))
        .await
        .unwrap()
        .data;

    assert_eq!(order.items[0].price, dec("50.00"));
    assert_eq!(order.total_amount, dec("50.00"));
}

#[tokio::test]
async fn empty_status_defaults_to_pending() {
    let fx = fixture().await;
    let mut req = create_request(USER, vec![item("P1", 1, "9.99")]);
    req.status = String::new();

    let order = fx
        .state
        .di_container
        .order_command
        .create_order(&req)
        .await
        .unwrap()
        .data;

    assert_eq!(order.status, "pending");
}

#[tokio::test]
async fn unknown_user_is_rejected_before_any_write() {
    let fx = fixture().await;

    let err = fx
        .state
        .di_container
        .order_command
        .create_order(&create_request("ghost", vec![item("P1", 1, "9.99")]))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ReferenceNotFound);
    assert!(matches!(
        err,
        ServiceError::ReferenceNotFound(Reference::User(ref id)) if id == "ghost"
    ));
    assert_eq!(fx.store.order_count().await, 0);
}

#[tokio::test]
async fn create_input_checks() {
    let fx = fixture().await;
    let commands = &fx.state.di_container.order_command;

    let err = commands
        .create_order(&create_request("", vec![item("P1", 1, "9.99")]))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let err = commands
        .create_order(&create_request(USER, vec![]))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    for bad in [item("", 1, "1.00"), item("P1", 0, "1.00"), item("P1", 1, "0")] {
        let err = commands
            .create_order(&create_request(USER, vec![bad]))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    assert_eq!(fx.store.order_count().await, 0);
}

#[tokio::test]
async fn one_bad_item_among_valid_ones_writes_nothing() {
    let fx = fixture().await;
    let commands = &fx.state.di_container.order_command;

    let err = commands
        .create_order(&create_request(
            USER,
            vec![item("P1", 1, "9.99"), item("P2", -1, "20.00"), item("P3", 1, "50.00")],
        ))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert!(err.to_string().contains("item 1"));

    let err = commands
        .create_order(&create_request(
            USER,
            vec![item("P1", 1, "9.99"), item("NOPE", 1, "5.00")],
        ))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::ReferenceNotFound(Reference::Product(ref id)) if id == "NOPE"
    ));

    assert_eq!(fx.store.order_count().await, 0);
    assert_eq!(fx.store.item_count().await, 0);
}

#[tokio::test]
async fn failed_item_insert_rolls_back_the_whole_order() {
    let fx = fixture().await;
    fx.store.fail_item_insert_at(Some(1));

    let err = fx
        .state
        .di_container
        .order_command
        .create_order(&create_request(
            USER,
            vec![item("P1", 1, "9.99"), item("P2", 1, "20.00"), item("P3", 1, "50.00")],
        ))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::StorageFailure);
    assert!(err.to_string().contains("order item 1"));
    assert_eq!(fx.store.order_count().await, 0);
    assert_eq!(fx.store.item_count().await, 0);

    let listed = fx
        .state
        .di_container
        .order_query
        .find_by_user(USER)
        .await
        .unwrap()
        .data;
    assert!(listed.is_empty());
}

#[tokio::test]
async fn get_unknown_order_is_not_found() {
    let fx = fixture().await;

    let err = fx
        .state
        .di_container
        .order_query
        .find_by_id(Uuid::new_v4())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn update_merges_item_patches_and_recomputes_total() {
    let fx = fixture().await;
    let commands = &fx.state.di_container.order_command;

    let order = two_item_order(&fx).await;
    let p1_item = order.items[0].order_item_id;
    let p2_item = order.items[1].order_item_id;

    let patch = UpdateOrderRequest {
        status: Some("confirmed".into()),
        items: vec![
            UpdateOrderItemRequest {
                order_item_id: Some(p1_item),
                quantity: Some(3),
                ..Default::default()
            },
            UpdateOrderItemRequest {
                order_item_id: Some(p2_item),
                delete: true,
                ..Default::default()
            },
            UpdateOrderItemRequest {
                product_id: Some("P3".into()),
                quantity: Some(1),
                price: Some(dec("0.01")),
                ..Default::default()
            },
        ],
    };

    let updated = commands
        .update_order(order.order_id, &patch)
        .await
        .unwrap()
        .data;

    assert_eq!(updated.status, "confirmed");
    assert_eq!(updated.items.len(), 2);

    let p1 = updated
        .items
        .iter()
        .find(|i| i.order_item_id == p1_item)
        .unwrap();
    assert_eq!(p1.quantity, 3);
    assert_eq!(p1.price, dec("9.99"));

    let added = updated.items.iter().find(|i| i.product_id == "P3").unwrap();
    assert_eq!(added.price, dec("50.00"));

    // 3 × 9.99 + 1 × 50.00
    assert_eq!(updated.total_amount, dec("79.97"));
    assert_total_invariant(&updated);
    assert!(updated.updated_at >= order.updated_at);
    assert_eq!(updated.created_at, order.created_at);
}

#[tokio::test]
async fn missing_status_keeps_current_status() {
    let fx = fixture().await;
    let commands = &fx.state.di_container.order_command;
    let order = two_item_order(&fx).await;

    let updated = commands
        .update_order(
            order.order_id,
            &UpdateOrderRequest {
                status: None,
                items: vec![],
            },
        )
        .await
        .unwrap()
        .data;

    assert_eq!(updated.status, "pending");
    assert_eq!(updated.total_amount, dec("39.98"));
}

#[tokio::test]
async fn changing_product_reprices_from_store() {
    let fx = fixture().await;
    let commands = &fx.state.di_container.order_command;
    let order = two_item_order(&fx).await;
    let p1_item = order.items[0].order_item_id;

    fx.catalog.put_product("P1", dec("12.50")).await;

    let updated = commands
        .update_order(
            order.order_id,
            &UpdateOrderRequest {
                status: None,
                items: vec![UpdateOrderItemRequest {
                    order_item_id: Some(p1_item),
                    product_id: Some("P3".into()),
                    price: Some(dec("1.00")),
                    ..Default::default()
                }],
            },
        )
        .await
        .unwrap()
        .data;

    let changed = updated
        .items
        .iter()
        .find(|i| i.order_item_id == p1_item)
        .unwrap();
    assert_eq!(changed.product_id, "P3");
    assert_eq!(changed.price, dec("50.00"));
    assert_eq!(changed.quantity, 2);

    // the untouched P2 line keeps its snapshot price
    let p2 = updated.items.iter().find(|i| i.product_id == "P2").unwrap();
    assert_eq!(p2.price, dec("20.00"));
    assert_eq!(updated.total_amount, dec("120.00"));
}

#[tokio::test]
async fn deleting_the_same_item_twice_is_not_an_error() {
    let fx = fixture().await;
    let commands = &fx.state.di_container.order_command;
    let order = two_item_order(&fx).await;
    let p1_item = order.items[0].order_item_id;

    let patch = UpdateOrderRequest {
        status: None,
        items: vec![UpdateOrderItemRequest {
            order_item_id: Some(p1_item),
            delete: true,
            ..Default::default()
        }],
    };

    let first = commands
        .update_order(order.order_id, &patch)
        .await
        .unwrap()
        .data;
    let second = commands
        .update_order(order.order_id, &patch)
        .await
        .unwrap()
        .data;

    assert_eq!(first.items.len(), 1);
    assert_eq!(second.items.len(), 1);
    assert_eq!(second.total_amount, dec("20.00"));
}

#[tokio::test]
async fn failed_patch_leaves_order_as_it_was() {
    let fx = fixture().await;
    let commands = &fx.state.di_container.order_command;
    let queries = &fx.state.di_container.order_query;
    let order = two_item_order(&fx).await;

    let cases = vec![
        (
            UpdateOrderItemRequest {
                delete: true,
                ..Default::default()
            },
            ErrorKind::InvalidInput,
        ),
        (
            UpdateOrderItemRequest {
                product_id: Some("NOPE".into()),
                quantity: Some(1),
                ..Default::default()
            },
            ErrorKind::ReferenceNotFound,
        ),
        (
            UpdateOrderItemRequest {
                order_item_id: Some(Uuid::new_v4()),
                quantity: Some(4),
                ..Default::default()
            },
            ErrorKind::NotFound,
        ),
        (
            UpdateOrderItemRequest {
                order_item_id: Some(order.items[1].order_item_id),
                quantity: Some(0),
                ..Default::default()
            },
            ErrorKind::InvalidInput,
        ),
        (
            UpdateOrderItemRequest {
                quantity: Some(1),
                ..Default::default()
            },
            ErrorKind::InvalidInput,
        ),
    ];

    for (bad_patch, expected) in cases {
        // an earlier, valid patch in the same call must be undone too
        let patch = UpdateOrderRequest {
            status: Some("cancelled".into()),
            items: vec![
                UpdateOrderItemRequest {
                    order_item_id: Some(order.items[0].order_item_id),
                    delete: true,
                    ..Default::default()
                },
                bad_patch,
            ],
        };

        let err = commands
            .update_order(order.order_id, &patch)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), expected);

        let current = queries.find_by_id(order.order_id).await.unwrap().data;
        assert_eq!(current, order);
    }
}

#[tokio::test]
async fn failed_insert_during_update_rolls_back() {
    let fx = fixture().await;
    let commands = &fx.state.di_container.order_command;
    let queries = &fx.state.di_container.order_query;
    let order = two_item_order(&fx).await;

    fx.store.fail_item_insert_at(Some(0));

    let err = commands
        .update_order(
            order.order_id,
            &UpdateOrderRequest {
                status: Some("confirmed".into()),
                items: vec![UpdateOrderItemRequest {
                    product_id: Some("P3".into()),
                    quantity: Some(2),
                    ..Default::default()
                }],
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StorageFailure);

    let current = queries.find_by_id(order.order_id).await.unwrap().data;
    assert_eq!(current, order);
}

#[tokio::test]
async fn update_unknown_order_is_not_found() {
    let fx = fixture().await;

    let err = fx
        .state
        .di_container
        .order_command
        .update_order(
            Uuid::new_v4(),
            &UpdateOrderRequest {
                status: Some("confirmed".into()),
                items: vec![UpdateOrderItemRequest {
                    product_id: Some("P1".into()),
                    quantity: Some(1),
                    ..Default::default()
                }],
            },
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(fx.store.order_count().await, 0);
    assert_eq!(fx.store.item_count().await, 0);
}

#[tokio::test]
async fn delete_order_cascades_and_reports_missing() {
    let fx = fixture().await;
    let commands = &fx.state.di_container.order_command;
    let order = two_item_order(&fx).await;

    commands.delete_order(order.order_id).await.unwrap();

    assert_eq!(fx.store.order_count().await, 0);
    assert_eq!(fx.store.item_count().await, 0);

    let err = commands.delete_order(order.order_id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn delete_unknown_item_is_not_found() {
    let fx = fixture().await;

    let err = fx
        .state
        .di_container
        .order_command
        .delete_order_item(Uuid::new_v4())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn list_all_applies_bounds_newest_first() {
    let fx = fixture().await;
    let commands = &fx.state.di_container.order_command;
    let queries = &fx.state.di_container.order_query;

    let mut created = Vec::new();
    for _ in 0..105 {
        let order = commands
            .create_order(&create_request(USER, vec![item("P1", 1, "9.99")]))
            .await
            .unwrap()
            .data;
        created.push(order.order_id);
    }

    let page = queries
        .find_all(&ListOrdersQuery::new(Some(500), Some(-5)))
        .await
        .unwrap()
        .data;
    assert_eq!(page.len(), 100);
    assert_eq!(page[0].order_id, *created.last().unwrap());
    assert!(page.iter().all(|o| o.items.len() == 1));

    let default_page = queries
        .find_all(&ListOrdersQuery::default())
        .await
        .unwrap()
        .data;
    assert_eq!(default_page.len(), 10);

    let tail = queries
        .find_all(&ListOrdersQuery::new(Some(10), Some(100)))
        .await
        .unwrap()
        .data;
    assert_eq!(tail.len(), 5);
    assert_eq!(tail.last().map(|o| o.order_id), created.first().copied());
}

#[tokio::test]
async fn list_by_user_returns_only_that_users_orders() {
    let fx = fixture().await;
    let commands = &fx.state.di_container.order_command;
    let queries = &fx.state.di_container.order_query;

    two_item_order(&fx).await;
    two_item_order(&fx).await;
    commands
        .create_order(&create_request(OTHER_USER, vec![item("P2", 1, "20.00")]))
        .await
        .unwrap();

    let mine = queries.find_by_user(USER).await.unwrap().data;
    assert_eq!(mine.len(), 2);
    assert!(mine.iter().all(|o| o.user_id == USER && o.items.len() == 2));

    let theirs = queries.find_by_user(OTHER_USER).await.unwrap().data;
    assert_eq!(theirs.len(), 1);

    assert!(queries.find_by_user("nobody").await.unwrap().data.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_updates_all_price_new_items() {
    let fx = fixture().await;
    let commands = fx.state.di_container.order_command.clone();

    let mut order_ids = Vec::new();
    for _ in 0..4 {
        order_ids.push(two_item_order(&fx).await.order_id);
    }

    let handles: Vec<_> = order_ids
        .into_iter()
        .map(|order_id| {
            let commands = commands.clone();
            tokio::spawn(async move {
                let patch = UpdateOrderRequest {
                    status: None,
                    items: vec![UpdateOrderItemRequest {
                        product_id: Some("P3".into()),
                        quantity: Some(1),
                        ..Default::default()
                    }],
                };
                commands.update_order(order_id, &patch).await
            })
        })
        .collect();

    for handle in handles {
        let updated = handle.await.unwrap().unwrap().data;
        assert_eq!(updated.items.len(), 3);
        assert_eq!(updated.total_amount, dec("89.98"));
        assert_total_invariant(&updated);
    }
}
