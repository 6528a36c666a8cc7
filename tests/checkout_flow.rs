mod common;

use common::{address, auth_user, harness, harness_with_gateway, product, RecordingGateway};
use storefront_api::{
    dto::orders::{CheckoutItem, CheckoutRequest},
    error::AppError,
    ledger::OrderLedger,
    services::{checkout_service, order_service},
};
use uuid::Uuid;

fn request(items: Vec<CheckoutItem>) -> CheckoutRequest {
    CheckoutRequest {
        address: address(),
        items,
    }
}

#[tokio::test]
async fn unauthenticated_checkout_creates_no_order() {
    let apple = product("Apple", 150);
    let h = harness(vec![apple.clone()]);

    let result = checkout_service::checkout(
        &h.state,
        None,
        request(vec![CheckoutItem {
            product_id: apple.id,
            quantity: 1,
        }]),
    )
    .await;

    assert!(matches!(result, Err(AppError::Unauthorized)));
    assert_eq!(h.ledger.order_count().await, 0);
    assert!(h.gateway.requests.lock().await.is_empty());
}

#[tokio::test]
async fn checkout_persists_pending_order_then_returns_redirect() {
    let apple = product("Apple", 150);
    let bread = product("Bread", 300);
    let h = harness(vec![apple.clone(), bread.clone()]);
    let user = auth_user();

    let response = checkout_service::checkout(
        &h.state,
        Some(&user),
        request(vec![
            CheckoutItem {
                product_id: apple.id,
                quantity: 2,
            },
            CheckoutItem {
                product_id: bread.id,
                quantity: 1,
            },
        ]),
    )
    .await
    .expect("checkout failed");

    let entries = h
        .ledger
        .list_for_user(user.user_id)
        .await
        .expect("ledger query failed");
    assert_eq!(entries.len(), 1);
    let entry = &entries[0];

    assert!(!entry.order.paid);
    assert_eq!(entry.order.full_name, "Ada Lovelace");
    assert_eq!(entry.items.len(), 2);
    assert_eq!(entry.items[0].name, "Apple");
    assert_eq!(entry.items[0].price_cents, 150);
    assert_eq!(entry.items[0].quantity, 2);
    assert_eq!(entry.items[1].name, "Bread");
    assert_eq!(entry.items[1].price_cents, 300);

    // the redirect URL comes from the gateway and carries the order id
    let url = response.data.expect("missing body").url;
    assert_eq!(
        url,
        format!("https://pay.example/session/{}", entry.order.id)
    );

    let requests = h.gateway.requests.lock().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].client_reference_id, entry.order.id.to_string());
    assert_eq!(requests[0].currency, "eur");
    assert_eq!(requests[0].line_items.len(), 2);
    assert_eq!(requests[0].line_items[0].unit_amount_cents, 150);
}

#[tokio::test]
async fn checkout_prices_come_from_the_catalog() {
    // the client cannot influence the recorded price; only id and quantity
    // cross the API boundary
    let apple = product("Apple", 150);
    let h = harness(vec![apple.clone()]);
    let user = auth_user();

    checkout_service::checkout(
        &h.state,
        Some(&user),
        request(vec![CheckoutItem {
            product_id: apple.id,
            quantity: 3,
        }]),
    )
    .await
    .expect("checkout failed");

    let entries = h.ledger.list_for_user(user.user_id).await.expect("ledger");
    assert_eq!(entries[0].items[0].price_cents, 150);
}

#[tokio::test]
async fn unresolvable_item_fails_the_whole_checkout() {
    let apple = product("Apple", 150);
    let h = harness(vec![apple.clone()]);
    let user = auth_user();

    let result = checkout_service::checkout(
        &h.state,
        Some(&user),
        request(vec![
            CheckoutItem {
                product_id: apple.id,
                quantity: 1,
            },
            CheckoutItem {
                product_id: Uuid::new_v4(),
                quantity: 1,
            },
        ]),
    )
    .await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));
    assert_eq!(h.ledger.order_count().await, 0);
    assert!(h.gateway.requests.lock().await.is_empty());
}

#[tokio::test]
async fn out_of_range_quantities_are_rejected() {
    let apple = product("Apple", 150);
    let h = harness(vec![apple.clone()]);
    let user = auth_user();

    for quantity in [0, -1, 100] {
        let result = checkout_service::checkout(
            &h.state,
            Some(&user),
            request(vec![CheckoutItem {
                product_id: apple.id,
                quantity,
            }]),
        )
        .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
    assert_eq!(h.ledger.order_count().await, 0);
}

#[tokio::test]
async fn empty_checkout_is_rejected() {
    let h = harness(vec![]);
    let user = auth_user();

    let result = checkout_service::checkout(&h.state, Some(&user), request(vec![])).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));
}

#[tokio::test]
async fn gateway_failure_leaves_the_order_pending() {
    let apple = product("Apple", 150);
    let h = harness_with_gateway(vec![apple.clone()], RecordingGateway::failing());
    let user = auth_user();

    let result = checkout_service::checkout(
        &h.state,
        Some(&user),
        request(vec![CheckoutItem {
            product_id: apple.id,
            quantity: 1,
        }]),
    )
    .await;

    assert!(result.is_err());

    // the order was committed before the gateway call and is recoverable
    let entries = h.ledger.list_for_user(user.user_id).await.expect("ledger");
    assert_eq!(entries.len(), 1);
    assert!(!entries[0].order.paid);

    let pending = h
        .ledger
        .unpaid_before(chrono::Utc::now() + chrono::Duration::seconds(1))
        .await
        .expect("ledger");
    assert_eq!(pending.len(), 1);
}

#[tokio::test]
async fn order_keeps_purchase_time_prices_after_catalog_changes() {
    let mut apple = product("Apple", 150);
    let h = harness(vec![apple.clone()]);
    let user = auth_user();

    checkout_service::checkout(
        &h.state,
        Some(&user),
        request(vec![CheckoutItem {
            product_id: apple.id,
            quantity: 2,
        }]),
    )
    .await
    .expect("checkout failed");

    // reprice the product after the purchase
    apple.price_cents = 999;
    h.catalog.upsert(apple.clone()).await;

    let response = order_service::list_orders(&h.state, &user)
        .await
        .expect("history failed");
    let orders = response.data.expect("missing body").items;
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].items[0].price_cents, 150);
    assert_eq!(orders[0].items[0].name, "Apple");
}
