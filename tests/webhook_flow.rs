mod common;

use chrono::Utc;
use common::{address, harness, WEBHOOK_SECRET};
use storefront_api::{
    error::AppError,
    ledger::{NewOrder, NewOrderItem, OrderLedger, ShippingAddress},
    services::webhook_service,
    state::AppState,
    webhook::sign_payload,
};
use uuid::Uuid;

fn completed_event(reference: &str) -> String {
    serde_json::json!({
        "type": "checkout.session.completed",
        "data": { "object": { "client_reference_id": reference } }
    })
    .to_string()
}

fn signed(payload: &str) -> String {
    sign_payload(payload, WEBHOOK_SECRET, Utc::now().timestamp())
}

async fn pending_order(state: &AppState) -> Uuid {
    let shipping: ShippingAddress = address().into();
    let entry = state
        .ledger
        .create(NewOrder {
            user_id: Uuid::new_v4(),
            address: shipping,
            items: vec![NewOrderItem {
                product_id: Uuid::new_v4(),
                name: "Apple".to_string(),
                quantity: 1,
                price_cents: 150,
            }],
        })
        .await
        .expect("create failed");
    entry.order.id
}

#[tokio::test]
async fn completed_event_marks_the_order_paid() {
    let h = harness(vec![]);
    let order_id = pending_order(&h.state).await;

    let payload = completed_event(&order_id.to_string());
    webhook_service::handle_notification(&h.state, &payload, Some(&signed(&payload)))
        .await
        .expect("notification rejected");

    let entry = h
        .ledger
        .find(order_id)
        .await
        .expect("ledger")
        .expect("order vanished");
    assert!(entry.order.paid);
    assert_eq!(h.ledger.paid_transitions(), 1);
}

#[tokio::test]
async fn duplicate_delivery_is_idempotent() {
    let h = harness(vec![]);
    let order_id = pending_order(&h.state).await;
    let payload = completed_event(&order_id.to_string());
    let header = signed(&payload);

    for _ in 0..3 {
        webhook_service::handle_notification(&h.state, &payload, Some(&header))
            .await
            .expect("redelivery must be acknowledged");
    }

    assert_eq!(h.ledger.paid_transitions(), 1);
}

#[tokio::test]
async fn concurrent_duplicates_apply_exactly_one_transition() {
    let h = harness(vec![]);
    let order_id = pending_order(&h.state).await;
    let payload = completed_event(&order_id.to_string());
    let header = signed(&payload);

    let (a, b) = tokio::join!(
        webhook_service::handle_notification(&h.state, &payload, Some(&header)),
        webhook_service::handle_notification(&h.state, &payload, Some(&header)),
    );
    a.expect("first delivery failed");
    b.expect("second delivery failed");

    let entry = h
        .ledger
        .find(order_id)
        .await
        .expect("ledger")
        .expect("order vanished");
    assert!(entry.order.paid);
    assert_eq!(h.ledger.paid_transitions(), 1);
}

#[tokio::test]
async fn invalid_signature_is_rejected_without_state_change() {
    let h = harness(vec![]);
    let order_id = pending_order(&h.state).await;
    let payload = completed_event(&order_id.to_string());
    let forged = sign_payload(&payload, "whsec_wrong", Utc::now().timestamp());

    let result = webhook_service::handle_notification(&h.state, &payload, Some(&forged)).await;
    assert!(matches!(result, Err(AppError::SignatureInvalid)));

    let entry = h
        .ledger
        .find(order_id)
        .await
        .expect("ledger")
        .expect("order vanished");
    assert!(!entry.order.paid);
    assert_eq!(h.ledger.paid_transitions(), 0);
}

#[tokio::test]
async fn missing_signature_header_is_rejected() {
    let h = harness(vec![]);
    let payload = completed_event(&Uuid::new_v4().to_string());

    let result = webhook_service::handle_notification(&h.state, &payload, None).await;
    assert!(matches!(result, Err(AppError::SignatureInvalid)));
}

#[tokio::test]
async fn unknown_correlation_is_acknowledged() {
    let h = harness(vec![]);

    let payload = completed_event(&Uuid::new_v4().to_string());
    webhook_service::handle_notification(&h.state, &payload, Some(&signed(&payload)))
        .await
        .expect("stale callback must be acknowledged");

    assert_eq!(h.ledger.paid_transitions(), 0);
}

#[tokio::test]
async fn garbage_correlation_is_acknowledged() {
    let h = harness(vec![]);

    let payload = completed_event("not-an-order-id");
    webhook_service::handle_notification(&h.state, &payload, Some(&signed(&payload)))
        .await
        .expect("garbage reference must be acknowledged");

    assert_eq!(h.ledger.paid_transitions(), 0);
}

#[tokio::test]
async fn other_event_types_are_acknowledged_and_ignored() {
    let h = harness(vec![]);
    let order_id = pending_order(&h.state).await;

    let payload = serde_json::json!({
        "type": "payment_intent.created",
        "data": { "object": { "client_reference_id": order_id.to_string() } }
    })
    .to_string();

    webhook_service::handle_notification(&h.state, &payload, Some(&signed(&payload)))
        .await
        .expect("unhandled event types must be acknowledged");

    let entry = h
        .ledger
        .find(order_id)
        .await
        .expect("ledger")
        .expect("order vanished");
    assert!(!entry.order.paid);
}
