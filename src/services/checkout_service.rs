use uuid::Uuid;

use crate::{
    cart::MAX_LINE_QTY,
    dto::orders::{CheckoutRequest, CheckoutResponse},
    error::{AppError, AppResult},
    ledger::{NewOrder, NewOrderItem},
    middleware::auth::AuthUser,
    payment::{PaymentLineItem, PaymentSessionRequest},
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Convert a checkout request into a pending order plus a hosted payment
/// session.
///
/// Items are resolved by product id against the catalog and priced from it;
/// the client's stated prices are never trusted. Any unresolvable item fails
/// the whole checkout before anything is written. The order is committed
/// before the gateway is contacted, so the session's correlation token always
/// points at an existing order; a gateway failure after commit leaves the
/// order pending, which `OrderLedger::unpaid_before` exists to surface.
pub async fn checkout(
    state: &AppState,
    user: Option<&AuthUser>,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<CheckoutResponse>> {
    let user = user.ok_or(AppError::Unauthorized)?;

    if payload.items.is_empty() {
        return Err(AppError::BadRequest(
            "checkout requires at least one item".to_string(),
        ));
    }
    for item in &payload.items {
        if item.quantity < 1 || item.quantity > MAX_LINE_QTY {
            return Err(AppError::BadRequest(format!(
                "quantity must be between 1 and {MAX_LINE_QTY}"
            )));
        }
    }

    let ids: Vec<Uuid> = payload.items.iter().map(|i| i.product_id).collect();
    let products = state.catalog.by_ids(&ids).await?;

    let mut order_items: Vec<NewOrderItem> = Vec::with_capacity(payload.items.len());
    for item in &payload.items {
        let product = products.get(&item.product_id).ok_or_else(|| {
            AppError::BadRequest(format!("product {} not found", item.product_id))
        })?;
        order_items.push(NewOrderItem {
            product_id: product.id,
            name: product.name.clone(),
            quantity: item.quantity,
            price_cents: product.price_cents,
        });
    }

    let entry = state
        .ledger
        .create(NewOrder {
            user_id: user.user_id,
            address: payload.address.into(),
            items: order_items,
        })
        .await?;
    tracing::info!(order_id = %entry.order.id, "pending order created");

    let request = PaymentSessionRequest {
        client_reference_id: entry.order.id.to_string(),
        success_url: state.payment.success_url.clone(),
        cancel_url: state.payment.cancel_url.clone(),
        currency: state.payment.currency.clone(),
        line_items: entry
            .items
            .iter()
            .map(|item| PaymentLineItem {
                name: item.name.clone(),
                unit_amount_cents: item.price_cents,
                quantity: item.quantity,
            })
            .collect(),
    };

    let url = match state.gateway.create_checkout_session(&request).await {
        Ok(url) => url,
        Err(err) => {
            tracing::warn!(
                order_id = %entry.order.id,
                error = %err,
                "payment session creation failed; order left pending"
            );
            return Err(err);
        }
    };

    Ok(ApiResponse::success(
        "Checkout session created",
        CheckoutResponse { url },
        Some(Meta::empty()),
    ))
}
