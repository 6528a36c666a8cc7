use uuid::Uuid;

use crate::{
    error::AppResult,
    middleware::session::SessionId,
    models::PricedCart,
    pricing,
    response::ApiResponse,
    state::AppState,
};

async fn priced(state: &AppState, lines: &[crate::cart::CartLine]) -> AppResult<PricedCart> {
    pricing::price_cart(state.catalog.as_ref(), lines).await
}

pub async fn get_cart(state: &AppState, session: &SessionId) -> AppResult<ApiResponse<PricedCart>> {
    let lines = state.carts.get(&session.0).await;
    Ok(ApiResponse::success("OK", priced(state, &lines).await?, None))
}

pub async fn add_item(
    state: &AppState,
    session: &SessionId,
    product_id: Uuid,
    delta_qty: i32,
) -> AppResult<ApiResponse<PricedCart>> {
    let lines = state.carts.add(&session.0, product_id, delta_qty).await;
    Ok(ApiResponse::success("OK", priced(state, &lines).await?, None))
}

pub async fn set_item_quantity(
    state: &AppState,
    session: &SessionId,
    product_id: Uuid,
    qty: i32,
) -> AppResult<ApiResponse<PricedCart>> {
    let lines = state.carts.set_quantity(&session.0, product_id, qty).await;
    Ok(ApiResponse::success("OK", priced(state, &lines).await?, None))
}

pub async fn remove_item(
    state: &AppState,
    session: &SessionId,
    product_id: Uuid,
) -> AppResult<ApiResponse<PricedCart>> {
    let lines = state.carts.remove(&session.0, product_id).await;
    Ok(ApiResponse::success("OK", priced(state, &lines).await?, None))
}

pub async fn clear_cart(
    state: &AppState,
    session: &SessionId,
) -> AppResult<ApiResponse<PricedCart>> {
    let lines = state.carts.clear(&session.0).await;
    Ok(ApiResponse::success(
        "Cart cleared",
        priced(state, &lines).await?,
        None,
    ))
}
