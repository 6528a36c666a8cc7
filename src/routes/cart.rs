use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::cart::{AddItemParams, SetQuantityParams},
    error::AppResult,
    middleware::session::SessionId,
    models::PricedCart,
    response::ApiResponse,
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_cart).delete(clear_cart))
        .route("/items", post(add_item))
        .route("/items/{product_id}", put(set_quantity).delete(remove_item))
}

#[utoipa::path(
    get,
    path = "/api/cart",
    params(
        ("x-session-id" = String, Header, description = "Opaque session token")
    ),
    responses(
        (status = 200, description = "Current cart, priced", body = ApiResponse<PricedCart>)
    ),
    tag = "Cart"
)]
pub async fn get_cart(
    State(state): State<AppState>,
    session: SessionId,
) -> AppResult<Json<ApiResponse<PricedCart>>> {
    let response = cart_service::get_cart(&state, &session).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/cart/items",
    params(
        ("x-session-id" = String, Header, description = "Opaque session token"),
        ("product_id" = Uuid, Query, description = "Product to change"),
        ("quantity" = Option<i32>, Query, description = "Delta quantity, default +1; negative subtracts")
    ),
    responses(
        (status = 200, description = "Updated cart, priced", body = ApiResponse<PricedCart>)
    ),
    tag = "Cart"
)]
pub async fn add_item(
    State(state): State<AppState>,
    session: SessionId,
    Query(params): Query<AddItemParams>,
) -> AppResult<Json<ApiResponse<PricedCart>>> {
    let delta = params.quantity.unwrap_or(1);
    let response = cart_service::add_item(&state, &session, params.product_id, delta).await?;
    Ok(Json(response))
}

#[utoipa::path(
    put,
    path = "/api/cart/items/{product_id}",
    params(
        ("x-session-id" = String, Header, description = "Opaque session token"),
        ("product_id" = Uuid, Path, description = "Product to set"),
        ("quantity" = i32, Query, description = "Absolute quantity; <= 0 removes the line")
    ),
    responses(
        (status = 200, description = "Updated cart, priced", body = ApiResponse<PricedCart>)
    ),
    tag = "Cart"
)]
pub async fn set_quantity(
    State(state): State<AppState>,
    session: SessionId,
    Path(product_id): Path<Uuid>,
    Query(params): Query<SetQuantityParams>,
) -> AppResult<Json<ApiResponse<PricedCart>>> {
    let response =
        cart_service::set_item_quantity(&state, &session, product_id, params.quantity).await?;
    Ok(Json(response))
}

#[utoipa::path(
    delete,
    path = "/api/cart/items/{product_id}",
    params(
        ("x-session-id" = String, Header, description = "Opaque session token"),
        ("product_id" = Uuid, Path, description = "Product to remove")
    ),
    responses(
        (status = 200, description = "Updated cart, priced", body = ApiResponse<PricedCart>)
    ),
    tag = "Cart"
)]
pub async fn remove_item(
    State(state): State<AppState>,
    session: SessionId,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<PricedCart>>> {
    let response = cart_service::remove_item(&state, &session, product_id).await?;
    Ok(Json(response))
}

#[utoipa::path(
    delete,
    path = "/api/cart",
    params(
        ("x-session-id" = String, Header, description = "Opaque session token")
    ),
    responses(
        (status = 200, description = "Empty cart", body = ApiResponse<PricedCart>)
    ),
    tag = "Cart"
)]
pub async fn clear_cart(
    State(state): State<AppState>,
    session: SessionId,
) -> AppResult<Json<ApiResponse<PricedCart>>> {
    let response = cart_service::clear_cart(&state, &session).await?;
    Ok(Json(response))
}
