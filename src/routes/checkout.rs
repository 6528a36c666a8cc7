use axum::{
    Json, Router,
    extract::State,
    http::HeaderMap,
    routing::post,
};

use crate::{
    dto::orders::{CheckoutRequest, CheckoutResponse},
    error::AppResult,
    middleware::auth::AuthUser,
    response::{ApiResponse, Meta},
    services::{checkout_service, webhook_service},
    state::AppState,
    webhook,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(checkout))
        .route("/webhook", post(handle_webhook))
}

#[utoipa::path(
    post,
    path = "/api/checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Payment session created", body = ApiResponse<CheckoutResponse>),
        (status = 400, description = "Unresolvable item or invalid quantity"),
        (status = 401, description = "No authenticated principal"),
        (status = 502, description = "Payment provider unreachable; order left pending"),
    ),
    security(("bearer_auth" = [])),
    tag = "Checkout"
)]
pub async fn checkout(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<ApiResponse<CheckoutResponse>>> {
    let response = checkout_service::checkout(&state, user.as_ref(), payload).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/checkout/webhook",
    responses(
        (status = 200, description = "Event acknowledged", body = ApiResponse<serde_json::Value>),
        (status = 400, description = "Invalid signature"),
    ),
    tag = "Checkout"
)]
pub async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let signature = headers
        .get(webhook::SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());

    webhook_service::handle_notification(&state, &body, signature).await?;

    Ok(Json(ApiResponse::success(
        "success",
        serde_json::json!({}),
        Some(Meta::empty()),
    )))
}
