use crate::{
    dto::orders::{OrderDto, OrderList},
    error::AppResult,
    middleware::auth::AuthUser,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<OrderList>> {
    let entries = state.ledger.list_for_user(user.user_id).await?;
    let total = entries.len() as i64;
    let items: Vec<OrderDto> = entries.into_iter().map(OrderDto::from).collect();

    let meta = Meta::single_page(total);
    Ok(ApiResponse::success("Order history", OrderList { items }, Some(meta)))
}
