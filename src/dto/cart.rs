use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddItemParams {
    pub product_id: Uuid,
    /// Delta applied to the current quantity; negative values subtract.
    pub quantity: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetQuantityParams {
    pub quantity: i32,
}
