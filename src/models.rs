use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub unit: Option<String>,
    pub price_cents: i64,
    pub created_at: DateTime<Utc>,
}

/// One priced cart line. `line_total_cents` is always
/// `unit_price_cents * quantity`.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct PricedLine {
    pub product_id: Uuid,
    pub name: String,
    pub image_url: Option<String>,
    pub unit_price_cents: i64,
    pub quantity: i32,
    pub line_total_cents: i64,
}

/// Derived view of a cart, never stored. All amounts in integer cents.
/// `tax_cents` is a placeholder kept as a first-class field so per-region
/// rates can land without a wire format change.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct PricedCart {
    pub items: Vec<PricedLine>,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
}

impl PricedCart {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            subtotal_cents: 0,
            tax_cents: 0,
            total_cents: 0,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub paid: bool,
    pub full_name: String,
    pub street: String,
    pub city: String,
    pub zip: String,
    pub country: String,
    pub created_at: DateTime<Utc>,
}

/// `name` and `price_cents` are snapshots taken at order creation. Catalog
/// prices may change afterwards; the ledger never recomputes them.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub name: String,
    pub quantity: i32,
    pub price_cents: i64,
}
