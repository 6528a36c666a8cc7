use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::ledger::{LedgerEntry, ShippingAddress};

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct AddressDto {
    pub full_name: String,
    pub street: String,
    pub city: String,
    pub zip: String,
    pub country: String,
}

impl From<AddressDto> for ShippingAddress {
    fn from(dto: AddressDto) -> Self {
        ShippingAddress {
            full_name: dto.full_name,
            street: dto.street,
            city: dto.city,
            zip: dto.zip,
            country: dto.country,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutItem {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub address: AddressDto,
    pub items: Vec<CheckoutItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutResponse {
    /// Hosted payment page the client should redirect to.
    pub url: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderLineDto {
    pub name: String,
    pub quantity: i32,
    pub price_cents: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderDto {
    pub id: Uuid,
    pub paid: bool,
    pub created_at: DateTime<Utc>,
    pub address: AddressDto,
    pub items: Vec<OrderLineDto>,
}

impl From<LedgerEntry> for OrderDto {
    fn from(entry: LedgerEntry) -> Self {
        OrderDto {
            id: entry.order.id,
            paid: entry.order.paid,
            created_at: entry.order.created_at,
            address: AddressDto {
                full_name: entry.order.full_name,
                street: entry.order.street,
                city: entry.order.city,
                zip: entry.order.zip,
                country: entry.order.country,
            },
            items: entry
                .items
                .into_iter()
                .map(|item| OrderLineDto {
                    name: item.name,
                    quantity: item.quantity,
                    price_cents: item.price_cents,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<OrderDto>,
}
