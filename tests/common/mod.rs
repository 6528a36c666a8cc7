#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use storefront_api::{
    cart::CartStore,
    catalog::MemoryCatalog,
    dto::orders::AddressDto,
    error::AppResult,
    ledger::MemoryLedger,
    middleware::auth::AuthUser,
    models::Product,
    payment::{PaymentGateway, PaymentSessionRequest},
    state::{AppState, PaymentSettings},
};

pub const WEBHOOK_SECRET: &str = "whsec_test_secret";

/// Gateway double: records every session request and can be switched to
/// fail, standing in for an unreachable provider.
#[derive(Default)]
pub struct RecordingGateway {
    pub requests: Mutex<Vec<PaymentSessionRequest>>,
    pub fail: bool,
}

impl RecordingGateway {
    pub fn failing() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            fail: true,
        }
    }
}

#[async_trait]
impl PaymentGateway for RecordingGateway {
    async fn create_checkout_session(&self, request: &PaymentSessionRequest) -> AppResult<String> {
        if self.fail {
            return Err(anyhow::anyhow!("payment provider unreachable").into());
        }
        self.requests.lock().await.push(request.clone());
        Ok(format!(
            "https://pay.example/session/{}",
            request.client_reference_id
        ))
    }
}

pub struct TestHarness {
    pub state: AppState,
    pub catalog: Arc<MemoryCatalog>,
    pub ledger: Arc<MemoryLedger>,
    pub gateway: Arc<RecordingGateway>,
}

pub fn harness(products: Vec<Product>) -> TestHarness {
    harness_with_gateway(products, RecordingGateway::default())
}

pub fn harness_with_gateway(products: Vec<Product>, gateway: RecordingGateway) -> TestHarness {
    let catalog = Arc::new(MemoryCatalog::new(products));
    let ledger = Arc::new(MemoryLedger::new());
    let gateway = Arc::new(gateway);

    let state = AppState {
        catalog: catalog.clone(),
        ledger: ledger.clone(),
        gateway: gateway.clone(),
        carts: CartStore::new(),
        payment: PaymentSettings {
            webhook_secret: WEBHOOK_SECRET.to_string(),
            success_url: "https://shop.example/success".to_string(),
            cancel_url: "https://shop.example/cancel".to_string(),
            currency: "eur".to_string(),
        },
    };

    TestHarness {
        state,
        catalog,
        ledger,
        gateway,
    }
}

pub fn product(name: &str, price_cents: i64) -> Product {
    Product {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: None,
        image_url: None,
        unit: None,
        price_cents,
        created_at: Utc::now(),
    }
}

pub fn auth_user() -> AuthUser {
    AuthUser {
        user_id: Uuid::new_v4(),
    }
}

pub fn address() -> AddressDto {
    AddressDto {
        full_name: "Ada Lovelace".to_string(),
        street: "1 Analytical Way".to_string(),
        city: "London".to_string(),
        zip: "EC1A 1AA".to_string(),
        country: "UK".to_string(),
    }
}
