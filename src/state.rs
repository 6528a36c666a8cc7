use std::sync::Arc;

use crate::{cart::CartStore, catalog::Catalog, ledger::OrderLedger, payment::PaymentGateway};

/// Shared state. Catalog, ledger and gateway sit behind traits so the
/// checkout and reconciliation flows can be exercised without Postgres or a
/// live payment provider.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn Catalog>,
    pub ledger: Arc<dyn OrderLedger>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub carts: CartStore,
    pub payment: PaymentSettings,
}

#[derive(Debug, Clone)]
pub struct PaymentSettings {
    pub webhook_secret: String,
    pub success_url: String,
    pub cancel_url: String,
    pub currency: String,
}
