use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::AppResult;

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentLineItem {
    pub name: String,
    pub unit_amount_cents: i64,
    pub quantity: i32,
}

/// Request for a hosted payment session. `client_reference_id` carries the
/// order id so the completion webhook can be correlated back to the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentSessionRequest {
    pub client_reference_id: String,
    pub success_url: String,
    pub cancel_url: String,
    pub currency: String,
    pub line_items: Vec<PaymentLineItem>,
}

/// External payment-session service. Returns the hosted checkout redirect URL.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_checkout_session(&self, request: &PaymentSessionRequest) -> AppResult<String>;
}

/// Stripe Checkout over plain HTTPS form posts. The client carries a request
/// timeout; a timed-out call leaves the order pending, it is never rolled
/// back here.
pub struct StripeGateway {
    http: reqwest::Client,
    secret_key: String,
    api_base: String,
}

#[derive(Deserialize)]
struct CreateSessionResponse {
    url: String,
}

impl StripeGateway {
    pub fn new(secret_key: impl Into<String>) -> AppResult<Self> {
        Self::with_api_base(secret_key, "https://api.stripe.com")
    }

    pub fn with_api_base(
        secret_key: impl Into<String>,
        api_base: impl Into<String>,
    ) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            http,
            secret_key: secret_key.into(),
            api_base: api_base.into(),
        })
    }

    fn form_params(request: &PaymentSessionRequest) -> Vec<(String, String)> {
        let mut params = vec![
            ("mode".to_string(), "payment".to_string()),
            ("success_url".to_string(), request.success_url.clone()),
            ("cancel_url".to_string(), request.cancel_url.clone()),
            (
                "client_reference_id".to_string(),
                request.client_reference_id.clone(),
            ),
        ];
        for (i, item) in request.line_items.iter().enumerate() {
            params.push((
                format!("line_items[{i}][quantity]"),
                item.quantity.to_string(),
            ));
            params.push((
                format!("line_items[{i}][price_data][currency]"),
                request.currency.clone(),
            ));
            params.push((
                format!("line_items[{i}][price_data][unit_amount]"),
                item.unit_amount_cents.to_string(),
            ));
            params.push((
                format!("line_items[{i}][price_data][product_data][name]"),
                item.name.clone(),
            ));
        }
        params
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_checkout_session(&self, request: &PaymentSessionRequest) -> AppResult<String> {
        let params = Self::form_params(request);
        let response = self
            .http
            .post(format!("{}/v1/checkout/sessions", self.api_base))
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await?
            .error_for_status()?
            .json::<CreateSessionResponse>()
            .await?;
        Ok(response.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_params_flatten_line_items_in_order() {
        let request = PaymentSessionRequest {
            client_reference_id: "order-1".into(),
            success_url: "https://shop.example/success".into(),
            cancel_url: "https://shop.example/cancel".into(),
            currency: "eur".into(),
            line_items: vec![
                PaymentLineItem {
                    name: "Apple".into(),
                    unit_amount_cents: 150,
                    quantity: 2,
                },
                PaymentLineItem {
                    name: "Bread".into(),
                    unit_amount_cents: 300,
                    quantity: 1,
                },
            ],
        };

        let params = StripeGateway::form_params(&request);
        let get = |k: &str| {
            params
                .iter()
                .find(|(key, _)| key == k)
                .map(|(_, v)| v.as_str())
        };

        assert_eq!(get("mode"), Some("payment"));
        assert_eq!(get("client_reference_id"), Some("order-1"));
        assert_eq!(get("line_items[0][quantity]"), Some("2"));
        assert_eq!(get("line_items[0][price_data][unit_amount]"), Some("150"));
        assert_eq!(
            get("line_items[1][price_data][product_data][name]"),
            Some("Bread")
        );
        assert_eq!(get("line_items[1][price_data][currency]"), Some("eur"));
    }
}
