use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub payment_secret_key: String,
    pub payment_webhook_secret: String,
    pub checkout_success_url: String,
    pub checkout_cancel_url: String,
    pub currency: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let payment_secret_key = env::var("PAYMENT_SECRET_KEY")?;
        let payment_webhook_secret = env::var("PAYMENT_WEBHOOK_SECRET")?;
        let checkout_success_url = env::var("CHECKOUT_SUCCESS_URL").unwrap_or_else(|_| {
            "http://localhost:5173/success/?session_id={CHECKOUT_SESSION_ID}".to_string()
        });
        let checkout_cancel_url = env::var("CHECKOUT_CANCEL_URL")
            .unwrap_or_else(|_| "http://localhost:5173/cancel".to_string());
        let currency = env::var("CHECKOUT_CURRENCY").unwrap_or_else(|_| "eur".to_string());
        Ok(Self {
            database_url,
            host,
            port,
            payment_secret_key,
            payment_webhook_secret,
            checkout_success_url,
            checkout_cancel_url,
            currency,
        })
    }
}
