use chrono::{Duration, Utc};
use storefront_api::{
    config::AppConfig,
    db::create_orm_conn,
    ledger::{OrderLedger, OrmLedger},
};

/// Operator report: pending orders older than a threshold. These are
/// checkouts whose payment session never completed (abandoned, or the
/// gateway call failed after the order was committed).
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let minutes: i64 = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(60);

    let orm = create_orm_conn(&config.database_url).await?;
    let ledger = OrmLedger::new(orm);

    let cutoff = Utc::now() - Duration::minutes(minutes);
    let orders = ledger.unpaid_before(cutoff).await?;

    println!("{} unpaid orders older than {} minutes", orders.len(), minutes);
    for order in orders {
        println!(
            "{}  user={}  created_at={}",
            order.id, order.user_id, order.created_at
        );
    }

    Ok(())
}
