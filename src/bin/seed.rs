use storefront_api::{config::AppConfig, db::create_pool};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    seed_products(&pool).await?;

    println!("Seed completed");
    Ok(())
}

async fn seed_products(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let products = vec![
        ("Avocado", "Ripe Hass avocado", "/img/avocado.jpg", "piece", 189_i64),
        ("Sourdough Bread", "Stone-baked loaf", "/img/sourdough.jpg", "loaf", 420),
        ("Organic Apples", "Crisp seasonal apples", "/img/apples.jpg", "kg", 350),
        ("Almond Butter", "No added sugar", "/img/almond-butter.jpg", "jar", 799),
        ("Oat Milk", "Barista edition", "/img/oat-milk.jpg", "litre", 249),
        ("Free-range Eggs", "Box of ten", "/img/eggs.jpg", "box", 389),
    ];

    for (name, desc, image, unit, price_cents) in products {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, image_url, unit, price_cents)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(desc)
        .bind(image)
        .bind(unit)
        .bind(price_cents)
        .execute(pool)
        .await?;
    }

    println!("Seeded products");
    Ok(())
}
