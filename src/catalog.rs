use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::{db::DbPool, error::AppResult, models::Product};

/// Read-only product lookup. The storefront core never writes products;
/// catalog management lives elsewhere.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Batch lookup; ids that do not resolve are simply absent from the map.
    async fn by_ids(&self, ids: &[Uuid]) -> AppResult<HashMap<Uuid, Product>>;

    async fn by_id(&self, id: Uuid) -> AppResult<Option<Product>> {
        let mut found = self.by_ids(std::slice::from_ref(&id)).await?;
        Ok(found.remove(&id))
    }

    /// Paged browse surface, newest first. Returns the page and the total count.
    async fn list(&self, limit: i64, offset: i64) -> AppResult<(Vec<Product>, i64)>;
}

#[derive(FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    image_url: Option<String>,
    unit: Option<String>,
    price_cents: i64,
    created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            description: row.description,
            image_url: row.image_url,
            unit: row.unit,
            price_cents: row.price_cents,
            created_at: row.created_at,
        }
    }
}

/// Postgres-backed catalog over the sqlx pool.
#[derive(Clone)]
pub struct PgCatalog {
    pool: DbPool,
}

impl PgCatalog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Catalog for PgCatalog {
    async fn by_ids(&self, ids: &[Uuid]) -> AppResult<HashMap<Uuid, Product>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, description, image_url, unit, price_cents, created_at
             FROM products WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| (row.id, Product::from(row)))
            .collect())
    }

    async fn list(&self, limit: i64, offset: i64) -> AppResult<(Vec<Product>, i64)> {
        let rows = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, description, image_url, unit, price_cents, created_at
             FROM products ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok((rows.into_iter().map(Product::from).collect(), total.0))
    }
}

/// In-memory catalog for tests and local experiments. Mutable so tests can
/// change a price after an order exists and observe that ledger snapshots
/// do not move.
#[derive(Default)]
pub struct MemoryCatalog {
    products: tokio::sync::RwLock<HashMap<Uuid, Product>>,
}

impl MemoryCatalog {
    pub fn new(products: impl IntoIterator<Item = Product>) -> Self {
        Self {
            products: tokio::sync::RwLock::new(
                products.into_iter().map(|p| (p.id, p)).collect(),
            ),
        }
    }

    /// Insert or replace a product.
    pub async fn upsert(&self, product: Product) {
        self.products.write().await.insert(product.id, product);
    }

    pub async fn delete(&self, id: Uuid) {
        self.products.write().await.remove(&id);
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn by_ids(&self, ids: &[Uuid]) -> AppResult<HashMap<Uuid, Product>> {
        let products = self.products.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| products.get(id).map(|p| (*id, p.clone())))
            .collect())
    }

    async fn list(&self, limit: i64, offset: i64) -> AppResult<(Vec<Product>, i64)> {
        let products = self.products.read().await;
        let mut all: Vec<Product> = products.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = all.len() as i64;
        let page = all
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();
        Ok((page, total))
    }
}
