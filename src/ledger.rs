use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    entity::{
        order_items::{
            ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems,
            Model as OrderItemModel,
        },
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
    },
    error::AppResult,
    models::{Order, OrderItem},
};

#[derive(Debug, Clone)]
pub struct ShippingAddress {
    pub full_name: String,
    pub street: String,
    pub city: String,
    pub zip: String,
    pub country: String,
}

/// A line captured for a new order. Name and unit price are snapshots taken
/// at creation; later catalog edits must not leak into the ledger.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: Uuid,
    pub name: String,
    pub quantity: i32,
    pub price_cents: i64,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: Uuid,
    pub address: ShippingAddress,
    pub items: Vec<NewOrderItem>,
}

#[derive(Debug, Clone)]
pub struct LedgerEntry {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Outcome of a paid transition attempt. `Pending -> Paid` is the only
/// transition the ledger knows; `Paid` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaidTransition {
    Applied,
    AlreadyPaid,
    UnknownOrder,
}

/// Durable record of purchase intents. Created exactly once per checkout,
/// mutated exactly once more when payment is confirmed.
#[async_trait]
pub trait OrderLedger: Send + Sync {
    /// Persist an order and its lines atomically.
    async fn create(&self, order: NewOrder) -> AppResult<LedgerEntry>;

    /// Conditional `paid = true where paid = false`, safe under concurrent
    /// duplicate delivery.
    async fn mark_paid(&self, id: Uuid) -> AppResult<PaidTransition>;

    async fn find(&self, id: Uuid) -> AppResult<Option<LedgerEntry>>;

    /// The caller's orders, newest first.
    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<LedgerEntry>>;

    /// Pending orders created before `cutoff` — the recovery query for
    /// checkouts whose payment session never completed.
    async fn unpaid_before(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<Order>>;
}

/// SeaORM-backed ledger over Postgres.
#[derive(Clone)]
pub struct OrmLedger {
    conn: DatabaseConnection,
}

impl OrmLedger {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    async fn items_of(&self, order_id: Uuid) -> AppResult<Vec<OrderItem>> {
        let items = OrderItems::find()
            .filter(OrderItemCol::OrderId.eq(order_id))
            .order_by_asc(OrderItemCol::Position)
            .all(&self.conn)
            .await?
            .into_iter()
            .map(order_item_from_entity)
            .collect();
        Ok(items)
    }
}

#[async_trait]
impl OrderLedger for OrmLedger {
    async fn create(&self, order: NewOrder) -> AppResult<LedgerEntry> {
        let txn = self.conn.begin().await?;

        let order_id = Uuid::new_v4();
        let created = OrderActive {
            id: Set(order_id),
            user_id: Set(order.user_id),
            paid: Set(false),
            full_name: Set(order.address.full_name),
            street: Set(order.address.street),
            city: Set(order.address.city),
            zip: Set(order.address.zip),
            country: Set(order.address.country),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;

        let mut items: Vec<OrderItem> = Vec::with_capacity(order.items.len());
        for (position, item) in order.items.into_iter().enumerate() {
            let created_item = OrderItemActive {
                id: Set(Uuid::new_v4()),
                order_id: Set(order_id),
                product_id: Set(item.product_id),
                name: Set(item.name),
                quantity: Set(item.quantity),
                price_cents: Set(item.price_cents),
                position: Set(position as i32),
            }
            .insert(&txn)
            .await?;
            items.push(order_item_from_entity(created_item));
        }

        txn.commit().await?;

        Ok(LedgerEntry {
            order: order_from_entity(created),
            items,
        })
    }

    async fn mark_paid(&self, id: Uuid) -> AppResult<PaidTransition> {
        let result = Orders::update_many()
            .col_expr(OrderCol::Paid, Expr::value(true))
            .filter(OrderCol::Id.eq(id))
            .filter(OrderCol::Paid.eq(false))
            .exec(&self.conn)
            .await?;

        if result.rows_affected > 0 {
            return Ok(PaidTransition::Applied);
        }
        let exists = Orders::find_by_id(id).one(&self.conn).await?.is_some();
        Ok(if exists {
            PaidTransition::AlreadyPaid
        } else {
            PaidTransition::UnknownOrder
        })
    }

    async fn find(&self, id: Uuid) -> AppResult<Option<LedgerEntry>> {
        let Some(order) = Orders::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };
        let items = self.items_of(order.id).await?;
        Ok(Some(LedgerEntry {
            order: order_from_entity(order),
            items,
        }))
    }

    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<LedgerEntry>> {
        let orders = Orders::find()
            .filter(OrderCol::UserId.eq(user_id))
            .order_by_desc(OrderCol::CreatedAt)
            .all(&self.conn)
            .await?;

        let mut entries = Vec::with_capacity(orders.len());
        for order in orders {
            let items = self.items_of(order.id).await?;
            entries.push(LedgerEntry {
                order: order_from_entity(order),
                items,
            });
        }
        Ok(entries)
    }

    async fn unpaid_before(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<Order>> {
        let orders = Orders::find()
            .filter(OrderCol::Paid.eq(false))
            .filter(OrderCol::CreatedAt.lt(cutoff))
            .order_by_asc(OrderCol::CreatedAt)
            .all(&self.conn)
            .await?
            .into_iter()
            .map(order_from_entity)
            .collect();
        Ok(orders)
    }
}

fn order_from_entity(model: OrderModel) -> Order {
    Order {
        id: model.id,
        user_id: model.user_id,
        paid: model.paid,
        full_name: model.full_name,
        street: model.street,
        city: model.city,
        zip: model.zip,
        country: model.country,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn order_item_from_entity(model: OrderItemModel) -> OrderItem {
    OrderItem {
        id: model.id,
        order_id: model.order_id,
        product_id: model.product_id,
        name: model.name,
        quantity: model.quantity,
        price_cents: model.price_cents,
    }
}

/// In-memory ledger for tests. A single lock covers lookup and transition,
/// so `mark_paid` has the same check-then-set atomicity as the SQL
/// conditional update.
#[derive(Default)]
pub struct MemoryLedger {
    inner: Mutex<HashMap<Uuid, LedgerEntry>>,
    transitions: AtomicUsize,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many effective `Pending -> Paid` transitions have been applied.
    pub fn paid_transitions(&self) -> usize {
        self.transitions.load(Ordering::SeqCst)
    }

    pub async fn order_count(&self) -> usize {
        self.inner.lock().await.len()
    }
}

#[async_trait]
impl OrderLedger for MemoryLedger {
    async fn create(&self, order: NewOrder) -> AppResult<LedgerEntry> {
        let order_id = Uuid::new_v4();
        let created = Order {
            id: order_id,
            user_id: order.user_id,
            paid: false,
            full_name: order.address.full_name,
            street: order.address.street,
            city: order.address.city,
            zip: order.address.zip,
            country: order.address.country,
            created_at: Utc::now(),
        };
        let items = order
            .items
            .into_iter()
            .map(|item| OrderItem {
                id: Uuid::new_v4(),
                order_id,
                product_id: item.product_id,
                name: item.name,
                quantity: item.quantity,
                price_cents: item.price_cents,
            })
            .collect();

        let entry = LedgerEntry {
            order: created,
            items,
        };
        self.inner.lock().await.insert(order_id, entry.clone());
        Ok(entry)
    }

    async fn mark_paid(&self, id: Uuid) -> AppResult<PaidTransition> {
        let mut inner = self.inner.lock().await;
        match inner.get_mut(&id) {
            None => Ok(PaidTransition::UnknownOrder),
            Some(entry) if entry.order.paid => Ok(PaidTransition::AlreadyPaid),
            Some(entry) => {
                entry.order.paid = true;
                self.transitions.fetch_add(1, Ordering::SeqCst);
                Ok(PaidTransition::Applied)
            }
        }
    }

    async fn find(&self, id: Uuid) -> AppResult<Option<LedgerEntry>> {
        Ok(self.inner.lock().await.get(&id).cloned())
    }

    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<LedgerEntry>> {
        let inner = self.inner.lock().await;
        let mut entries: Vec<LedgerEntry> = inner
            .values()
            .filter(|e| e.order.user_id == user_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.order.created_at.cmp(&a.order.created_at));
        Ok(entries)
    }

    async fn unpaid_before(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<Order>> {
        let inner = self.inner.lock().await;
        let mut orders: Vec<Order> = inner
            .values()
            .filter(|e| !e.order.paid && e.order.created_at < cutoff)
            .map(|e| e.order.clone())
            .collect();
        orders.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(orders)
    }
}
