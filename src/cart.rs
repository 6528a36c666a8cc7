use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;

/// Anti-abuse ceiling; anything above is silently truncated.
pub const MAX_LINE_QTY: i32 = 99;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLine {
    pub product_id: Uuid,
    pub quantity: i32,
}

type SessionCart = Arc<Mutex<Vec<CartLine>>>;

/// Per-session cart storage. Each session owns an ordered list of lines
/// (one per product, insertion order preserved) behind its own lock, so
/// read-modify-write on a quantity cannot lose updates when two requests
/// for the same session race.
///
/// Lifetime is tied to the session token: there is no expiry here beyond
/// `clear`; session teardown is the session issuer's job.
#[derive(Clone, Default)]
pub struct CartStore {
    sessions: Arc<Mutex<HashMap<String, SessionCart>>>,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn session(&self, session_id: &str) -> SessionCart {
        let mut sessions = self.sessions.lock().await;
        sessions
            .entry(session_id.to_string())
            .or_default()
            .clone()
    }

    /// Snapshot of the current lines, creating an empty cart on first access.
    pub async fn get(&self, session_id: &str) -> Vec<CartLine> {
        let cart = self.session(session_id).await;
        let lines = cart.lock().await;
        lines.clone()
    }

    /// Add `delta_qty` (may be negative) to a product's quantity.
    /// A resulting quantity <= 0 deletes the line entirely; a brand-new line
    /// appends at the end; an existing line keeps its position.
    pub async fn add(&self, session_id: &str, product_id: Uuid, delta_qty: i32) -> Vec<CartLine> {
        if delta_qty == 0 {
            return self.get(session_id).await;
        }

        let cart = self.session(session_id).await;
        let mut lines = cart.lock().await;

        let existing = lines.iter().position(|l| l.product_id == product_id);
        let current = existing.map(|i| lines[i].quantity).unwrap_or(0);
        // widen before adding: the delta comes straight from the client and
        // may sit at the i32 extremes
        let new_qty = i64::from(current) + i64::from(delta_qty);
        let capped = new_qty.min(i64::from(MAX_LINE_QTY)) as i32;

        match existing {
            Some(i) if new_qty <= 0 => {
                lines.remove(i);
            }
            Some(i) => {
                lines[i].quantity = capped;
            }
            None if new_qty > 0 => {
                lines.push(CartLine {
                    product_id,
                    quantity: capped,
                });
            }
            None => {}
        }

        lines.clone()
    }

    /// Set an exact quantity (idempotent, does not accumulate).
    /// `qty <= 0` deletes the line regardless of its prior value.
    pub async fn set_quantity(&self, session_id: &str, product_id: Uuid, qty: i32) -> Vec<CartLine> {
        let cart = self.session(session_id).await;
        let mut lines = cart.lock().await;

        let existing = lines.iter().position(|l| l.product_id == product_id);
        match existing {
            Some(i) if qty <= 0 => {
                lines.remove(i);
            }
            Some(i) => {
                lines[i].quantity = qty.min(MAX_LINE_QTY);
            }
            None if qty > 0 => {
                lines.push(CartLine {
                    product_id,
                    quantity: qty.min(MAX_LINE_QTY),
                });
            }
            None => {}
        }

        lines.clone()
    }

    /// Remove a product line entirely.
    pub async fn remove(&self, session_id: &str, product_id: Uuid) -> Vec<CartLine> {
        let cart = self.session(session_id).await;
        let mut lines = cart.lock().await;
        lines.retain(|l| l.product_id != product_id);
        lines.clone()
    }

    /// Drop the session's cart entirely so the slot is released; the next
    /// access starts from an empty cart again.
    pub async fn clear(&self, session_id: &str) -> Vec<CartLine> {
        self.sessions.lock().await.remove(session_id);
        Vec::new()
    }

    /// Number of sessions currently holding a cart.
    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}
