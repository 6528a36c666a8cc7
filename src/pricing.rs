use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    cart::CartLine,
    catalog::Catalog,
    error::AppResult,
    models::{PricedCart, PricedLine, Product},
};

/// Price a cart snapshot with one batch catalog lookup.
///
/// Lines whose product no longer resolves are dropped without error: a stale
/// cart reference must never break rendering or checkout. An empty cart never
/// touches the catalog.
pub async fn price_cart(catalog: &dyn Catalog, lines: &[CartLine]) -> AppResult<PricedCart> {
    if lines.is_empty() {
        return Ok(PricedCart::empty());
    }
    let ids: Vec<Uuid> = lines.iter().map(|l| l.product_id).collect();
    let products = catalog.by_ids(&ids).await?;
    Ok(price_with(lines, &products))
}

/// Pure pricing step over an already-resolved product map, preserving cart
/// order. Non-positive quantities are skipped as well; the cart store should
/// never emit them, but the pricer does not trust upstream state.
pub fn price_with(lines: &[CartLine], products: &HashMap<Uuid, Product>) -> PricedCart {
    let mut items = Vec::with_capacity(lines.len());
    let mut subtotal_cents: i64 = 0;

    for line in lines {
        if line.quantity <= 0 {
            continue;
        }
        let Some(product) = products.get(&line.product_id) else {
            continue;
        };

        let line_total_cents = product.price_cents * i64::from(line.quantity);
        subtotal_cents += line_total_cents;

        items.push(PricedLine {
            product_id: product.id,
            name: product.name.clone(),
            image_url: product.image_url.clone(),
            unit_price_cents: product.price_cents,
            quantity: line.quantity,
            line_total_cents,
        });
    }

    let tax_cents = 0; // placeholder until per-region rates exist
    PricedCart {
        total_cents: subtotal_cents + tax_cents,
        items,
        subtotal_cents,
        tax_cents,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(id: Uuid, name: &str, price_cents: i64) -> Product {
        Product {
            id,
            name: name.to_string(),
            description: None,
            image_url: None,
            unit: None,
            price_cents,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn empty_cart_prices_to_zero() {
        let priced = price_with(&[], &HashMap::new());
        assert_eq!(priced, PricedCart::empty());
    }

    #[test]
    fn unknown_products_are_silently_dropped() {
        let apple = Uuid::new_v4();
        let bread = Uuid::new_v4();
        let ghost = Uuid::new_v4();

        let products: HashMap<Uuid, Product> = [
            (apple, product(apple, "Apple", 150)),
            (bread, product(bread, "Bread", 300)),
        ]
        .into_iter()
        .collect();

        let lines = [
            CartLine { product_id: apple, quantity: 2 },
            CartLine { product_id: bread, quantity: 1 },
            CartLine { product_id: ghost, quantity: 5 },
        ];

        let priced = price_with(&lines, &products);
        assert_eq!(priced.items.len(), 2);
        assert_eq!(priced.items[0].line_total_cents, 300);
        assert_eq!(priced.items[1].line_total_cents, 300);
        assert_eq!(priced.subtotal_cents, 600);
        assert_eq!(priced.tax_cents, 0);
        assert_eq!(priced.total_cents, 600);
    }

    #[test]
    fn non_positive_quantities_are_skipped() {
        let apple = Uuid::new_v4();
        let products: HashMap<Uuid, Product> =
            [(apple, product(apple, "Apple", 150))].into_iter().collect();

        let lines = [CartLine { product_id: apple, quantity: 0 }];
        let priced = price_with(&lines, &products);
        assert!(priced.items.is_empty());
        assert_eq!(priced.total_cents, 0);
    }

    #[test]
    fn output_preserves_cart_order() {
        let ids: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        let products: HashMap<Uuid, Product> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (*id, product(*id, &format!("p{i}"), 100)))
            .collect();

        let lines: Vec<CartLine> = ids
            .iter()
            .map(|id| CartLine { product_id: *id, quantity: 1 })
            .collect();

        let priced = price_with(&lines, &products);
        let out: Vec<Uuid> = priced.items.iter().map(|i| i.product_id).collect();
        assert_eq!(out, ids);
    }

    #[tokio::test]
    async fn empty_cart_does_not_touch_the_catalog() {
        use crate::catalog::MemoryCatalog;

        // an empty MemoryCatalog would resolve nothing anyway; this checks
        // the early return path end to end
        let catalog = MemoryCatalog::default();
        let priced = price_cart(&catalog, &[]).await.expect("pricing failed");
        assert_eq!(priced, PricedCart::empty());
    }
}
