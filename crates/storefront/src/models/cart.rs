//! Session cart and reconciliation against the catalog.
//!
//! The cart is a plain value read from and written back to the visitor's
//! session - it is handed into every operation explicitly, so the whole
//! flow is testable without a web server. Nothing here touches the
//! database: reconciliation takes a lookup closure and the service layer
//! decides where products come from.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use protein_perks_core::{ProductId, Rupees};

use super::product::Product;

/// A priced line derived by joining one cart entry against the catalog.
///
/// Line items are computed fresh on every reconciliation and never cached,
/// so a catalog price change is reflected up to the moment of order
/// creation.
#[derive(Debug, Clone, Serialize)]
pub struct LineItem {
    pub product: Product,
    pub quantity: u32,
    /// `product.price * quantity` at reconciliation time
    pub subtotal: Rupees,
}

/// A visitor's cart: product ID mapped to desired quantity.
///
/// Quantities are positive; mutations that would drop a quantity to zero
/// remove the entry instead. Serialized transparently so it round-trips
/// through the session store (integer keys become JSON object keys).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart(BTreeMap<ProductId, u32>);

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Add a quantity of a product, incrementing any existing entry.
    ///
    /// No catalog existence check happens here - a stale product ID is
    /// dropped later, at reconciliation. Callers validate `quantity >= 1`.
    pub fn add(&mut self, product_id: ProductId, quantity: u32) {
        let entry = self.0.entry(product_id).or_insert(0);
        *entry = entry.saturating_add(quantity);
    }

    /// Overwrite the quantity of a product already in the cart.
    ///
    /// Returns `false` if the product is not in the cart (the mapping is
    /// left unchanged). A quantity of zero or less removes the entry -
    /// non-positive input is treated as removal, not an error.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: i64) -> bool {
        if !self.0.contains_key(&product_id) {
            return false;
        }

        if quantity <= 0 {
            self.0.remove(&product_id);
        } else {
            let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
            self.0.insert(product_id, quantity);
        }
        true
    }

    /// Remove a product entirely. Returns whether anything was removed.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        self.0.remove(&product_id).is_some()
    }

    /// Total number of units across all entries (for the cart badge).
    #[must_use]
    pub fn count(&self) -> u32 {
        self.0.values().sum()
    }

    /// Whether the cart has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Drop all entries.
    ///
    /// Called only after an order commits, never before, so a failed
    /// checkout keeps the cart intact for another attempt.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// The distinct product IDs currently in the cart.
    pub fn product_ids(&self) -> impl Iterator<Item = ProductId> + '_ {
        self.0.keys().copied()
    }

    /// Join the cart against the catalog, producing priced line items and
    /// the cart total.
    ///
    /// Entries whose product the lookup cannot resolve are silently
    /// dropped: a product removed from the catalog after being added to a
    /// cart is a normal occurrence, not an error. An empty result means
    /// the cart is (effectively) empty and checkout must refuse to
    /// proceed.
    ///
    /// Pure with respect to the cart and the lookup; the cart itself is
    /// never modified, so reconciling repeatedly is safe.
    pub fn reconcile(
        &self,
        mut lookup: impl FnMut(ProductId) -> Option<Product>,
    ) -> (Vec<LineItem>, Rupees) {
        let mut items = Vec::with_capacity(self.0.len());
        let mut total = Rupees::ZERO;

        for (&product_id, &quantity) in &self.0 {
            let Some(product) = lookup(product_id) else {
                continue;
            };

            let subtotal = product.price * quantity;
            total += subtotal;
            items.push(LineItem {
                product,
                quantity,
                subtotal,
            });
        }

        (items, total)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use protein_perks_core::Category;

    use super::*;

    fn product(id: i32, price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            brand: "Avvatar".to_string(),
            category: Category::Protein,
            description: None,
            price: Rupees::new(price),
            weight: "1kg".to_string(),
            stock: 100,
            image: format!("/static/images/{id}.jpg"),
        }
    }

    fn catalog(products: Vec<Product>) -> impl FnMut(ProductId) -> Option<Product> {
        move |id| products.iter().find(|p| p.id == id).cloned()
    }

    #[test]
    fn test_add_increments_existing_entry() {
        let mut cart = Cart::new();
        cart.add(ProductId::new(1), 2);
        cart.add(ProductId::new(1), 3);

        let mut once = Cart::new();
        once.add(ProductId::new(1), 5);

        assert_eq!(cart, once);
        assert_eq!(cart.count(), 5);
    }

    #[test]
    fn test_set_quantity_overwrites() {
        let mut cart = Cart::new();
        cart.add(ProductId::new(1), 2);
        assert!(cart.set_quantity(ProductId::new(1), 7));
        assert_eq!(cart.count(), 7);
    }

    #[test]
    fn test_set_quantity_zero_removes_entry() {
        let mut cart = Cart::new();
        cart.add(ProductId::new(1), 2);
        assert!(cart.set_quantity(ProductId::new(1), 0));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_negative_removes_entry() {
        let mut cart = Cart::new();
        cart.add(ProductId::new(1), 2);
        assert!(cart.set_quantity(ProductId::new(1), -3));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_absent_reports_failure() {
        let mut cart = Cart::new();
        cart.add(ProductId::new(1), 2);
        assert!(!cart.set_quantity(ProductId::new(99), 5));
        // Mapping unchanged
        assert_eq!(cart.count(), 2);
    }

    #[test]
    fn test_remove_reports_presence() {
        let mut cart = Cart::new();
        cart.add(ProductId::new(1), 1);
        assert!(cart.remove(ProductId::new(1)));
        assert!(!cart.remove(ProductId::new(1)));
    }

    #[test]
    fn test_reconcile_empty_cart() {
        let cart = Cart::new();
        let (items, total) = cart.reconcile(catalog(vec![product(1, 2500)]));
        assert!(items.is_empty());
        assert_eq!(total, Rupees::ZERO);
    }

    #[test]
    fn test_reconcile_totals() {
        let mut cart = Cart::new();
        cart.add(ProductId::new(1), 2);
        cart.add(ProductId::new(2), 1);

        let (items, total) = cart.reconcile(catalog(vec![product(1, 2500), product(2, 399)]));

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].subtotal, Rupees::new(5000));
        assert_eq!(items[1].subtotal, Rupees::new(399));
        assert_eq!(total, Rupees::new(5399));
    }

    #[test]
    fn test_reconcile_drops_missing_products() {
        let mut cart = Cart::new();
        cart.add(ProductId::new(1), 2);
        cart.add(ProductId::new(99), 1);

        let (items, total) = cart.reconcile(catalog(vec![product(1, 2500)]));

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product.id, ProductId::new(1));
        assert_eq!(total, Rupees::new(5000));
        // Reconciliation never mutates the cart
        assert_eq!(cart.count(), 3);
    }

    #[test]
    fn test_reconcile_is_repeatable() {
        let mut cart = Cart::new();
        cart.add(ProductId::new(1), 2);

        let (_, first) = cart.reconcile(catalog(vec![product(1, 2500)]));
        let (_, second) = cart.reconcile(catalog(vec![product(1, 2500)]));
        assert_eq!(first, second);
    }

    #[test]
    fn test_session_json_roundtrip() {
        let mut cart = Cart::new();
        cart.add(ProductId::new(1), 2);
        cart.add(ProductId::new(7), 1);

        let json = serde_json::to_string(&cart).unwrap();
        // Integer keys serialize as JSON object keys
        assert_eq!(json, r#"{"1":2,"7":1}"#);

        let parsed: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, cart);
    }
}
