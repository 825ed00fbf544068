//! Integration tests for the Protein Perks storefront.
//!
//! These tests exercise the checkout flow across crate boundaries over
//! its pure parts: cart mutation and reconciliation, order assembly, and
//! payment signature verification. Nothing here needs a running server
//! or database.
//!
//! # Test Files
//!
//! - `tests/cart_lifecycle.rs` - Cart mutation and reconciliation
//! - `tests/checkout_flow.rs` - Order assembly and the double-submit guard
//! - `tests/payment_verification.rs` - Signature verification (fail-closed)

/// Test fixtures shared across the test files.
pub mod fixtures {
    use protein_perks_core::{Category, Email, ProductId, Rupees};
    use protein_perks_storefront::models::{Cart, CustomerDetails, LineItem, Product};

    /// A catalog product with the given ID and whole-rupee price.
    #[must_use]
    pub fn product(id: i32, price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            brand: "Avvatar".to_string(),
            category: Category::Protein,
            description: Some("Test product".to_string()),
            price: Rupees::new(price),
            weight: "1kg".to_string(),
            stock: 100,
            image: format!("/static/images/{id}.jpg"),
        }
    }

    /// A lookup closure over a fixed catalog.
    pub fn catalog(products: Vec<Product>) -> impl FnMut(ProductId) -> Option<Product> {
        move |id| products.iter().find(|p| p.id == id).cloned()
    }

    /// A valid customer.
    ///
    /// # Panics
    ///
    /// Never; the fixture email is valid.
    #[must_use]
    pub fn customer() -> CustomerDetails {
        let email = Email::parse("priya@example.com").expect("fixture email is valid");
        CustomerDetails {
            name: "Priya Sharma".to_string(),
            email,
            phone: "9876543210".to_string(),
            address: "12 MG Road".to_string(),
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            pincode: "560001".to_string(),
        }
    }

    /// Reconcile a cart against a fixed catalog.
    #[must_use]
    pub fn reconcile(cart: &Cart, products: Vec<Product>) -> (Vec<LineItem>, Rupees) {
        cart.reconcile(catalog(products))
    }
}
