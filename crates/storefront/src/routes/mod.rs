//! HTTP route handlers for the storefront JSON API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database)
//!
//! # Products
//! GET  /products               - Catalog listing (?category= filter)
//! GET  /products/{id}          - Product detail
//!
//! # Cart
//! GET  /cart                   - Reconciled cart view (items + total)
//! POST /cart/add               - Add product (increments quantity)
//! POST /cart/update            - Overwrite quantity (<= 0 removes)
//! POST /cart/remove            - Remove product
//! GET  /cart/count             - Cart badge count
//!
//! # Checkout
//! POST /checkout/intent        - Create gateway order, stash customer
//! POST /checkout/cod           - Place cash-on-delivery order
//! POST /payment/verify         - Verify gateway payment, place order
//!
//! # Orders
//! GET  /orders/{id}            - Order confirmation view
//! GET  /orders?email=          - Order history for a customer
//! ```

pub mod cart;
pub mod checkout;
pub mod orders;
pub mod payment;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::session::keys;
use crate::models::{Cart, CustomerDetails};
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .route("/checkout/intent", post(checkout::intent))
        .route("/checkout/cod", post(checkout::cash_on_delivery))
        .route("/payment/verify", post(payment::verify))
        .nest("/orders", order_routes())
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the visitor's cart, defaulting to empty.
pub(crate) async fn load_cart(session: &Session) -> Cart {
    session
        .get::<Cart>(keys::CART)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Write the cart back to the session.
pub(crate) async fn save_cart(session: &Session, cart: &Cart) -> Result<(), AppError> {
    session
        .insert(keys::CART, cart)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))
}

/// Stash validated customer details between checkout intent and payment
/// verification.
pub(crate) async fn save_pending_customer(
    session: &Session,
    customer: &CustomerDetails,
) -> Result<(), AppError> {
    session
        .insert(keys::PENDING_CUSTOMER, customer)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))
}

/// Load customer details stashed at checkout intent.
pub(crate) async fn load_pending_customer(
    session: &Session,
) -> Result<Option<CustomerDetails>, AppError> {
    session
        .get::<CustomerDetails>(keys::PENDING_CUSTOMER)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))
}

/// Drop all checkout state after an order has committed.
pub(crate) async fn clear_checkout_state(session: &Session) -> Result<(), AppError> {
    session
        .remove::<Cart>(keys::CART)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    session
        .remove::<CustomerDetails>(keys::PENDING_CUSTOMER)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    Ok(())
}
