//! Session key names.
//!
//! Values stored under these keys: the [`crate::models::Cart`] mapping,
//! and the validated [`crate::models::CustomerDetails`] held between the
//! checkout-intent and payment-verification steps.

/// Session keys for checkout state.
pub mod keys {
    /// Key for the visitor's cart mapping.
    pub const CART: &str = "cart";

    /// Key for customer details awaiting payment verification.
    pub const PENDING_CUSTOMER: &str = "pending_customer";
}
