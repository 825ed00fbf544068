//! Domain models for the storefront.

pub mod cart;
pub mod order;
pub mod product;
pub mod session;

pub use cart::{Cart, LineItem};
pub use order::{
    CustomerDetails, CustomerForm, Order, OrderItem, PaymentOutcome, ValidationError,
};
pub use product::Product;
