//! Business logic for the checkout flow.

pub mod cart;
pub mod email;
pub mod orders;
pub mod payment;

pub use email::EmailService;
pub use payment::RazorpayClient;
