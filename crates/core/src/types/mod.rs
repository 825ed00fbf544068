//! Core types for Protein Perks.

pub mod email;
pub mod id;
pub mod money;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use money::Rupees;
pub use status::{Category, OrderStatus, PaymentStatus};
