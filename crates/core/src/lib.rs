//! Protein Perks Core - Shared domain types.
//!
//! This crate provides the domain vocabulary used by the storefront:
//! type-safe IDs, validated email addresses, whole-rupee money, and the
//! catalog/order status enums.
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no
//! HTTP clients. Database encode/decode support for the newtypes is
//! gated behind the `postgres` feature.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
