//! Cart route handlers.
//!
//! The cart lives in the visitor's session as a product-to-quantity
//! mapping; no catalog check happens at mutation time. Totals come from
//! reconciling against live catalog data on read.

use axum::{Form, Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use protein_perks_core::{ProductId, Rupees};

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::models::LineItem;
use crate::services;
use crate::state::AppState;

use super::{load_cart, save_cart};

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: i32,
    pub quantity: Option<u32>,
}

/// Update cart form data. Quantities of zero or less remove the entry.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: i32,
    pub quantity: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: i32,
}

/// Reconciled cart view.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<LineItem>,
    pub total: Rupees,
    pub cart_count: u32,
}

/// Response for cart mutations that change totals.
#[derive(Debug, Serialize)]
pub struct CartSummaryResponse {
    pub success: bool,
    pub total: Rupees,
    pub cart_count: u32,
}

/// Response for adding to the cart.
#[derive(Debug, Serialize)]
pub struct AddToCartResponse {
    pub success: bool,
    pub cart_count: u32,
}

/// Response for removing from the cart.
#[derive(Debug, Serialize)]
pub struct RemoveFromCartResponse {
    pub success: bool,
    pub removed: bool,
    pub total: Rupees,
    pub cart_count: u32,
}

/// Response for the cart badge.
#[derive(Debug, Serialize)]
pub struct CartCountResponse {
    pub cart_count: u32,
}

/// Show the reconciled cart.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    let cart = load_cart(&session).await;
    let (items, total) =
        services::cart::reconciled_items(&cart, &ProductRepository::new(state.pool())).await?;

    Ok(Json(CartView {
        items,
        total,
        cart_count: cart.count(),
    }))
}

/// Add a product to the cart, incrementing any existing quantity.
///
/// No catalog existence check; a stale product ID is dropped at
/// reconciliation instead.
#[instrument(skip(session))]
pub async fn add(
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Json<AddToCartResponse>> {
    let quantity = form.quantity.unwrap_or(1);
    if quantity == 0 {
        return Err(AppError::Validation(
            "quantity must be at least 1".to_string(),
        ));
    }

    let mut cart = load_cart(&session).await;
    cart.add(ProductId::new(form.product_id), quantity);
    save_cart(&session, &cart).await?;

    Ok(Json(AddToCartResponse {
        success: true,
        cart_count: cart.count(),
    }))
}

/// Overwrite the quantity of a product already in the cart.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Result<Json<CartSummaryResponse>> {
    let mut cart = load_cart(&session).await;

    if !cart.set_quantity(ProductId::new(form.product_id), form.quantity) {
        return Err(AppError::NotFound(format!(
            "product {} not in cart",
            form.product_id
        )));
    }

    save_cart(&session, &cart).await?;

    let (_, total) =
        services::cart::reconciled_items(&cart, &ProductRepository::new(state.pool())).await?;

    Ok(Json(CartSummaryResponse {
        success: true,
        total,
        cart_count: cart.count(),
    }))
}

/// Remove a product from the cart.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Json<RemoveFromCartResponse>> {
    let mut cart = load_cart(&session).await;
    let removed = cart.remove(ProductId::new(form.product_id));
    save_cart(&session, &cart).await?;

    let (_, total) =
        services::cart::reconciled_items(&cart, &ProductRepository::new(state.pool())).await?;

    Ok(Json(RemoveFromCartResponse {
        success: true,
        removed,
        total,
        cart_count: cart.count(),
    }))
}

/// Get the cart badge count.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Json<CartCountResponse> {
    let cart = load_cart(&session).await;
    Json(CartCountResponse {
        cart_count: cart.count(),
    })
}
