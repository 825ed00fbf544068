//! Checkout route handlers.
//!
//! Two paths out of the cart: an online gateway intent that the client
//! completes and posts back to `/payment/verify`, and an immediate
//! cash-on-delivery order with a fixed surcharge.

use axum::{Form, Json, extract::State};
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;

use protein_perks_core::OrderId;

use crate::db::{OrderRepository, ProductRepository};
use crate::error::{AppError, Result};
use crate::models::{CustomerForm, PaymentOutcome};
use crate::services::payment::PaymentError;
use crate::services::{self, email};
use crate::state::AppState;

use super::{clear_checkout_state, load_cart, save_pending_customer};

/// Response for a created checkout intent, consumed by the client-side
/// gateway widget.
#[derive(Debug, Serialize)]
pub struct CheckoutIntentResponse {
    pub success: bool,
    pub razorpay_order_id: String,
    /// Amount in paise, as the gateway expects
    pub amount: i64,
    pub currency: String,
    pub key_id: String,
}

/// Response for a placed order.
#[derive(Debug, Serialize)]
pub struct PlaceOrderResponse {
    pub success: bool,
    pub order_id: OrderId,
}

/// Create a payment intent for the current cart.
///
/// Validates the customer fields and the cart, creates a gateway order
/// for the cart total, and stashes the customer in the session for the
/// verification step. Nothing is persisted yet; abandoning here leaves
/// the cart intact.
#[instrument(skip(state, session, form))]
pub async fn intent(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CustomerForm>,
) -> Result<Json<CheckoutIntentResponse>> {
    let customer = form.validate()?;

    let cart = load_cart(&session).await;
    let (items, total) =
        services::cart::reconciled_items(&cart, &ProductRepository::new(state.pool())).await?;
    if items.is_empty() {
        return Err(AppError::Validation("cart is empty".to_string()));
    }

    let razorpay = state.razorpay().ok_or(PaymentError::NotConfigured)?;
    let receipt = format!("rcpt_{}", Uuid::new_v4().simple());
    let gateway_order = razorpay.create_order(total, &receipt).await?;

    save_pending_customer(&session, &customer).await?;

    Ok(Json(CheckoutIntentResponse {
        success: true,
        razorpay_order_id: gateway_order.id,
        amount: gateway_order.amount,
        currency: gateway_order.currency,
        key_id: razorpay.key_id().to_string(),
    }))
}

/// Place a cash-on-delivery order for the current cart.
///
/// The configured surcharge is added to the total and the order is
/// recorded with the `COD` payment marker. The cart is cleared only
/// after the order transaction commits.
#[instrument(skip(state, session, form))]
pub async fn cash_on_delivery(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CustomerForm>,
) -> Result<Json<PlaceOrderResponse>> {
    let customer = form.validate()?;

    let cart = load_cart(&session).await;
    let (items, _) =
        services::cart::reconciled_items(&cart, &ProductRepository::new(state.pool())).await?;

    let order = services::orders::place_order(
        &OrderRepository::new(state.pool()),
        customer,
        &items,
        PaymentOutcome::CashOnDelivery,
        state.config().cod_charge,
    )
    .await?;

    clear_checkout_state(&session).await?;
    email::notify_best_effort(state.email(), &order).await;

    Ok(Json(PlaceOrderResponse {
        success: true,
        order_id: order.id,
    }))
}
