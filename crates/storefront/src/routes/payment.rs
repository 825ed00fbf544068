//! Payment verification route handler.

use axum::{Form, Json, extract::State};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::db::{OrderRepository, ProductRepository};
use crate::error::{AppError, Result};
use crate::models::PaymentOutcome;
use crate::services::payment::verify_payment;
use crate::services::{self, email};
use crate::state::AppState;

use super::{clear_checkout_state, load_cart, load_pending_customer};
use super::checkout::PlaceOrderResponse;

/// Fields the gateway's client-side flow posts back after payment.
#[derive(Debug, Deserialize)]
pub struct VerifyPaymentForm {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}

/// Verify a completed gateway payment and place the order.
///
/// Verification is fail-closed: a bad or unverifiable signature rejects
/// the request before anything is read or written. The order is built
/// from the session cart and the customer stashed at checkout intent; a
/// second submission after the cart was cleared is rejected as an empty
/// cart rather than creating a duplicate order.
#[instrument(skip(state, session, form), fields(gateway_order_id = %form.razorpay_order_id))]
pub async fn verify(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<VerifyPaymentForm>,
) -> Result<Json<PlaceOrderResponse>> {
    let verified = verify_payment(
        state.razorpay(),
        &form.razorpay_order_id,
        &form.razorpay_payment_id,
        &form.razorpay_signature,
    );
    if !verified {
        tracing::warn!("payment signature verification failed");
        return Err(AppError::PaymentVerification);
    }

    // Cart first: a resubmission after the cart was already cleared is
    // an empty-cart rejection, not a duplicate order.
    let cart = load_cart(&session).await;
    let (items, _) =
        services::cart::reconciled_items(&cart, &ProductRepository::new(state.pool())).await?;
    if items.is_empty() {
        return Err(AppError::Validation("cart is empty".to_string()));
    }

    let customer = load_pending_customer(&session)
        .await?
        .ok_or_else(|| AppError::Validation("no pending checkout for this session".to_string()))?;

    let order = services::orders::place_order(
        &OrderRepository::new(state.pool()),
        customer,
        &items,
        PaymentOutcome::Gateway {
            order_id: form.razorpay_order_id,
            payment_id: form.razorpay_payment_id,
            signature: form.razorpay_signature,
        },
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
