//! Order lookup route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use protein_perks_core::{Email, OrderId};

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::models::Order;
use crate::state::AppState;

/// Order history query parameters.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub email: String,
}

/// Show a persisted order, for the confirmation view.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<Order>> {
    OrderRepository::new(state.pool())
        .get(OrderId::new(id))
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))
}

/// List a customer's orders, newest first.
#[instrument(skip(state, query))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<Order>>> {
    let email = Email::parse(query.email.trim())
        .map_err(|e| AppError::Validation(format!("invalid email address: {e}")))?;

    let orders = OrderRepository::new(state.pool())
        .list_by_email(&email)
        .await?;
    Ok(Json(orders))
}
