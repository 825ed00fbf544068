//! Cart reconciliation against the live catalog.

use std::collections::HashMap;

use protein_perks_core::{ProductId, Rupees};

use crate::db::{ProductRepository, RepositoryError};
use crate::models::{Cart, LineItem, Product};

/// Join the cart against current catalog data, producing priced line
/// items and the cart total.
///
/// Products are batch-fetched in a single query; entries whose product no
/// longer exists are dropped by [`Cart::reconcile`]. The cart itself is
/// untouched.
///
/// # Errors
///
/// Returns `RepositoryError` if the catalog fetch fails.
pub async fn reconciled_items(
    cart: &Cart,
    products: &ProductRepository<'_>,
) -> Result<(Vec<LineItem>, Rupees), RepositoryError> {
    if cart.is_empty() {
        return Ok((Vec::new(), Rupees::ZERO));
    }

    let ids: Vec<ProductId> = cart.product_ids().collect();
    let mut by_id: HashMap<ProductId, Product> = products
        .get_many(&ids)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    // Each cart key is distinct, so removing from the map hands each
    // product out exactly once without cloning.
    Ok(cart.reconcile(|id| by_id.remove(&id)))
}
