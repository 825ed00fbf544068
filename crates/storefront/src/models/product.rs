//! Catalog product model.

use serde::{Deserialize, Serialize};

use protein_perks_core::{Category, ProductId, Rupees};

/// A catalog product.
///
/// The checkout flow only reads products; the catalog is maintained by a
/// separate process. Prices are whole rupees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub brand: String,
    pub category: Category,
    pub description: Option<String>,
    pub price: Rupees,
    /// Pack size label, e.g. "1kg" or "500g"
    pub weight: String,
    pub stock: u32,
    /// Image URL or path
    pub image: String,
}
