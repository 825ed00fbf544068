//! Product repository for catalog reads.
//!
//! The checkout flow never writes products; the catalog is owned by a
//! separate management process.

use std::str::FromStr;

use sqlx::PgPool;

use protein_perks_core::{Category, ProductId, Rupees};

use super::RepositoryError;
use crate::models::Product;

/// Raw product row; validated into [`Product`] on read.
#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    brand: String,
    category: String,
    description: Option<String>,
    price: i64,
    weight: String,
    stock: i32,
    image: String,
}

impl ProductRow {
    fn into_product(self) -> Result<Product, RepositoryError> {
        let category = Category::from_str(&self.category)
            .map_err(|e| RepositoryError::DataCorruption(format!("product {}: {e}", self.id)))?;
        let stock = u32::try_from(self.stock).map_err(|_| {
            RepositoryError::DataCorruption(format!("product {}: negative stock", self.id))
        })?;

        Ok(Product {
            id: ProductId::new(self.id),
            name: self.name,
            brand: self.brand,
            category,
            description: self.description,
            price: Rupees::new(self.price),
            weight: self.weight,
            stock,
            image: self.image,
        })
    }
}

const PRODUCT_COLUMNS: &str =
    "id, name, brand, category, description, price, weight, stock, image";

/// Repository for catalog reads.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a product by ID. Returns `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(ProductRow::into_product).transpose()
    }

    /// Fetch all products whose IDs appear in `ids`, in one query.
    ///
    /// Unknown IDs are simply absent from the result; the cart
    /// reconciliation treats that as a stale reference.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if a stored row is invalid.
    pub async fn get_many(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let raw_ids: Vec<i32> = ids.iter().map(ProductId::as_i32).collect();
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ANY($1) ORDER BY id"
        ))
        .bind(&raw_ids)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(ProductRow::into_product).collect()
    }

    /// List the catalog, optionally filtered to one category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if a stored row is invalid.
    pub async fn list(&self, category: Option<Category>) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE $1::text IS NULL OR category = $1 \
             ORDER BY id"
        ))
        .bind(category.map(|c| c.to_string()))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(ProductRow::into_product).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn row(category: &str, stock: i32) -> ProductRow {
        ProductRow {
            id: 1,
            name: "Whey Protein".to_string(),
            brand: "Avvatar".to_string(),
            category: category.to_string(),
            description: None,
            price: 2500,
            weight: "1kg".to_string(),
            stock,
            image: "/static/images/whey.jpg".to_string(),
        }
    }

    #[test]
    fn test_row_conversion() {
        let product = row("protein", 100).into_product().unwrap();
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.category, Category::Protein);
        assert_eq!(product.price, Rupees::new(2500));
    }

    #[test]
    fn test_row_conversion_rejects_unknown_category() {
        let result = row("gummies", 100).into_product();
        assert!(matches!(result, Err(RepositoryError::DataCorruption(_))));
    }

    #[test]
    fn test_row_conversion_rejects_negative_stock() {
        let result = row("protein", -1).into_product();
        assert!(matches!(result, Err(RepositoryError::DataCorruption(_))));
    }
}
