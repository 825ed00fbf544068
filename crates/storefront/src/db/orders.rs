//! Order repository.
//!
//! Orders and their item snapshots are written in a single transaction:
//! either the whole order lands or none of it does, and the caller only
//! clears the visitor's cart after the commit has returned.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use protein_perks_core::{
    Email, OrderId, OrderItemId, OrderStatus, PaymentStatus, ProductId, Rupees,
};

use super::RepositoryError;
use crate::models::{CustomerDetails, Order, OrderItem};

/// An order ready to be persisted. Totals and statuses are computed by
/// the order service before this struct is built.
#[derive(Debug)]
pub struct NewOrder {
    pub customer: CustomerDetails,
    pub total_amount: Rupees,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    pub razorpay_order_id: Option<String>,
    pub razorpay_payment_id: Option<String>,
    pub razorpay_signature: Option<String>,
    pub items: Vec<NewOrderItem>,
}

/// A product snapshot to be written as an order line.
#[derive(Debug)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub product_brand: String,
    pub product_weight: String,
    pub product_image: String,
    pub quantity: u32,
    pub price_per_unit: Rupees,
    pub subtotal: Rupees,
}

/// Raw order header row; validated into [`Order`] on read.
#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i32,
    customer_name: String,
    customer_email: String,
    customer_phone: String,
    shipping_address: String,
    city: String,
    state: String,
    pincode: String,
    total_amount: i64,
    payment_status: String,
    order_status: String,
    razorpay_order_id: Option<String>,
    razorpay_payment_id: Option<String>,
    razorpay_signature: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    id: i32,
    order_id: i32,
    product_id: i32,
    product_name: String,
    product_brand: String,
    product_weight: String,
    product_image: String,
    quantity: i32,
    price_per_unit: i64,
    subtotal: i64,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> Result<Order, RepositoryError> {
        let email = Email::parse(&self.customer_email).map_err(|e| {
            RepositoryError::DataCorruption(format!("order {}: invalid email: {e}", self.id))
        })?;
        let payment_status = PaymentStatus::from_str(&self.payment_status)
            .map_err(|e| RepositoryError::DataCorruption(format!("order {}: {e}", self.id)))?;
        let order_status = OrderStatus::from_str(&self.order_status)
            .map_err(|e| RepositoryError::DataCorruption(format!("order {}: {e}", self.id)))?;

        Ok(Order {
            id: OrderId::new(self.id),
            customer: CustomerDetails {
                name: self.customer_name,
                email,
                phone: self.customer_phone,
                address: self.shipping_address,
                city: self.city,
                state: self.state,
                pincode: self.pincode,
            },
            total_amount: Rupees::new(self.total_amount),
            payment_status,
            order_status,
            razorpay_order_id: self.razorpay_order_id,
            razorpay_payment_id: self.razorpay_payment_id,
            razorpay_signature: self.razorpay_signature,
            created_at: self.created_at,
            items,
        })
    }
}

impl OrderItemRow {
    fn into_item(self) -> Result<OrderItem, RepositoryError> {
        let quantity = u32::try_from(self.quantity).map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "order item {}: negative quantity",
                self.id
            ))
        })?;

        Ok(OrderItem {
            id: OrderItemId::new(self.id),
            product_id: ProductId::new(self.product_id),
            product_name: self.product_name,
            product_brand: self.product_brand,
            product_weight: self.product_weight,
            product_image: self.product_image,
            quantity,
            price_per_unit: Rupees::new(self.price_per_unit),
            subtotal: Rupees::new(self.subtotal),
        })
    }
}

const ORDER_COLUMNS: &str = "id, customer_name, customer_email, customer_phone, \
     shipping_address, city, state, pincode, total_amount, payment_status, order_status, \
     razorpay_order_id, razorpay_payment_id, razorpay_signature, created_at";

const ORDER_ITEM_COLUMNS: &str = "id, order_id, product_id, product_name, product_brand, \
     product_weight, product_image, quantity, price_per_unit, subtotal";

/// Repository for order persistence.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist an order header and all of its item snapshots atomically.
    ///
    /// A failure at any point rolls the whole order back; no partial
    /// order is ever visible to other requests.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement or the commit
    /// fails.
    pub async fn create(&self, new_order: NewOrder) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let (order_id, created_at) = sqlx::query_as::<_, (i32, DateTime<Utc>)>(
            "INSERT INTO orders \
             (customer_name, customer_email, customer_phone, shipping_address, city, state, \
              pincode, total_amount, payment_status, order_status, razorpay_order_id, \
              razorpay_payment_id, razorpay_signature) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING id, created_at",
        )
        .bind(&new_order.customer.name)
        .bind(new_order.customer.email.as_str())
        .bind(&new_order.customer.phone)
        .bind(&new_order.customer.address)
        .bind(&new_order.customer.city)
        .bind(&new_order.customer.state)
        .bind(&new_order.customer.pincode)
        .bind(new_order.total_amount.as_i64())
        .bind(new_order.payment_status.to_string())
        .bind(new_order.order_status.to_string())
        .bind(&new_order.razorpay_order_id)
        .bind(&new_order.razorpay_payment_id)
        .bind(&new_order.razorpay_signature)
        .fetch_one(&mut *tx)
        .await?;

        let mut items = Vec::with_capacity(new_order.items.len());
        for item in &new_order.items {
            let (item_id,) = sqlx::query_as::<_, (i32,)>(
                "INSERT INTO order_items \
                 (order_id, product_id, product_name, product_brand, product_weight, \
                  product_image, quantity, price_per_unit, subtotal) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
                 RETURNING id",
            )
            .bind(order_id)
            .bind(item.product_id.as_i32())
            .bind(&item.product_name)
            .bind(&item.product_brand)
            .bind(&item.product_weight)
            .bind(&item.product_image)
            .bind(i32::try_from(item.quantity).unwrap_or(i32::MAX))
            .bind(item.price_per_unit.as_i64())
            .bind(item.subtotal.as_i64())
            .fetch_one(&mut *tx)
            .await?;

            items.push(OrderItem {
                id: OrderItemId::new(item_id),
                product_id: item.product_id,
                product_name: item.product_name.clone(),
                product_brand: item.product_brand.clone(),
                product_weight: item.product_weight.clone(),
                product_image: item.product_image.clone(),
                quantity: item.quantity,
                price_per_unit: item.price_per_unit,
                subtotal: item.subtotal,
            });
        }

        tx.commit().await?;

        Ok(Order {
            id: OrderId::new(order_id),
            customer: new_order.customer,
            total_amount: new_order.total_amount,
            payment_status: new_order.payment_status,
            order_status: new_order.order_status,
            razorpay_order_id: new_order.razorpay_order_id,
            razorpay_payment_id: new_order.razorpay_payment_id,
            razorpay_signature: new_order.razorpay_signature,
            created_at,
            items,
        })
    }

    /// Get an order with its items. Returns `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails, or
    /// `RepositoryError::DataCorruption` if a stored row is invalid.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let item_rows = sqlx::query_as::<_, OrderItemRow>(&format!(
            "SELECT {ORDER_ITEM_COLUMNS} FROM order_items WHERE order_id = $1 ORDER BY id"
        ))
        .bind(id.as_i32())
        .fetch_all(self.pool)
        .await?;

        let items = item_rows
            .into_iter()
            .map(OrderItemRow::into_item)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(row.into_order(items)?))
    }

    /// List all orders for a customer email, newest first, with items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails, or
    /// `RepositoryError::DataCorruption` if a stored row is invalid.
    pub async fn list_by_email(&self, email: &Email) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             WHERE customer_email = $1 ORDER BY created_at DESC"
        ))
        .bind(email.as_str())
        .fetch_all(self.pool)
        .await?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let order_ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        let item_rows = sqlx::query_as::<_, OrderItemRow>(&format!(
            "SELECT {ORDER_ITEM_COLUMNS} FROM order_items \
             WHERE order_id = ANY($1) ORDER BY id"
        ))
        .bind(&order_ids)
        .fetch_all(self.pool)
        .await?;

        let mut items_by_order: HashMap<i32, Vec<OrderItem>> = HashMap::new();
        for item_row in item_rows {
            let order_id = item_row.order_id;
            items_by_order
                .entry(order_id)
                .or_default()
                .push(item_row.into_item()?);
        }

        rows.into_iter()
            .map(|row| {
                let items = items_by_order.remove(&row.id).unwrap_or_default();
                row.into_order(items)
            })
            .collect()
    }
}
