//! Order placement.
//!
//! [`place_order`] is the single path from reconciled line items to a
//! durable order. It rejects empty carts before touching storage, derives
//! totals and statuses from the payment outcome, and delegates the
//! all-or-nothing write to [`OrderRepository::create`]. Callers clear the
//! session cart only after this returns `Ok`.

use thiserror::Error;

use protein_perks_core::{OrderStatus, PaymentStatus, Rupees};

use crate::db::{NewOrder, NewOrderItem, OrderRepository, RepositoryError};
use crate::models::{CustomerDetails, LineItem, Order, PaymentOutcome};

/// Errors that can occur while placing an order.
#[derive(Debug, Error)]
pub enum OrderError {
    /// No line items survived reconciliation; nothing to order.
    #[error("cart is empty")]
    EmptyCart,

    /// The order transaction failed; nothing was written.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Assemble a [`NewOrder`] from reconciled line items and a payment
/// outcome.
///
/// Total is the sum of line subtotals, plus `cod_charge` for
/// cash-on-delivery. Gateway-verified payments are recorded as
/// success/confirmed; cash-on-delivery orders start out pending with the
/// distinct `COD` payment marker.
///
/// # Errors
///
/// Returns [`OrderError::EmptyCart`] if `line_items` is empty.
pub fn prepare_order(
    customer: CustomerDetails,
    line_items: &[LineItem],
    outcome: PaymentOutcome,
    cod_charge: Rupees,
) -> Result<NewOrder, OrderError> {
    if line_items.is_empty() {
        return Err(OrderError::EmptyCart);
    }

    let item_total: Rupees = line_items.iter().map(|item| item.subtotal).sum();

    let (total_amount, payment_status, order_status, gateway) = match outcome {
        PaymentOutcome::Gateway {
            order_id,
            payment_id,
            signature,
        } => (
            item_total,
            PaymentStatus::Success,
            OrderStatus::Confirmed,
            (Some(order_id), Some(payment_id), Some(signature)),
        ),
        PaymentOutcome::CashOnDelivery => (
            item_total + cod_charge,
            PaymentStatus::Cod,
            OrderStatus::Pending,
            (None, None, None),
        ),
    };

    let items = line_items
        .iter()
        .map(|item| NewOrderItem {
            product_id: item.product.id,
            product_name: item.product.name.clone(),
            product_brand: item.product.brand.clone(),
            product_weight: item.product.weight.clone(),
            product_image: item.product.image.clone(),
            quantity: item.quantity,
            price_per_unit: item.product.price,
            subtotal: item.subtotal,
        })
        .collect();

    let (razorpay_order_id, razorpay_payment_id, razorpay_signature) = gateway;
    Ok(NewOrder {
        customer,
        total_amount,
        payment_status,
        order_status,
        razorpay_order_id,
        razorpay_payment_id,
        razorpay_signature,
        items,
    })
}

/// Place an order: validate, snapshot, and persist atomically.
///
/// # Errors
///
/// Returns [`OrderError::EmptyCart`] for an empty line-item sequence (no
/// row is written), or [`OrderError::Repository`] if the transaction
/// fails (fully rolled back; the caller's cart is untouched and can be
/// retried).
pub async fn place_order(
    orders: &OrderRepository<'_>,
    customer: CustomerDetails,
    line_items: &[LineItem],
    outcome: PaymentOutcome,
    cod_charge: Rupees,
) -> Result<Order, OrderError> {
    let new_order = prepare_order(customer, line_items, outcome, cod_charge)?;
    let order = orders.create(new_order).await?;

    tracing::info!(
        order_id = %order.id,
        total = %order.total_amount,
        payment_status = %order.payment_status,
        "order placed"
    );

    Ok(order)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use protein_perks_core::{Category, Email, ProductId};

    use super::*;
    use crate::models::Product;

    fn customer() -> CustomerDetails {
        CustomerDetails {
            name: "Priya Sharma".to_string(),
            email: Email::parse("priya@example.com").unwrap(),
            phone: "9876543210".to_string(),
            address: "12 MG Road".to_string(),
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            pincode: "560001".to_string(),
        }
    }

    fn line_item(id: i32, price: i64, quantity: u32) -> LineItem {
        let product = Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            brand: "Avvatar".to_string(),
            category: Category::Protein,
            description: None,
            price: Rupees::new(price),
            weight: "1kg".to_string(),
            stock: 100,
            image: format!("/static/images/{id}.jpg"),
        };
        LineItem {
            subtotal: product.price * quantity,
            product,
            quantity,
        }
    }

    #[test]
    fn test_prepare_order_rejects_empty_cart() {
        let result = prepare_order(
            customer(),
            &[],
            PaymentOutcome::CashOnDelivery,
            Rupees::new(80),
        );
        assert!(matches!(result, Err(OrderError::EmptyCart)));
    }

    #[test]
    fn test_prepare_order_cod_adds_surcharge() {
        let items = vec![line_item(1, 2500, 2), line_item(2, 399, 1)];
        let order = prepare_order(
            customer(),
            &items,
            PaymentOutcome::CashOnDelivery,
            Rupees::new(80),
        )
        .unwrap();

        assert_eq!(order.total_amount, Rupees::new(5479));
        assert_eq!(order.payment_status, PaymentStatus::Cod);
        assert_eq!(order.order_status, OrderStatus::Pending);
        assert!(order.razorpay_order_id.is_none());

        let subtotals: Vec<i64> = order.items.iter().map(|i| i.subtotal.as_i64()).collect();
        assert_eq!(subtotals, vec![5000, 399]);
    }

    #[test]
    fn test_prepare_order_gateway_payment() {
        let items = vec![line_item(1, 2500, 2)];
        let order = prepare_order(
            customer(),
            &items,
            PaymentOutcome::Gateway {
                order_id: "order_abc".to_string(),
                payment_id: "pay_xyz".to_string(),
                signature: "sig".to_string(),
            },
            Rupees::new(80),
        )
        .unwrap();

        // No surcharge on the online path
        assert_eq!(order.total_amount, Rupees::new(5000));
        assert_eq!(order.payment_status, PaymentStatus::Success);
        assert_eq!(order.order_status, OrderStatus::Confirmed);
        assert_eq!(order.razorpay_order_id.as_deref(), Some("order_abc"));
        assert_eq!(order.razorpay_payment_id.as_deref(), Some("pay_xyz"));
    }

    #[test]
    fn test_prepare_order_total_matches_item_subtotals() {
        let items = vec![line_item(1, 1200, 3), line_item(2, 450, 2)];
        let order = prepare_order(
            customer(),
            &items,
            PaymentOutcome::CashOnDelivery,
            Rupees::new(80),
        )
        .unwrap();

        let item_sum: Rupees = order.items.iter().map(|i| i.subtotal).sum();
        assert_eq!(order.total_amount, item_sum + Rupees::new(80));
    }

    #[test]
    fn test_prepare_order_snapshots_product_fields() {
        let items = vec![line_item(1, 2500, 1)];
        let order = prepare_order(
            customer(),
            &items,
            PaymentOutcome::CashOnDelivery,
            Rupees::new(80),
        )
        .unwrap();

        let item = order.items.first().unwrap();
        assert_eq!(item.product_name, "Product 1");
        assert_eq!(item.product_brand, "Avvatar");
        assert_eq!(item.product_weight, "1kg");
        assert_eq!(item.price_per_unit, Rupees::new(2500));
    }
}
