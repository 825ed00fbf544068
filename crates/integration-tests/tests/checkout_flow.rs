//! Order assembly from reconciled carts, including the double-submit
//! guard.

use protein_perks_core::{OrderStatus, PaymentStatus, ProductId, Rupees};
use protein_perks_storefront::models::{Cart, PaymentOutcome};
use protein_perks_storefront::services::orders::{OrderError, prepare_order};

use protein_perks_integration_tests::fixtures::{customer, product, reconcile};

const COD_CHARGE: Rupees = Rupees::new(80);

#[test]
fn test_cod_order_adds_surcharge_to_reconciled_total() {
    let mut cart = Cart::new();
    cart.add(ProductId::new(1), 2);
    cart.add(ProductId::new(2), 1);

    let (items, total) = reconcile(&cart, vec![product(1, 2500), product(2, 399)]);
    assert_eq!(total, Rupees::new(5399));

    let order = prepare_order(customer(), &items, PaymentOutcome::CashOnDelivery, COD_CHARGE)
        .expect("non-empty cart");

    assert_eq!(order.total_amount, Rupees::new(5479));
    assert_eq!(order.payment_status, PaymentStatus::Cod);
    assert_eq!(order.order_status, OrderStatus::Pending);

    let subtotals: Vec<i64> = order.items.iter().map(|i| i.subtotal.as_i64()).collect();
    assert_eq!(subtotals, vec![5000, 399]);
}

#[test]
fn test_gateway_order_is_confirmed_without_surcharge() {
    let mut cart = Cart::new();
    cart.add(ProductId::new(1), 2);

    let (items, _) = reconcile(&cart, vec![product(1, 2500)]);
    let order = prepare_order(
        customer(),
        &items,
        PaymentOutcome::Gateway {
            order_id: "order_abc".to_string(),
            payment_id: "pay_xyz".to_string(),
            signature: "deadbeef".to_string(),
        },
        COD_CHARGE,
    )
    .expect("non-empty cart");

    assert_eq!(order.total_amount, Rupees::new(5000));
    assert_eq!(order.payment_status, PaymentStatus::Success);
    assert_eq!(order.order_status, OrderStatus::Confirmed);
    assert_eq!(order.razorpay_payment_id.as_deref(), Some("pay_xyz"));
}

#[test]
fn test_order_total_equals_item_subtotals_plus_surcharge() {
    let mut cart = Cart::new();
    cart.add(ProductId::new(1), 3);
    cart.add(ProductId::new(2), 2);

    let (items, _) = reconcile(&cart, vec![product(1, 1200), product(2, 450)]);
    let order = prepare_order(customer(), &items, PaymentOutcome::CashOnDelivery, COD_CHARGE)
        .expect("non-empty cart");

    let item_sum: Rupees = order.items.iter().map(|i| i.subtotal).sum();
    assert_eq!(order.total_amount, item_sum + COD_CHARGE);
}

#[test]
fn test_stale_cart_entry_never_becomes_an_order_item() {
    let mut cart = Cart::new();
    cart.add(ProductId::new(1), 1);
    cart.add(ProductId::new(99), 5);

    let (items, _) = reconcile(&cart, vec![product(1, 2500)]);
    let order = prepare_order(customer(), &items, PaymentOutcome::CashOnDelivery, COD_CHARGE)
        .expect("one valid item remains");

    assert_eq!(order.items.len(), 1);
    assert!(
        order
            .items
            .iter()
            .all(|i| i.product_id != ProductId::new(99))
    );
}

#[test]
fn test_empty_cart_is_rejected() {
    let cart = Cart::new();
    let (items, _) = reconcile(&cart, vec![product(1, 2500)]);

    let result = prepare_order(customer(), &items, PaymentOutcome::CashOnDelivery, COD_CHARGE);
    assert!(matches!(result, Err(OrderError::EmptyCart)));
}

/// Finalizing twice with the same session: the first call clears the
/// cart, so the second reconciles to nothing and is rejected instead of
/// creating a duplicate order.
#[test]
fn test_double_submit_after_cart_cleared_is_rejected() {
    let mut cart = Cart::new();
    cart.add(ProductId::new(1), 2);

    // First finalize succeeds...
    let (items, _) = reconcile(&cart, vec![product(1, 2500)]);
    let first = prepare_order(customer(), &items, PaymentOutcome::CashOnDelivery, COD_CHARGE);
    assert!(first.is_ok());

    // ...and the caller clears the cart after the order commits.
    cart.clear();

    // Second finalize sees an empty cart.
    let (items, _) = reconcile(&cart, vec![product(1, 2500)]);
    let second = prepare_order(customer(), &items, PaymentOutcome::CashOnDelivery, COD_CHARGE);
    assert!(matches!(second, Err(OrderError::EmptyCart)));
}
