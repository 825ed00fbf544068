//! Order models and customer validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use protein_perks_core::{
    Email, OrderId, OrderItemId, OrderStatus, PaymentStatus, ProductId, Rupees,
};

/// Customer contact and shipping fields as submitted by the client.
///
/// Raw strings; validate into [`CustomerDetails`] before use.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

/// A customer field failed validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("invalid email address: {0}")]
    InvalidEmail(#[from] protein_perks_core::EmailError),
}

/// Validated customer contact and shipping details.
///
/// Stored in the session between the checkout-intent and
/// payment-verification steps, and snapshotted onto the order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

impl CustomerForm {
    /// Validate the form into [`CustomerDetails`].
    ///
    /// Every field is required; surrounding whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` naming the first missing field, or an
    /// email parse failure.
    pub fn validate(self) -> Result<CustomerDetails, ValidationError> {
        let require = |value: String, field: &'static str| {
            let value = value.trim().to_string();
            if value.is_empty() {
                Err(ValidationError::MissingField(field))
            } else {
                Ok(value)
            }
        };

        let email = Email::parse(self.email.trim())?;

        Ok(CustomerDetails {
            name: require(self.name, "name")?,
            email,
            phone: require(self.phone, "phone")?,
            address: require(self.address, "address")?,
            city: require(self.city, "city")?,
            state: require(self.state, "state")?,
            pincode: require(self.pincode, "pincode")?,
        })
    }
}

/// How the customer paid, determined before the order is written.
#[derive(Debug, Clone)]
pub enum PaymentOutcome {
    /// Gateway-verified online payment.
    Gateway {
        /// Gateway order ID created at checkout intent
        order_id: String,
        /// Gateway payment ID returned to the client
        payment_id: String,
        /// Verified signature over (order ID, payment ID)
        signature: String,
    },
    /// Cash on delivery; a fixed surcharge is added to the total.
    CashOnDelivery,
}

/// A persisted order.
///
/// Immutable once written, except for status transitions made by the
/// fulfillment process.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub customer: CustomerDetails,
    pub total_amount: Rupees,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    pub razorpay_order_id: Option<String>,
    pub razorpay_payment_id: Option<String>,
    pub razorpay_signature: Option<String>,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItem>,
}

/// A line of a persisted order.
///
/// Product display fields and the unit price are snapshotted at order
/// time, so later catalog edits never alter historical orders.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub product_id: ProductId,
    pub product_name: String,
    pub product_brand: String,
    pub product_weight: String,
    pub product_image: String,
    pub quantity: u32,
    pub price_per_unit: Rupees,
    /// `quantity * price_per_unit`
    pub subtotal: Rupees,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form() -> CustomerForm {
        CustomerForm {
            name: "Priya Sharma".to_string(),
            email: "priya@example.com".to_string(),
            phone: "9876543210".to_string(),
            address: "12 MG Road".to_string(),
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            pincode: "560001".to_string(),
        }
    }

    #[test]
    fn test_validate_accepts_complete_form() {
        let customer = form().validate().unwrap();
        assert_eq!(customer.name, "Priya Sharma");
        assert_eq!(customer.email.as_str(), "priya@example.com");
    }

    #[test]
    fn test_validate_trims_whitespace() {
        let mut f = form();
        f.name = "  Priya Sharma  ".to_string();
        let customer = f.validate().unwrap();
        assert_eq!(customer.name, "Priya Sharma");
    }

    #[test]
    fn test_validate_rejects_missing_field() {
        let mut f = form();
        f.pincode = "   ".to_string();
        assert_eq!(
            f.validate().unwrap_err(),
            ValidationError::MissingField("pincode")
        );
    }

    #[test]
    fn test_validate_rejects_bad_email() {
        let mut f = form();
        f.email = "not-an-email".to_string();
        assert!(matches!(
            f.validate().unwrap_err(),
            ValidationError::InvalidEmail(_)
        ));
    }
}
