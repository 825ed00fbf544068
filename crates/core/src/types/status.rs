//! Status and category enums.
//!
//! All three enums are stored as TEXT in the database; repositories
//! convert through `Display`/`FromStr` and treat unknown values as data
//! corruption.

use serde::{Deserialize, Serialize};

/// Product category. The catalog carries a fixed small set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Protein,
    Oats,
    Muesli,
    Peanut,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Protein => write!(f, "protein"),
            Self::Oats => write!(f, "oats"),
            Self::Muesli => write!(f, "muesli"),
            Self::Peanut => write!(f, "peanut"),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "protein" => Ok(Self::Protein),
            "oats" => Ok(Self::Oats),
            "muesli" => Ok(Self::Muesli),
            "peanut" => Ok(Self::Peanut),
            _ => Err(format!("invalid category: {s}")),
        }
    }
}

/// Payment outcome recorded on an order.
///
/// `Cod` marks cash-on-delivery orders, which never see the gateway and
/// must stay distinguishable from gateway-confirmed payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentStatus {
    #[default]
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "success")]
    Success,
    #[serde(rename = "COD")]
    Cod,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Success => write!(f, "success"),
            Self::Cod => write!(f, "COD"),
        }
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "success" => Ok(Self::Success),
            "COD" => Ok(Self::Cod),
            _ => Err(format!("invalid payment status: {s}")),
        }
    }
}

/// Fulfillment lifecycle of an order.
///
/// Transitions past `Confirmed` belong to the fulfillment process, not
/// the checkout flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Confirmed => write!(f, "confirmed"),
            Self::Shipped => write!(f, "shipped"),
            Self::Delivered => write!(f, "delivered"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_category_roundtrip() {
        for category in [
            Category::Protein,
            Category::Oats,
            Category::Muesli,
            Category::Peanut,
        ] {
            assert_eq!(Category::from_str(&category.to_string()), Ok(category));
        }
    }

    #[test]
    fn test_category_invalid() {
        assert!(Category::from_str("gummies").is_err());
    }

    #[test]
    fn test_payment_status_cod_marker() {
        assert_eq!(PaymentStatus::Cod.to_string(), "COD");
        assert_eq!(PaymentStatus::from_str("COD"), Ok(PaymentStatus::Cod));
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Cod).unwrap(),
            "\"COD\""
        );
    }

    #[test]
    fn test_order_status_roundtrip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(OrderStatus::from_str(&status.to_string()), Ok(status));
        }
    }
}
