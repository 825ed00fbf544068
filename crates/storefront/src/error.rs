//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding. All route handlers return
//! `Result<T, AppError>`; responses are JSON `{ "success": false,
//! "message": ... }` bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::orders::OrderError;
use crate::services::payment::PaymentError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Payment gateway operation failed.
    #[error("Payment error: {0}")]
    Payment(#[from] PaymentError),

    /// Payment signature verification failed (fail-closed).
    #[error("Payment verification failed")]
    PaymentVerification,

    /// Request input failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::EmptyCart => Self::Validation("cart is empty".to_string()),
            OrderError::Repository(e) => Self::Database(e),
        }
    }
}

impl From<crate::models::ValidationError> for AppError {
    fn from(err: crate::models::ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// JSON error body returned to clients.
#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server-side errors to Sentry
        if matches!(
            self,
            Self::Database(_) | Self::Internal(_) | Self::Payment(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Payment(err) => match err {
                // Missing credentials is an operator mistake, not a
                // client error or a gateway fault
                PaymentError::NotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
                PaymentError::Http(_) | PaymentError::Gateway { .. } => StatusCode::BAD_GATEWAY,
            },
            Self::PaymentVerification | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Payment(err) => match err {
                PaymentError::NotConfigured => "Online payment is not available".to_string(),
                PaymentError::Http(_) | PaymentError::Gateway { .. } => {
                    "Payment gateway error".to_string()
                }
            },
            Self::PaymentVerification => "Payment verification failed".to_string(),
            _ => self.to_string(),
        };

        (
            status,
            Json(ErrorBody {
                success: false,
                message,
            }),
        )
            .into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product 123".to_string());
        assert_eq!(err.to_string(), "Not found: product 123");

        let err = AppError::Validation("cart is empty".to_string());
        assert_eq!(err.to_string(), "Validation error: cart is empty");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            status_of(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::Validation("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::PaymentVerification),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(AppError::Payment(PaymentError::NotConfigured)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(AppError::Payment(PaymentError::Gateway {
                status: 400,
                message: "bad amount".to_string(),
            })),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_empty_cart_maps_to_validation() {
        let err = AppError::from(crate::services::orders::OrderError::EmptyCart);
        assert_eq!(status_of(err), StatusCode::BAD_REQUEST);
    }
}
