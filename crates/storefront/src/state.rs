//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::StorefrontConfig;
use crate::services::{EmailService, RazorpayClient};

/// Error building application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to build gateway client: {0}")]
    Gateway(#[from] reqwest::Error),
    #[error("failed to build email transport: {0}")]
    Email(#[from] lettre::transport::smtp::Error),
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The gateway client and email service are
/// optional: without gateway credentials only cash-on-delivery checkout
/// works, and without SMTP settings order notifications are skipped.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    razorpay: Option<RazorpayClient>,
    email: Option<EmailService>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured gateway client or email transport
    /// cannot be constructed.
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Result<Self, StateError> {
        let razorpay = config
            .razorpay
            .as_ref()
            .map(RazorpayClient::new)
            .transpose()?;
        let email = config.email.as_ref().map(EmailService::new).transpose()?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                razorpay,
                email,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get the payment gateway client, if credentials are configured.
    #[must_use]
    pub fn razorpay(&self) -> Option<&RazorpayClient> {
        self.inner.razorpay.as_ref()
    }

    /// Get the email service, if SMTP is configured.
    #[must_use]
    pub fn email(&self) -> Option<&EmailService> {
        self.inner.email.as_ref()
    }
}
