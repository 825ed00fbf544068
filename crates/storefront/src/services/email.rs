//! Order notification email.
//!
//! Best-effort, single attempt: the order is already committed by the
//! time this runs, so a send failure is logged and never propagated.

use askama::Template;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType,
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::EmailConfig;
use crate::models::Order;

/// Plain-text template for the new-order notification.
#[derive(Template)]
#[template(path = "email/order_notification.txt")]
struct OrderNotificationText<'a> {
    order: &'a Order,
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("template error: {0}")]
    Template(#[from] askama::Error),
}

/// SMTP-backed sink for order notifications.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
    notify_address: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the SMTP relay cannot be configured.
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
            notify_address: config.notify_address.clone(),
        })
    }

    /// Send the new-order summary to the notification address.
    ///
    /// # Errors
    ///
    /// Returns an error if the template fails to render or the transport
    /// fails. Single attempt, no retry.
    pub async fn send_order_notification(&self, order: &Order) -> Result<(), EmailError> {
        let body = OrderNotificationText { order }.render()?;

        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(self
                .notify_address
                .parse()
                .map_err(|_| EmailError::InvalidAddress(self.notify_address.clone()))?)
            .subject(format!("New Order #{} - Protein Perks", order.id))
            .header(ContentType::TEXT_PLAIN)
            .body(body)?;

        self.mailer.send(email).await?;

        tracing::info!(order_id = %order.id, "order notification sent");
        Ok(())
    }
}

/// Notify about a new order if email is configured, swallowing failures.
///
/// Runs strictly after the order transaction has committed; an SMTP or
/// template failure must not surface to the customer or touch the order.
pub async fn notify_best_effort(service: Option<&EmailService>, order: &Order) {
    let Some(service) = service else {
        return;
    };

    if let Err(e) = service.send_order_notification(order).await {
        tracing::warn!(order_id = %order.id, error = %e, "failed to send order notification");
    }
}
