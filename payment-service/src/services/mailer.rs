//! Payment notification mail.

use anyhow::{anyhow, Result};
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::ExposeSecret;

use crate::config::SmtpConfig;
use crate::models::Payment;

#[derive(Clone)]
pub struct Mailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from_address: String,
}

impl Mailer {
    pub fn new(config: &SmtpConfig) -> Result<Self> {
        let transport = if config.enabled {
            let credentials = Credentials::new(
                config.username.clone(),
                config.password.expose_secret().clone(),
            );
            let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                .map_err(|e| anyhow!("Invalid SMTP relay host: {}", e))?
                .credentials(credentials)
                .build();
            Some(transport)
        } else {
            None
        };

        Ok(Self {
            transport,
            from_address: config.from_address.clone(),
        })
    }

    /// Send the payment confirmation mail in the background. Delivery
    /// failure is logged and never fails the request that triggered it.
    pub fn notify_payment(&self, payment: &Payment, recipient: &str) {
        let Some(transport) = self.transport.clone() else {
            tracing::debug!(
                payment_id = payment.payment_id,
                "SMTP disabled, skipping payment notification"
            );
            return;
        };

        let message = match self.build_message(payment, recipient) {
            Ok(message) => message,
            Err(e) => {
                tracing::error!(
                    payment_id = payment.payment_id,
                    error = %e,
                    "Failed to build payment notification"
                );
                return;
            }
        };

        let payment_id = payment.payment_id;
        tokio::spawn(async move {
            match transport.send(message).await {
                Ok(_) => {
                    tracing::info!(payment_id = payment_id, "Payment notification sent");
                }
                Err(e) => {
                    tracing::error!(
                        payment_id = payment_id,
                        error = %e,
                        "Failed to send payment notification"
                    );
                }
            }
        });
    }

    fn build_message(&self, payment: &Payment, recipient: &str) -> Result<Message> {
        let body = format!(
            "Your payment has been recorded.\n\n\
             Payment id: {}\n\
             Invoice: {}\n\
             Amount: {:.2}\n\
             Status: {}\n",
            payment.payment_id, payment.invoice_id, payment.price, payment.status
        );

        Message::builder()
            .from(self.from_address.parse()?)
            .to(recipient.parse()?)
            .subject(format!("Payment confirmation #{}", payment.payment_id))
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| anyhow!("Failed to build mail message: {}", e))
    }
}
