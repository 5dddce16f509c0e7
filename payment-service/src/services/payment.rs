//! Payment operations: creation, hosted checkout, callbacks, listings.

use std::sync::Arc;

use service_core::error::AppError;
use service_core::retry::{retry_with_backoff, RetryPolicy};
use tracing::instrument;
use validator::Validate;

use crate::dtos::{
    CheckoutRequest, CheckoutResponse, CreatePaymentRequest, PaginatedResponse, PaymentListQuery,
    PaymentWithServiceResponse, UpdatePaymentRequest,
};
use crate::models::{payment_status, Payment};
use crate::repository::{NewPayment, PaymentFilter, PaymentStore, SearchPagination};
use crate::services::enrichment::Enrichment;
use crate::services::mailer::Mailer;
use crate::services::metrics::{CHECKOUT_LINKS_TOTAL, PAYMENTS_TOTAL};
use crate::services::payos::PayosClient;

#[derive(Clone)]
pub struct PaymentService {
    store: Arc<dyn PaymentStore>,
    enrichment: Enrichment,
    payos: PayosClient,
    mailer: Mailer,
    callback_retry: RetryPolicy,
}

impl PaymentService {
    pub fn new(
        store: Arc<dyn PaymentStore>,
        enrichment: Enrichment,
        payos: PayosClient,
        mailer: Mailer,
    ) -> Self {
        Self {
            store,
            enrichment,
            payos,
            mailer,
            callback_retry: RetryPolicy::quick(),
        }
    }

    /// Direct creation records an already settled payment and sends the
    /// confirmation mail in the background. Deferred settlement goes
    /// through [`Self::checkout`] instead.
    #[instrument(skip(self, request), fields(invoice_id = request.invoice_id))]
    pub async fn create(&self, request: CreatePaymentRequest) -> Result<Payment, AppError> {
        request.validate()?;

        let payment = self
            .store
            .create_payment(&NewPayment {
                customer_id: request.customer_id,
                invoice_id: request.invoice_id,
                service_id: request.service_id,
                price: request.price,
                status: payment_status::PAID.to_string(),
                payment_method: request.payment_method,
            })
            .await?;

        PAYMENTS_TOTAL
            .with_label_values(&[payment_status::PAID])
            .inc();

        self.notify_customer(&payment).await;

        Ok(payment)
    }

    /// Create a pending payment and ask the gateway for a checkout link.
    #[instrument(skip(self, request), fields(invoice_id = request.invoice_id))]
    pub async fn checkout(&self, request: CheckoutRequest) -> Result<CheckoutResponse, AppError> {
        request.validate()?;

        let description = request
            .description
            .clone()
            .unwrap_or_else(|| format!("Tour booking invoice {}", request.invoice_id));

        let link = self
            .payos
            .create_payment_link(request.invoice_id, request.price.round() as u64, &description)
            .await
            .map_err(|e| {
                CHECKOUT_LINKS_TOTAL.with_label_values(&["failed"]).inc();
                tracing::error!(
                    invoice_id = request.invoice_id,
                    error = %e,
                    "Checkout link generation failed"
                );
                AppError::GatewayError("payment link generation failed".to_string())
            })?;

        CHECKOUT_LINKS_TOTAL.with_label_values(&["created"]).inc();

        let payment = self
            .store
            .create_payment(&NewPayment {
                customer_id: request.customer_id,
                invoice_id: request.invoice_id,
                service_id: request.service_id,
                price: request.price,
                status: payment_status::PENDING.to_string(),
                payment_method: request.payment_method,
            })
            .await?;

        PAYMENTS_TOTAL
            .with_label_values(&[payment_status::PENDING])
            .inc();

        Ok(CheckoutResponse {
            payment,
            checkout_url: link.checkout_url,
        })
    }

    #[instrument(skip(self))]
    pub async fn get(&self, payment_id: i64) -> Result<Payment, AppError> {
        self.store
            .get_payment(payment_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Payment not found")))
    }

    /// Detail view with the tour service name; the lookup is the point
    /// of this response, so a directory failure propagates.
    #[instrument(skip(self))]
    pub async fn get_with_service(
        &self,
        payment_id: i64,
    ) -> Result<PaymentWithServiceResponse, AppError> {
        let payment = self.get(payment_id).await?;
        self.enrichment.payment_with_service(payment).await
    }

    #[instrument(skip(self, query))]
    pub async fn list(
        &self,
        query: PaymentListQuery,
    ) -> Result<PaginatedResponse<Payment>, AppError> {
        let pagination = SearchPagination::new(
            query.page,
            query.per_page,
            query.keyword,
            query.sort_by.as_deref(),
            query.order.as_deref(),
        );
        let filter = PaymentFilter {
            customer_id: query.customer_id,
            invoice_id: query.invoice_id,
            service_id: query.service_id,
            status: query.status,
        };

        let page = self.store.list_payments(&filter, &pagination).await?;
        let total_pages = page.total_pages();
        let has_next = page.has_next();
        let has_previous = page.has_previous();

        Ok(PaginatedResponse {
            data: page.rows,
            total_count: page.total_count,
            page: page.page,
            per_page: page.per_page,
            total_pages,
            has_next,
            has_previous,
        })
    }

    /// Partial update; only fields present in the request overwrite the
    /// stored row, and only the payment method is writable.
    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        payment_id: i64,
        request: UpdatePaymentRequest,
    ) -> Result<Payment, AppError> {
        request.validate()?;

        let mut payment = self.get(payment_id).await?;
        if let Some(method) = request.payment_method {
            payment.payment_method = method;
        }

        let updated = self.store.update_payment(&payment).await?;
        if !updated {
            return Err(AppError::NotFound(anyhow::anyhow!("Payment not found")));
        }

        self.get(payment_id).await
    }

    /// Gateway success callback: pending -> paid.
    #[instrument(skip(self))]
    pub async fn confirm(&self, payment_id: i64) -> Result<Payment, AppError> {
        let payment = self
            .transition(payment_id, payment_status::PAID)
            .await?;
        self.notify_customer(&payment).await;
        Ok(payment)
    }

    /// Gateway cancel callback: pending -> cancelled.
    #[instrument(skip(self))]
    pub async fn cancel(&self, payment_id: i64) -> Result<Payment, AppError> {
        self.transition(payment_id, payment_status::CANCELLED).await
    }

    async fn transition(&self, payment_id: i64, status: &str) -> Result<Payment, AppError> {
        // The row may lag the just-committed write when the gateway calls
        // back immediately, so the initial read retries briefly.
        let payment = retry_with_backoff(
            &self.callback_retry,
            "get_payment_for_callback",
            |e: &AppError| matches!(e, AppError::DatabaseError(_)),
            || async {
                self.store
                    .get_payment(payment_id)
                    .await?
                    .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Payment not found")))
            },
        )
        .await?;

        if payment.status != payment_status::PENDING {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Payment {} is already {}",
                payment_id,
                payment.status
            )));
        }

        let updated = self.store.update_payment_status(payment_id, status).await?;
        if !updated {
            return Err(AppError::NotFound(anyhow::anyhow!("Payment not found")));
        }

        PAYMENTS_TOTAL.with_label_values(&[status]).inc();

        self.store
            .get_payment(payment_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Payment not found")))
    }

    /// Resolve the customer's address and send the mail in the
    /// background; a directory failure only skips the notification.
    async fn notify_customer(&self, payment: &Payment) {
        match self
            .enrichment
            .users()
            .get_customer_by_id(payment.customer_id)
            .await
        {
            Ok(profile) if !profile.email.is_empty() => {
                self.mailer.notify_payment(payment, &profile.email);
            }
            Ok(_) => {
                tracing::debug!(
                    payment_id = payment.payment_id,
                    "Customer has no mail address, skipping notification"
                );
            }
            Err(e) => {
                tracing::warn!(
                    payment_id = payment.payment_id,
                    error = %e,
                    "Customer lookup failed, skipping notification"
                );
            }
        }
    }
}
