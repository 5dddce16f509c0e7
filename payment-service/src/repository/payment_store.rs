//! Payment record store.

use async_trait::async_trait;
use service_core::error::AppError;
use tracing::{info, instrument};

use super::database::Database;
use super::query::{Page, SearchPagination, SortColumns};
use crate::models::Payment;
use crate::services::metrics::DB_QUERY_DURATION;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentFilter {
    pub customer_id: Option<i64>,
    pub invoice_id: Option<i64>,
    pub service_id: Option<i64>,
    pub status: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewPayment {
    pub customer_id: i64,
    pub invoice_id: i64,
    pub service_id: i64,
    pub price: f64,
    pub status: String,
    pub payment_method: String,
}

#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn get_payment(&self, payment_id: i64) -> Result<Option<Payment>, AppError>;
    async fn list_payments(
        &self,
        filter: &PaymentFilter,
        pagination: &SearchPagination,
    ) -> Result<Page<Payment>, AppError>;
    async fn create_payment(&self, input: &NewPayment) -> Result<Payment, AppError>;
    /// Writes the payment method; returns false when no row matched the id.
    async fn update_payment(&self, payment: &Payment) -> Result<bool, AppError>;
    /// Returns false when no row matched the id.
    async fn update_payment_status(&self, payment_id: i64, status: &str)
        -> Result<bool, AppError>;
}

const PAYMENT_COLUMNS: &str =
    "payment_id, customer_id, invoice_id, service_id, price, status, payment_method, created_at";

const PAYMENT_SORT_COLUMNS: SortColumns = SortColumns {
    date: "created_at",
    price: Some("price"),
    rating: None,
    amount: None,
};

const PAYMENT_PREDICATE: &str = r#"
    ($1::bigint IS NULL OR customer_id = $1)
    AND ($2::bigint IS NULL OR invoice_id = $2)
    AND ($3::bigint IS NULL OR service_id = $3)
    AND ($4::text IS NULL OR status = $4)
    AND ($5::text IS NULL OR payment_method ILIKE '%' || $5 || '%')
"#;

#[async_trait]
impl PaymentStore for Database {
    #[instrument(skip(self), fields(payment_id = payment_id))]
    async fn get_payment(&self, payment_id: i64) -> Result<Option<Payment>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_payment"])
            .start_timer();

        let payment = sqlx::query_as::<_, Payment>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payment WHERE payment_id = $1"
        ))
        .bind(payment_id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get payment: {}", e)))?;

        timer.observe_duration();

        Ok(payment)
    }

    #[instrument(skip(self, filter, pagination))]
    async fn list_payments(
        &self,
        filter: &PaymentFilter,
        pagination: &SearchPagination,
    ) -> Result<Page<Payment>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_payments"])
            .start_timer();

        let total_count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM payment WHERE {PAYMENT_PREDICATE}"
        ))
        .bind(filter.customer_id)
        .bind(filter.invoice_id)
        .bind(filter.service_id)
        .bind(filter.status.as_deref())
        .bind(pagination.keyword.as_deref())
        .fetch_one(self.pool())
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to count payments: {}", e)))?;

        let rows = sqlx::query_as::<_, Payment>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payment WHERE {PAYMENT_PREDICATE} \
             ORDER BY {} LIMIT $6 OFFSET $7",
            pagination.order_by(PAYMENT_SORT_COLUMNS)
        ))
        .bind(filter.customer_id)
        .bind(filter.invoice_id)
        .bind(filter.service_id)
        .bind(filter.status.as_deref())
        .bind(pagination.keyword.as_deref())
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(self.pool())
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list payments: {}", e)))?;

        timer.observe_duration();

        Ok(Page {
            rows,
            total_count,
            page: pagination.page,
            per_page: pagination.per_page,
        })
    }

    #[instrument(skip(self, input), fields(invoice_id = input.invoice_id))]
    async fn create_payment(&self, input: &NewPayment) -> Result<Payment, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_payment"])
            .start_timer();

        let payment = sqlx::query_as::<_, Payment>(&format!(
            "INSERT INTO payment (customer_id, invoice_id, service_id, price, status, payment_method) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {PAYMENT_COLUMNS}"
        ))
        .bind(input.customer_id)
        .bind(input.invoice_id)
        .bind(input.service_id)
        .bind(input.price)
        .bind(&input.status)
        .bind(&input.payment_method)
        .fetch_one(self.pool())
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create payment: {}", e)))?;

        timer.observe_duration();

        info!(
            payment_id = payment.payment_id,
            status = %payment.status,
            "Payment created"
        );

        Ok(payment)
    }

    #[instrument(skip(self, payment), fields(payment_id = payment.payment_id))]
    async fn update_payment(&self, payment: &Payment) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_payment"])
            .start_timer();

        let result = sqlx::query("UPDATE payment SET payment_method = $2 WHERE payment_id = $1")
            .bind(payment.payment_id)
            .bind(&payment.payment_method)
            .execute(self.pool())
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to update payment: {}", e))
            })?;

        timer.observe_duration();

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), fields(payment_id = payment_id, status = status))]
    async fn update_payment_status(
        &self,
        payment_id: i64,
        status: &str,
    ) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_payment_status"])
            .start_timer();

        let result = sqlx::query("UPDATE payment SET status = $2 WHERE payment_id = $1")
            .bind(payment_id)
            .bind(status)
            .execute(self.pool())
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to update payment status: {}", e))
            })?;

        timer.observe_duration();

        if result.rows_affected() > 0 {
            info!(payment_id = payment_id, status = status, "Payment status updated");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
