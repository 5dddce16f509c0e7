//! Revenue record store.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use service_core::error::AppError;
use tracing::{info, instrument};

use super::database::Database;
use super::query::{Page, SearchPagination, SortColumns};
use crate::models::Revenue;
use crate::services::metrics::DB_QUERY_DURATION;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RevenueFilter {
    pub tour_guide_id: Option<i64>,
    pub invoice_id: Option<i64>,
    pub payment_id: Option<i64>,
    pub payment_status: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct NewRevenue {
    pub payment_id: i64,
    pub tour_guide_id: i64,
    pub invoice_id: i64,
    pub total_amount: f64,
    pub actual_received: f64,
    pub platform_commission: f64,
    pub payment_status: bool,
}

#[async_trait]
pub trait RevenueStore: Send + Sync {
    async fn get_revenue(&self, revenue_id: i64) -> Result<Option<Revenue>, AppError>;
    async fn list_revenues(
        &self,
        filter: &RevenueFilter,
        pagination: &SearchPagination,
    ) -> Result<Page<Revenue>, AppError>;
    async fn create_revenue(&self, input: &NewRevenue) -> Result<Revenue, AppError>;
    async fn update_revenue(&self, revenue: &Revenue) -> Result<bool, AppError>;
    async fn delete_revenue(&self, revenue_id: i64) -> Result<bool, AppError>;
    /// All rows for a tour guide created inside one calendar month.
    async fn list_by_month(
        &self,
        tour_guide_id: i64,
        year: i32,
        month: u32,
    ) -> Result<Vec<Revenue>, AppError>;
    async fn total_amount_by_month(
        &self,
        tour_guide_id: i64,
        year: i32,
        month: u32,
    ) -> Result<f64, AppError>;
}

/// Half-open UTC window `[start, end)` covering one calendar month.
pub fn month_bounds(year: i32, month: u32) -> Result<(DateTime<Utc>, DateTime<Utc>), AppError> {
    let start = Utc
        .with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("invalid year/month: {year}-{month}")))?;

    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let end = Utc
        .with_ymd_and_hms(next_year, next_month, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("invalid year/month: {year}-{month}")))?;

    Ok((start, end))
}

const REVENUE_COLUMNS: &str = "revenue_id, payment_id, tour_guide_id, invoice_id, total_amount, \
     actual_received, platform_commission, payment_status, created_at";

const REVENUE_SORT_COLUMNS: SortColumns = SortColumns {
    date: "created_at",
    price: None,
    rating: None,
    amount: Some("total_amount"),
};

const REVENUE_PREDICATE: &str = r#"
    ($1::bigint IS NULL OR tour_guide_id = $1)
    AND ($2::bigint IS NULL OR invoice_id = $2)
    AND ($3::bigint IS NULL OR payment_id = $3)
    AND ($4::boolean IS NULL OR payment_status = $4)
"#;

#[async_trait]
impl RevenueStore for Database {
    #[instrument(skip(self), fields(revenue_id = revenue_id))]
    async fn get_revenue(&self, revenue_id: i64) -> Result<Option<Revenue>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_revenue"])
            .start_timer();

        let revenue = sqlx::query_as::<_, Revenue>(&format!(
            "SELECT {REVENUE_COLUMNS} FROM revenue WHERE revenue_id = $1"
        ))
        .bind(revenue_id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get revenue: {}", e)))?;

        timer.observe_duration();

        Ok(revenue)
    }

    #[instrument(skip(self, filter, pagination))]
    async fn list_revenues(
        &self,
        filter: &RevenueFilter,
        pagination: &SearchPagination,
    ) -> Result<Page<Revenue>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_revenues"])
            .start_timer();

        let total_count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM revenue WHERE {REVENUE_PREDICATE}"
        ))
        .bind(filter.tour_guide_id)
        .bind(filter.invoice_id)
        .bind(filter.payment_id)
        .bind(filter.payment_status)
        .fetch_one(self.pool())
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to count revenue: {}", e)))?;

        let rows = sqlx::query_as::<_, Revenue>(&format!(
            "SELECT {REVENUE_COLUMNS} FROM revenue WHERE {REVENUE_PREDICATE} \
             ORDER BY {} LIMIT $5 OFFSET $6",
            pagination.order_by(REVENUE_SORT_COLUMNS)
        ))
        .bind(filter.tour_guide_id)
        .bind(filter.invoice_id)
        .bind(filter.payment_id)
        .bind(filter.payment_status)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(self.pool())
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list revenue: {}", e)))?;

        timer.observe_duration();

        Ok(Page {
            rows,
            total_count,
            page: pagination.page,
            per_page: pagination.per_page,
        })
    }

    #[instrument(skip(self, input), fields(payment_id = input.payment_id))]
    async fn create_revenue(&self, input: &NewRevenue) -> Result<Revenue, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_revenue"])
            .start_timer();

        let revenue = sqlx::query_as::<_, Revenue>(&format!(
            "INSERT INTO revenue (payment_id, tour_guide_id, invoice_id, total_amount, \
             actual_received, platform_commission, payment_status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {REVENUE_COLUMNS}"
        ))
        .bind(input.payment_id)
        .bind(input.tour_guide_id)
        .bind(input.invoice_id)
        .bind(input.total_amount)
        .bind(input.actual_received)
        .bind(input.platform_commission)
        .bind(input.payment_status)
        .fetch_one(self.pool())
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create revenue: {}", e)))?;

        timer.observe_duration();

        info!(revenue_id = revenue.revenue_id, "Revenue recorded");

        Ok(revenue)
    }

    #[instrument(skip(self, revenue), fields(revenue_id = revenue.revenue_id))]
    async fn update_revenue(&self, revenue: &Revenue) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_revenue"])
            .start_timer();

        let result = sqlx::query(
            "UPDATE revenue SET total_amount = $2, actual_received = $3, \
             platform_commission = $4, payment_status = $5 WHERE revenue_id = $1",
        )
        .bind(revenue.revenue_id)
        .bind(revenue.total_amount)
        .bind(revenue.actual_received)
        .bind(revenue.platform_commission)
        .bind(revenue.payment_status)
        .execute(self.pool())
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update revenue: {}", e)))?;

        timer.observe_duration();

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), fields(revenue_id = revenue_id))]
    async fn delete_revenue(&self, revenue_id: i64) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["delete_revenue"])
            .start_timer();

        let result = sqlx::query("DELETE FROM revenue WHERE revenue_id = $1")
            .bind(revenue_id)
            .execute(self.pool())
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to delete revenue: {}", e))
            })?;

        timer.observe_duration();

        if result.rows_affected() > 0 {
            info!(revenue_id = revenue_id, "Revenue deleted");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    #[instrument(skip(self), fields(tour_guide_id = tour_guide_id, year = year, month = month))]
    async fn list_by_month(
        &self,
        tour_guide_id: i64,
        year: i32,
        month: u32,
    ) -> Result<Vec<Revenue>, AppError> {
        let (start, end) = month_bounds(year, month)?;

        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_revenue_by_month"])
            .start_timer();

        let rows = sqlx::query_as::<_, Revenue>(&format!(
            "SELECT {REVENUE_COLUMNS} FROM revenue \
             WHERE tour_guide_id = $1 AND created_at >= $2 AND created_at < $3 \
             ORDER BY created_at ASC"
        ))
        .bind(tour_guide_id)
        .bind(start)
        .bind(end)
        .fetch_all(self.pool())
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list monthly revenue: {}", e))
        })?;

        timer.observe_duration();

        Ok(rows)
    }

    #[instrument(skip(self), fields(tour_guide_id = tour_guide_id, year = year, month = month))]
    async fn total_amount_by_month(
        &self,
        tour_guide_id: i64,
        year: i32,
        month: u32,
    ) -> Result<f64, AppError> {
        let (start, end) = month_bounds(year, month)?;

        let timer = DB_QUERY_DURATION
            .with_label_values(&["total_revenue_by_month"])
            .start_timer();

        let total: Option<f64> = sqlx::query_scalar(
            "SELECT SUM(total_amount) FROM revenue \
             WHERE tour_guide_id = $1 AND created_at >= $2 AND created_at < $3",
        )
        .bind(tour_guide_id)
        .bind(start)
        .bind(end)
        .fetch_one(self.pool())
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to sum monthly revenue: {}", e))
        })?;

        timer.observe_duration();

        Ok(total.unwrap_or(0.0))
    }
}
