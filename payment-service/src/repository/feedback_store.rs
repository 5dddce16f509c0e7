//! Feedback record store.

use async_trait::async_trait;
use service_core::error::AppError;
use tracing::{info, instrument};

use super::database::Database;
use super::query::{Page, SearchPagination, SortColumns};
use crate::models::Feedback;
use crate::services::metrics::DB_QUERY_DURATION;

/// Equality filters for feedback listings. Absent fields match any row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedbackFilter {
    pub customer_id: Option<i64>,
    pub tour_guide_id: Option<i64>,
    pub service_id: Option<i64>,
    pub rating: Option<i32>,
    pub is_deleted: Option<bool>,
}

/// Fields for a new feedback row; the store assigns id and timestamps.
#[derive(Debug, Clone)]
pub struct NewFeedback {
    pub customer_id: i64,
    pub tour_guide_id: i64,
    pub service_id: i64,
    pub invoice_id: i64,
    pub content: String,
    pub rating: i32,
}

/// Average rating and review count for one tour service.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServiceRating {
    pub rating: f64,
    pub review_count: i64,
}

#[async_trait]
pub trait FeedbackStore: Send + Sync {
    async fn get_feedback(&self, feedback_id: i64) -> Result<Option<Feedback>, AppError>;
    async fn list_feedbacks(
        &self,
        filter: &FeedbackFilter,
        pagination: &SearchPagination,
    ) -> Result<Page<Feedback>, AppError>;
    async fn create_feedback(&self, input: &NewFeedback) -> Result<Feedback, AppError>;
    /// Full-row write; returns false when no row matched the id.
    async fn update_feedback(&self, feedback: &Feedback) -> Result<bool, AppError>;
    /// Soft delete; the row stays readable with `is_deleted = true`.
    async fn remove_feedback(&self, feedback_id: i64) -> Result<bool, AppError>;
    async fn service_rating(&self, service_id: i64) -> Result<ServiceRating, AppError>;
}

const FEEDBACK_COLUMNS: &str = "feedback_id, customer_id, tour_guide_id, service_id, invoice_id, \
     content, rating, is_deleted, created_at, updated_at";

const FEEDBACK_SORT_COLUMNS: SortColumns = SortColumns {
    date: "created_at",
    price: None,
    rating: Some("rating"),
    amount: None,
};

const FEEDBACK_PREDICATE: &str = r#"
    ($1::bigint IS NULL OR customer_id = $1)
    AND ($2::bigint IS NULL OR tour_guide_id = $2)
    AND ($3::bigint IS NULL OR service_id = $3)
    AND ($4::int IS NULL OR rating = $4)
    AND ($5::boolean IS NULL OR is_deleted = $5)
    AND ($6::text IS NULL OR content ILIKE '%' || $6 || '%')
"#;

#[async_trait]
impl FeedbackStore for Database {
    #[instrument(skip(self), fields(feedback_id = feedback_id))]
    async fn get_feedback(&self, feedback_id: i64) -> Result<Option<Feedback>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_feedback"])
            .start_timer();

        let feedback = sqlx::query_as::<_, Feedback>(&format!(
            "SELECT {FEEDBACK_COLUMNS} FROM feedback WHERE feedback_id = $1"
        ))
        .bind(feedback_id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get feedback: {}", e)))?;

        timer.observe_duration();

        Ok(feedback)
    }

    #[instrument(skip(self, filter, pagination))]
    async fn list_feedbacks(
        &self,
        filter: &FeedbackFilter,
        pagination: &SearchPagination,
    ) -> Result<Page<Feedback>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_feedbacks"])
            .start_timer();

        let total_count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM feedback WHERE {FEEDBACK_PREDICATE}"
        ))
        .bind(filter.customer_id)
        .bind(filter.tour_guide_id)
        .bind(filter.service_id)
        .bind(filter.rating)
        .bind(filter.is_deleted)
        .bind(pagination.keyword.as_deref())
        .fetch_one(self.pool())
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to count feedback: {}", e)))?;

        // Order column and direction come from a static whitelist, never
        // from client text.
        let rows = sqlx::query_as::<_, Feedback>(&format!(
            "SELECT {FEEDBACK_COLUMNS} FROM feedback WHERE {FEEDBACK_PREDICATE} \
             ORDER BY {} LIMIT $7 OFFSET $8",
            pagination.order_by(FEEDBACK_SORT_COLUMNS)
        ))
        .bind(filter.customer_id)
        .bind(filter.tour_guide_id)
        .bind(filter.service_id)
        .bind(filter.rating)
        .bind(filter.is_deleted)
        .bind(pagination.keyword.as_deref())
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(self.pool())
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list feedback: {}", e)))?;

        timer.observe_duration();

        Ok(Page {
            rows,
            total_count,
            page: pagination.page,
            per_page: pagination.per_page,
        })
    }

    #[instrument(skip(self, input), fields(customer_id = input.customer_id))]
    async fn create_feedback(&self, input: &NewFeedback) -> Result<Feedback, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_feedback"])
            .start_timer();

        let feedback = sqlx::query_as::<_, Feedback>(&format!(
            "INSERT INTO feedback (customer_id, tour_guide_id, service_id, invoice_id, content, rating) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {FEEDBACK_COLUMNS}"
        ))
        .bind(input.customer_id)
        .bind(input.tour_guide_id)
        .bind(input.service_id)
        .bind(input.invoice_id)
        .bind(&input.content)
        .bind(input.rating)
        .fetch_one(self.pool())
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create feedback: {}", e)))?;

        timer.observe_duration();

        info!(feedback_id = feedback.feedback_id, "Feedback created");

        Ok(feedback)
    }

    #[instrument(skip(self, feedback), fields(feedback_id = feedback.feedback_id))]
    async fn update_feedback(&self, feedback: &Feedback) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_feedback"])
            .start_timer();

        let result = sqlx::query(
            "UPDATE feedback SET content = $2, rating = $3, is_deleted = $4, updated_at = NOW() \
             WHERE feedback_id = $1",
        )
        .bind(feedback.feedback_id)
        .bind(&feedback.content)
        .bind(feedback.rating)
        .bind(feedback.is_deleted)
        .execute(self.pool())
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update feedback: {}", e)))?;

        timer.observe_duration();

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), fields(feedback_id = feedback_id))]
    async fn remove_feedback(&self, feedback_id: i64) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["remove_feedback"])
            .start_timer();

        let result = sqlx::query(
            "UPDATE feedback SET is_deleted = TRUE, updated_at = NOW() WHERE feedback_id = $1",
        )
        .bind(feedback_id)
        .execute(self.pool())
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to remove feedback: {}", e)))?;

        timer.observe_duration();

        if result.rows_affected() > 0 {
            info!(feedback_id = feedback_id, "Feedback soft-deleted");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    #[instrument(skip(self), fields(service_id = service_id))]
    async fn service_rating(&self, service_id: i64) -> Result<ServiceRating, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["service_rating"])
            .start_timer();

        let (rating, review_count): (Option<f64>, i64) = sqlx::query_as(
            "SELECT AVG(rating)::double precision, COUNT(*) \
             FROM feedback WHERE service_id = $1 AND is_deleted = FALSE",
        )
        .bind(service_id)
        .fetch_one(self.pool())
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to compute service rating: {}", e))
        })?;

        timer.observe_duration();

        Ok(ServiceRating {
            rating: rating.unwrap_or(0.0),
            review_count,
        })
    }
}
