//! Platform feedback record store.

use async_trait::async_trait;
use service_core::error::AppError;
use tracing::{info, instrument};

use super::database::Database;
use super::query::{Page, SearchPagination, SortColumns};
use crate::models::PlatformFeedback;
use crate::services::metrics::DB_QUERY_DURATION;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlatformFeedbackFilter {
    pub customer_id: Option<i64>,
    pub payment_id: Option<i64>,
    pub rating: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct NewPlatformFeedback {
    pub customer_id: i64,
    pub payment_id: i64,
    pub content: String,
    pub rating: i32,
}

/// Create/read/update only; platform feedback is never deleted.
#[async_trait]
pub trait PlatformFeedbackStore: Send + Sync {
    async fn get_platform_feedback(
        &self,
        feedback_id: i64,
    ) -> Result<Option<PlatformFeedback>, AppError>;
    async fn list_platform_feedbacks(
        &self,
        filter: &PlatformFeedbackFilter,
        pagination: &SearchPagination,
    ) -> Result<Page<PlatformFeedback>, AppError>;
    async fn create_platform_feedback(
        &self,
        input: &NewPlatformFeedback,
    ) -> Result<PlatformFeedback, AppError>;
    async fn update_platform_feedback(
        &self,
        feedback: &PlatformFeedback,
    ) -> Result<bool, AppError>;
}

const PLATFORM_FEEDBACK_COLUMNS: &str =
    "feedback_id, customer_id, payment_id, content, rating, created_at";

const PLATFORM_FEEDBACK_SORT_COLUMNS: SortColumns = SortColumns {
    date: "created_at",
    price: None,
    rating: Some("rating"),
    amount: None,
};

const PLATFORM_FEEDBACK_PREDICATE: &str = r#"
    ($1::bigint IS NULL OR customer_id = $1)
    AND ($2::bigint IS NULL OR payment_id = $2)
    AND ($3::int IS NULL OR rating = $3)
    AND ($4::text IS NULL OR content ILIKE '%' || $4 || '%')
"#;

#[async_trait]
impl PlatformFeedbackStore for Database {
    #[instrument(skip(self), fields(feedback_id = feedback_id))]
    async fn get_platform_feedback(
        &self,
        feedback_id: i64,
    ) -> Result<Option<PlatformFeedback>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_platform_feedback"])
            .start_timer();

        let feedback = sqlx::query_as::<_, PlatformFeedback>(&format!(
            "SELECT {PLATFORM_FEEDBACK_COLUMNS} FROM platform_feedback WHERE feedback_id = $1"
        ))
        .bind(feedback_id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to get platform feedback: {}", e))
        })?;

        timer.observe_duration();

        Ok(feedback)
    }

    #[instrument(skip(self, filter, pagination))]
    async fn list_platform_feedbacks(
        &self,
        filter: &PlatformFeedbackFilter,
        pagination: &SearchPagination,
    ) -> Result<Page<PlatformFeedback>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_platform_feedbacks"])
            .start_timer();

        let total_count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM platform_feedback WHERE {PLATFORM_FEEDBACK_PREDICATE}"
        ))
        .bind(filter.customer_id)
        .bind(filter.payment_id)
        .bind(filter.rating)
        .bind(pagination.keyword.as_deref())
        .fetch_one(self.pool())
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to count platform feedback: {}", e))
        })?;

        let rows = sqlx::query_as::<_, PlatformFeedback>(&format!(
            "SELECT {PLATFORM_FEEDBACK_COLUMNS} FROM platform_feedback \
             WHERE {PLATFORM_FEEDBACK_PREDICATE} ORDER BY {} LIMIT $5 OFFSET $6",
            pagination.order_by(PLATFORM_FEEDBACK_SORT_COLUMNS)
        ))
        .bind(filter.customer_id)
        .bind(filter.payment_id)
        .bind(filter.rating)
        .bind(pagination.keyword.as_deref())
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(self.pool())
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list platform feedback: {}", e))
        })?;

        timer.observe_duration();

        Ok(Page {
            rows,
            total_count,
            page: pagination.page,
            per_page: pagination.per_page,
        })
    }

    #[instrument(skip(self, input), fields(customer_id = input.customer_id))]
    async fn create_platform_feedback(
        &self,
        input: &NewPlatformFeedback,
    ) -> Result<PlatformFeedback, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_platform_feedback"])
            .start_timer();

        let feedback = sqlx::query_as::<_, PlatformFeedback>(&format!(
            "INSERT INTO platform_feedback (customer_id, payment_id, content, rating) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {PLATFORM_FEEDBACK_COLUMNS}"
        ))
        .bind(input.customer_id)
        .bind(input.payment_id)
        .bind(&input.content)
        .bind(input.rating)
        .fetch_one(self.pool())
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to create platform feedback: {}", e))
        })?;

        timer.observe_duration();

        info!(feedback_id = feedback.feedback_id, "Platform feedback created");

        Ok(feedback)
    }

    #[instrument(skip(self, feedback), fields(feedback_id = feedback.feedback_id))]
    async fn update_platform_feedback(
        &self,
        feedback: &PlatformFeedback,
    ) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_platform_feedback"])
            .start_timer();

        let result = sqlx::query(
            "UPDATE platform_feedback SET content = $2, rating = $3 WHERE feedback_id = $1",
        )
        .bind(feedback.feedback_id)
        .bind(&feedback.content)
        .bind(feedback.rating)
        .execute(self.pool())
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to update platform feedback: {}", e))
        })?;

        timer.observe_duration();

        Ok(result.rows_affected() > 0)
    }
}
