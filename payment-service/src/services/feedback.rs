//! Feedback operations: create, read, list, edit, soft delete.

use std::sync::Arc;

use service_core::error::AppError;
use tracing::instrument;
use validator::Validate;

use crate::dtos::{
    CreateFeedbackRequest, FeedbackListQuery, FeedbackResponse, PaginatedResponse,
    UpdateFeedbackRequest,
};
use crate::models::Feedback;
use crate::repository::{FeedbackFilter, FeedbackStore, NewFeedback, SearchPagination, ServiceRating};
use crate::services::enrichment::Enrichment;

#[derive(Clone)]
pub struct FeedbackService {
    store: Arc<dyn FeedbackStore>,
    enrichment: Enrichment,
}

impl FeedbackService {
    pub fn new(store: Arc<dyn FeedbackStore>, enrichment: Enrichment) -> Self {
        Self { store, enrichment }
    }

    /// Create a feedback row after confirming the customer exists.
    #[instrument(skip(self, request), fields(customer_id = request.customer_id))]
    pub async fn create(&self, request: CreateFeedbackRequest) -> Result<Feedback, AppError> {
        request.validate()?;

        // The submitting customer must resolve in the user directory.
        self.enrichment
            .users()
            .get_customer_by_id(request.customer_id)
            .await?;

        self.store
            .create_feedback(&NewFeedback {
                customer_id: request.customer_id,
                tour_guide_id: request.tour_guide_id,
                service_id: request.service_id,
                invoice_id: request.invoice_id,
                content: request.content,
                rating: request.rating,
            })
            .await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, feedback_id: i64) -> Result<FeedbackResponse, AppError> {
        let feedback = self
            .store
            .get_feedback(feedback_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Feedback not found")))?;

        Ok(self.enrichment.feedback_response(feedback).await)
    }

    #[instrument(skip(self, query))]
    pub async fn list(
        &self,
        query: FeedbackListQuery,
    ) -> Result<PaginatedResponse<FeedbackResponse>, AppError> {
        let pagination = SearchPagination::new(
            query.page,
            query.per_page,
            query.keyword,
            query.sort_by.as_deref(),
            query.order.as_deref(),
        );
        let filter = FeedbackFilter {
            customer_id: query.customer_id,
            tour_guide_id: query.tour_guide_id,
            service_id: query.service_id,
            rating: query.rating,
            is_deleted: query.is_deleted,
        };

        let page = self.store.list_feedbacks(&filter, &pagination).await?;
        let total_pages = page.total_pages();
        let has_next = page.has_next();
        let has_previous = page.has_previous();
        let data = self.enrichment.feedback_responses(page.rows).await;

        Ok(PaginatedResponse {
            data,
            total_count: page.total_count,
            page: page.page,
            per_page: page.per_page,
            total_pages,
            has_next,
            has_previous,
        })
    }

    /// Partial edit: only supplied fields overwrite the stored row.
    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        feedback_id: i64,
        request: UpdateFeedbackRequest,
    ) -> Result<Feedback, AppError> {
        request.validate()?;

        let mut feedback = self
            .store
            .get_feedback(feedback_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Feedback not found")))?;

        if let Some(content) = request.content {
            feedback.content = content;
        }
        if let Some(rating) = request.rating {
            feedback.rating = rating;
        }

        let updated = self.store.update_feedback(&feedback).await?;
        if !updated {
            return Err(AppError::NotFound(anyhow::anyhow!("Feedback not found")));
        }

        // Re-read for the store-assigned updated_at.
        self.store
            .get_feedback(feedback_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Feedback not found")))
    }

    /// Soft delete; the row stays readable with `is_deleted = true`.
    #[instrument(skip(self))]
    pub async fn remove(&self, feedback_id: i64) -> Result<(), AppError> {
        let removed = self.store.remove_feedback(feedback_id).await?;
        if !removed {
            return Err(AppError::NotFound(anyhow::anyhow!("Feedback not found")));
        }
        Ok(())
    }

    /// Average rating and review count for one tour service.
    #[instrument(skip(self))]
    pub async fn service_rating(&self, service_id: i64) -> Result<ServiceRating, AppError> {
        self.store.service_rating(service_id).await
    }
}
