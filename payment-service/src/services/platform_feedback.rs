//! Platform feedback operations: create, read, list, edit.

use std::sync::Arc;

use service_core::error::AppError;
use tracing::instrument;
use validator::Validate;

use crate::dtos::{
    CreatePlatformFeedbackRequest, PaginatedResponse, PlatformFeedbackListQuery,
    UpdatePlatformFeedbackRequest,
};
use crate::models::PlatformFeedback;
use crate::repository::{
    NewPlatformFeedback, PlatformFeedbackFilter, PlatformFeedbackStore, SearchPagination,
};

#[derive(Clone)]
pub struct PlatformFeedbackService {
    store: Arc<dyn PlatformFeedbackStore>,
}

impl PlatformFeedbackService {
    pub fn new(store: Arc<dyn PlatformFeedbackStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self, request), fields(customer_id = request.customer_id))]
    pub async fn create(
        &self,
        request: CreatePlatformFeedbackRequest,
    ) -> Result<PlatformFeedback, AppError> {
        request.validate()?;

        self.store
            .create_platform_feedback(&NewPlatformFeedback {
                customer_id: request.customer_id,
                payment_id: request.payment_id,
                content: request.content,
                rating: request.rating,
            })
            .await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, feedback_id: i64) -> Result<PlatformFeedback, AppError> {
        self.store
            .get_platform_feedback(feedback_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Platform feedback not found")))
    }

    #[instrument(skip(self, query))]
    pub async fn list(
        &self,
        query: PlatformFeedbackListQuery,
    ) -> Result<PaginatedResponse<PlatformFeedback>, AppError> {
        let pagination = SearchPagination::new(
            query.page,
            query.per_page,
            query.keyword,
            query.sort_by.as_deref(),
            query.order.as_deref(),
        );
        let filter = PlatformFeedbackFilter {
            customer_id: query.customer_id,
            payment_id: query.payment_id,
            rating: query.rating,
        };

        let page = self
            .store
            .list_platform_feedbacks(&filter, &pagination)
            .await?;
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

    /// Partial edit: only supplied fields overwrite the stored row.
    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        feedback_id: i64,
        request: UpdatePlatformFeedbackRequest,
    ) -> Result<PlatformFeedback, AppError> {
        request.validate()?;

        let mut feedback = self.get(feedback_id).await?;

        if let Some(content) = request.content {
            feedback.content = content;
        }
        if let Some(rating) = request.rating {
            feedback.rating = rating;
        }

        let updated = self.store.update_platform_feedback(&feedback).await?;
        if !updated {
            return Err(AppError::NotFound(anyhow::anyhow!(
                "Platform feedback not found"
            )));
        }

        Ok(feedback)
    }
}
