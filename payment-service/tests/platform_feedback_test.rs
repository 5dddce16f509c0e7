//! Platform feedback create/read/update behavior.

mod common;

use std::sync::Arc;

use common::{platform_feedback_service, InMemoryPlatformFeedbackStore};
use payment_service::dtos::{
    CreatePlatformFeedbackRequest, PlatformFeedbackListQuery, UpdatePlatformFeedbackRequest,
};
use service_core::error::AppError;

fn create_request() -> CreatePlatformFeedbackRequest {
    CreatePlatformFeedbackRequest {
        customer_id: 5,
        payment_id: 17,
        content: "Smooth booking flow".to_string(),
        rating: 4,
    }
}

#[tokio::test]
async fn created_platform_feedback_reads_back() {
    let service = platform_feedback_service(Arc::new(InMemoryPlatformFeedbackStore::default()));

    let created = service.create(create_request()).await.unwrap();
    let fetched = service.get(created.feedback_id).await.unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.payment_id, 17);
}

#[tokio::test]
async fn rating_out_of_range_is_rejected() {
    let service = platform_feedback_service(Arc::new(InMemoryPlatformFeedbackStore::default()));

    let mut request = create_request();
    request.rating = 0;
    let err = service.create(request).await.unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}

#[tokio::test]
async fn partial_update_keeps_the_content() {
    let service = platform_feedback_service(Arc::new(InMemoryPlatformFeedbackStore::default()));
    let created = service.create(create_request()).await.unwrap();

    let updated = service
        .update(
            created.feedback_id,
            UpdatePlatformFeedbackRequest {
                rating: Some(2),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.rating, 2);
    assert_eq!(updated.content, "Smooth booking flow");
}

#[tokio::test]
async fn update_of_missing_row_is_not_found() {
    let service = platform_feedback_service(Arc::new(InMemoryPlatformFeedbackStore::default()));

    let err = service
        .update(
            99,
            UpdatePlatformFeedbackRequest {
                rating: Some(2),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn list_filters_by_payment() {
    let service = platform_feedback_service(Arc::new(InMemoryPlatformFeedbackStore::default()));

    service.create(create_request()).await.unwrap();
    let mut other = create_request();
    other.payment_id = 18;
    service.create(other).await.unwrap();

    let page = service
        .list(PlatformFeedbackListQuery {
            payment_id: Some(18),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.total_count, 1);
    assert_eq!(page.data[0].payment_id, 18);
}
