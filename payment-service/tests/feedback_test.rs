//! Feedback lifecycle and listing behavior through the service facade.

mod common;

use std::sync::Arc;

use common::{
    catalog, enrichment, feedback_service, InMemoryFeedbackStore, StubTourCatalog,
    StubUserDirectory,
};
use payment_service::dtos::{CreateFeedbackRequest, FeedbackListQuery, UpdateFeedbackRequest};
use payment_service::services::enrichment::UNKNOWN_CUSTOMER;
use payment_service::services::FeedbackService;
use service_core::error::AppError;

fn create_request() -> CreateFeedbackRequest {
    CreateFeedbackRequest {
        customer_id: 5,
        tour_guide_id: 9,
        service_id: 3,
        invoice_id: 100,
        content: "Great tour".to_string(),
        rating: 5,
    }
}

#[tokio::test]
async fn created_feedback_reads_back_with_same_fields() {
    let service = feedback_service(Arc::new(InMemoryFeedbackStore::default()));

    let created = service.create(create_request()).await.unwrap();
    let fetched = service.get(created.feedback_id).await.unwrap();

    assert_eq!(fetched.customer_id, 5);
    assert_eq!(fetched.tour_guide_id, 9);
    assert_eq!(fetched.service_id, 3);
    assert_eq!(fetched.invoice_id, 100);
    assert_eq!(fetched.content, "Great tour");
    assert_eq!(fetched.rating, 5);
    assert!(!fetched.is_deleted);
    assert_eq!(fetched.customer_name, "Alice Nguyen");
    assert_eq!(fetched.service_name, "Old Quarter Walking Tour");
}

#[tokio::test]
async fn rating_out_of_range_is_rejected() {
    let service = feedback_service(Arc::new(InMemoryFeedbackStore::default()));

    let mut request = create_request();
    request.rating = 6;
    let err = service.create(request).await.unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));

    let mut request = create_request();
    request.rating = 0;
    let err = service.create(request).await.unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}

#[tokio::test]
async fn unknown_customer_cannot_create_feedback() {
    let service = feedback_service(Arc::new(InMemoryFeedbackStore::default()));

    let mut request = create_request();
    request.customer_id = 999;
    let err = service.create(request).await.unwrap_err();
    assert!(matches!(err, AppError::DependencyError(_)));
}

#[tokio::test]
async fn soft_delete_keeps_the_row_readable() {
    let service = feedback_service(Arc::new(InMemoryFeedbackStore::default()));

    let created = service.create(create_request()).await.unwrap();
    service.remove(created.feedback_id).await.unwrap();

    let fetched = service.get(created.feedback_id).await.unwrap();
    assert!(fetched.is_deleted);
    assert!(fetched.updated_at >= created.updated_at);
}

#[tokio::test]
async fn removing_a_missing_feedback_is_not_found() {
    let service = feedback_service(Arc::new(InMemoryFeedbackStore::default()));
    let err = service.remove(42).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn partial_update_leaves_other_fields_unchanged() {
    let service = feedback_service(Arc::new(InMemoryFeedbackStore::default()));
    let created = service.create(create_request()).await.unwrap();

    let updated = service
        .update(
            created.feedback_id,
            UpdateFeedbackRequest {
                rating: Some(3),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.rating, 3);
    assert_eq!(updated.content, "Great tour");
    assert_eq!(updated.customer_id, 5);
    assert!(!updated.is_deleted);
}

#[tokio::test]
async fn list_applies_all_filters_conjunctively() {
    let store = Arc::new(InMemoryFeedbackStore::default());
    let service = feedback_service(store);

    service.create(create_request()).await.unwrap();
    let mut other = create_request();
    other.tour_guide_id = 7;
    other.content = "Mediocre experience".to_string();
    other.rating = 2;
    service.create(other).await.unwrap();

    let page = service
        .list(FeedbackListQuery {
            customer_id: Some(5),
            tour_guide_id: Some(9),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.total_count, 1);
    assert_eq!(page.data[0].tour_guide_id, 9);

    // No filters returns everything.
    let page = service.list(FeedbackListQuery::default()).await.unwrap();
    assert_eq!(page.total_count, 2);

    // Keyword is a case-insensitive substring match on the content.
    let page = service
        .list(FeedbackListQuery {
            keyword: Some("GREAT".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.total_count, 1);
    assert_eq!(page.data[0].content, "Great tour");
}

#[tokio::test]
async fn listing_degrades_to_placeholders_when_directory_is_down() {
    let store = Arc::new(InMemoryFeedbackStore::default());
    // Seeded directory first so the existence check in create passes.
    let healthy = feedback_service(store.clone());
    healthy.create(create_request()).await.unwrap();

    // Empty stubs behave like an outage for every lookup.
    let degraded = FeedbackService::new(
        store,
        enrichment(StubUserDirectory::default(), StubTourCatalog::default()),
    );

    let page = degraded
        .list(FeedbackListQuery::default())
        .await
        .unwrap();
    assert_eq!(page.total_count, 1);
    assert_eq!(page.data[0].customer_name, UNKNOWN_CUSTOMER);
    assert_eq!(page.data[0].service_name, "");
    assert_eq!(page.data[0].content, "Great tour");
}

#[tokio::test]
async fn service_rating_excludes_soft_deleted_rows() {
    let service = feedback_service(Arc::new(InMemoryFeedbackStore::default()));

    let first = service.create(create_request()).await.unwrap();
    let mut second = create_request();
    second.rating = 3;
    service.create(second).await.unwrap();

    let rating = service.service_rating(3).await.unwrap();
    assert_eq!(rating.review_count, 2);
    assert!((rating.rating - 4.0).abs() < 1e-9);

    service.remove(first.feedback_id).await.unwrap();
    let rating = service.service_rating(3).await.unwrap();
    assert_eq!(rating.review_count, 1);
    assert!((rating.rating - 3.0).abs() < 1e-9);
}

#[tokio::test]
async fn listing_can_exclude_soft_deleted_rows() {
    let store = Arc::new(InMemoryFeedbackStore::default());
    let service = FeedbackService::new(
        store,
        enrichment(
            StubUserDirectory::default().with_customer(5, "Alice Nguyen", "alice@example.com"),
            catalog(),
        ),
    );
    service.create(create_request()).await.unwrap();

    let page = service
        .list(FeedbackListQuery {
            is_deleted: Some(false),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.total_count, 1);
    assert!(!page.data[0].is_deleted);
}
