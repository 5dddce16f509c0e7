//! REST handlers for tour-guide feedback.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use service_core::error::AppError;

use crate::dtos::{CreateFeedbackRequest, FeedbackListQuery, UpdateFeedbackRequest};
use crate::startup::AppState;

pub async fn create_feedback(
    State(state): State<AppState>,
    Json(request): Json<CreateFeedbackRequest>,
) -> Result<impl IntoResponse, AppError> {
    let feedback = state.feedbacks.create(request).await?;
    Ok((StatusCode::CREATED, Json(feedback)))
}

pub async fn get_feedback(
    State(state): State<AppState>,
    Path(feedback_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let feedback = state.feedbacks.get(feedback_id).await?;
    Ok(Json(feedback))
}

pub async fn list_feedbacks(
    State(state): State<AppState>,
    Query(query): Query<FeedbackListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = state.feedbacks.list(query).await?;
    Ok(Json(page))
}

pub async fn update_feedback(
    State(state): State<AppState>,
    Path(feedback_id): Path<i64>,
    Json(request): Json<UpdateFeedbackRequest>,
) -> Result<impl IntoResponse, AppError> {
    let feedback = state.feedbacks.update(feedback_id, request).await?;
    Ok(Json(feedback))
}

pub async fn delete_feedback(
    State(state): State<AppState>,
    Path(feedback_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    state.feedbacks.remove(feedback_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
