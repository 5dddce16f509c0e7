//! REST handlers for platform feedback.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use service_core::error::AppError;

use crate::dtos::{
    CreatePlatformFeedbackRequest, PlatformFeedbackListQuery, UpdatePlatformFeedbackRequest,
};
use crate::startup::AppState;

pub async fn create_platform_feedback(
    State(state): State<AppState>,
    Json(request): Json<CreatePlatformFeedbackRequest>,
) -> Result<impl IntoResponse, AppError> {
    let feedback = state.platform_feedbacks.create(request).await?;
    Ok((StatusCode::CREATED, Json(feedback)))
}

pub async fn get_platform_feedback(
    State(state): State<AppState>,
    Path(feedback_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let feedback = state.platform_feedbacks.get(feedback_id).await?;
    Ok(Json(feedback))
}

pub async fn list_platform_feedbacks(
    State(state): State<AppState>,
    Query(query): Query<PlatformFeedbackListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = state.platform_feedbacks.list(query).await?;
    Ok(Json(page))
}

pub async fn update_platform_feedback(
    State(state): State<AppState>,
    Path(feedback_id): Path<i64>,
    Json(request): Json<UpdatePlatformFeedbackRequest>,
) -> Result<impl IntoResponse, AppError> {
    let feedback = state.platform_feedbacks.update(feedback_id, request).await?;
    Ok(Json(feedback))
}
