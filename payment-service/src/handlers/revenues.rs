//! REST handlers for revenue records and monthly statistics.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use service_core::error::AppError;

use crate::dtos::{CreateRevenueRequest, MonthQuery, RevenueListQuery, UpdateRevenueRequest};
use crate::startup::AppState;

pub async fn create_revenue(
    State(state): State<AppState>,
    Json(request): Json<CreateRevenueRequest>,
) -> Result<impl IntoResponse, AppError> {
    let revenue = state.revenues.create(request).await?;
    Ok((StatusCode::CREATED, Json(revenue)))
}

pub async fn get_revenue(
    State(state): State<AppState>,
    Path(revenue_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let revenue = state.revenues.get(revenue_id).await?;
    Ok(Json(revenue))
}

pub async fn list_revenues(
    State(state): State<AppState>,
    Query(query): Query<RevenueListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = state.revenues.list(query).await?;
    Ok(Json(page))
}

pub async fn update_revenue(
    State(state): State<AppState>,
    Path(revenue_id): Path<i64>,
    Json(request): Json<UpdateRevenueRequest>,
) -> Result<impl IntoResponse, AppError> {
    let revenue = state.revenues.update(revenue_id, request).await?;
    Ok(Json(revenue))
}

pub async fn delete_revenue(
    State(state): State<AppState>,
    Path(revenue_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    state.revenues.remove(revenue_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn monthly_revenue(
    State(state): State<AppState>,
    Path(tour_guide_id): Path<i64>,
    Query(query): Query<MonthQuery>,
) -> Result<impl IntoResponse, AppError> {
    let stats = state.revenues.monthly_stats(tour_guide_id, query).await?;
    Ok(Json(stats))
}

pub async fn revenue_growth(
    State(state): State<AppState>,
    Path(tour_guide_id): Path<i64>,
    Query(query): Query<MonthQuery>,
) -> Result<impl IntoResponse, AppError> {
    let growth = state.revenues.growth(tour_guide_id, query).await?;
    Ok(Json(growth))
}

pub async fn revenue_stats(
    State(state): State<AppState>,
    Path(tour_guide_id): Path<i64>,
    Query(query): Query<MonthQuery>,
) -> Result<impl IntoResponse, AppError> {
    let stats = state.revenues.stats_with_list(tour_guide_id, query).await?;
    Ok(Json(stats))
}
