//! REST handlers for payments, checkout and gateway callbacks.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use service_core::error::AppError;

use crate::dtos::{CheckoutRequest, CreatePaymentRequest, PaymentListQuery, UpdatePaymentRequest};
use crate::startup::AppState;

pub async fn create_payment(
    State(state): State<AppState>,
    Json(request): Json<CreatePaymentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let payment = state.payments.create(request).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

pub async fn checkout(
    State(state): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> Result<impl IntoResponse, AppError> {
    let response = state.payments.checkout(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn get_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let payment = state.payments.get(payment_id).await?;
    Ok(Json(payment))
}

pub async fn get_payment_with_service(
    State(state): State<AppState>,
    Path(payment_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let payment = state.payments.get_with_service(payment_id).await?;
    Ok(Json(payment))
}

pub async fn update_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<i64>,
    Json(request): Json<UpdatePaymentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let payment = state.payments.update(payment_id, request).await?;
    Ok(Json(payment))
}

pub async fn list_payments(
    State(state): State<AppState>,
    Query(query): Query<PaymentListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = state.payments.list(query).await?;
    Ok(Json(page))
}

/// Gateway redirect after a completed checkout.
pub async fn success_callback(
    State(state): State<AppState>,
    Path(payment_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let payment = state.payments.confirm(payment_id).await?;
    Ok(Json(payment))
}

/// Gateway redirect after an abandoned checkout.
pub async fn cancel_callback(
    State(state): State<AppState>,
    Path(payment_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let payment = state.payments.cancel(payment_id).await?;
    Ok(Json(payment))
}
