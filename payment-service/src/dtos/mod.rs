//! Request and response shapes for the REST surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Payment, Revenue};

/// Envelope for every paginated list response.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total_count: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

// ---------------------------------------------------------------------------
// Feedback
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreateFeedbackRequest {
    #[validate(range(min = 1))]
    pub customer_id: i64,
    #[validate(range(min = 1))]
    pub tour_guide_id: i64,
    #[validate(range(min = 1))]
    pub service_id: i64,
    #[validate(range(min = 1))]
    pub invoice_id: i64,
    #[validate(length(min = 1))]
    pub content: String,
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
}

/// Only the supplied fields overwrite the stored row.
#[derive(Debug, Deserialize, Validate, Default)]
pub struct UpdateFeedbackRequest {
    #[validate(length(min = 1))]
    pub content: Option<String>,
    #[validate(range(min = 1, max = 5))]
    pub rating: Option<i32>,
}

#[derive(Debug, Deserialize, Default)]
pub struct FeedbackListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub keyword: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub customer_id: Option<i64>,
    pub tour_guide_id: Option<i64>,
    pub service_id: Option<i64>,
    pub rating: Option<i32>,
    pub is_deleted: Option<bool>,
}

/// Feedback row merged with display data from the user and tour services.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FeedbackResponse {
    pub feedback_id: i64,
    pub customer_id: i64,
    pub tour_guide_id: i64,
    pub service_id: i64,
    pub invoice_id: i64,
    pub content: String,
    pub rating: i32,
    pub is_deleted: bool,
    pub customer_name: String,
    pub customer_avatar: String,
    pub service_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Payment
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePaymentRequest {
    #[validate(range(min = 1))]
    pub customer_id: i64,
    #[validate(range(min = 1))]
    pub invoice_id: i64,
    #[validate(range(min = 1))]
    pub service_id: i64,
    #[validate(range(min = 0.01))]
    pub price: f64,
    #[validate(length(min = 1))]
    pub payment_method: String,
}

/// Only the payment method can change after creation; amounts and
/// status are owned by the gateway flow.
#[derive(Debug, Deserialize, Validate, Default)]
pub struct UpdatePaymentRequest {
    #[validate(length(min = 1))]
    pub payment_method: Option<String>,
}

/// Payment creation that also asks the gateway for a hosted checkout link.
#[derive(Debug, Deserialize, Validate)]
pub struct CheckoutRequest {
    #[validate(range(min = 1))]
    pub customer_id: i64,
    #[validate(range(min = 1))]
    pub invoice_id: i64,
    #[validate(range(min = 1))]
    pub service_id: i64,
    #[validate(range(min = 0.01))]
    pub price: f64,
    #[validate(length(min = 1))]
    pub payment_method: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CheckoutResponse {
    pub payment: Payment,
    pub checkout_url: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct PaymentListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub keyword: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub customer_id: Option<i64>,
    pub invoice_id: Option<i64>,
    pub service_id: Option<i64>,
    pub status: Option<String>,
}

/// Single-payment detail with the tour service name resolved remotely.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PaymentWithServiceResponse {
    #[serde(flatten)]
    pub payment: Payment,
    pub service_name: String,
}

// ---------------------------------------------------------------------------
// Platform feedback
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePlatformFeedbackRequest {
    #[validate(range(min = 1))]
    pub customer_id: i64,
    #[validate(range(min = 1))]
    pub payment_id: i64,
    #[validate(length(min = 1))]
    pub content: String,
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
}

#[derive(Debug, Deserialize, Validate, Default)]
pub struct UpdatePlatformFeedbackRequest {
    #[validate(length(min = 1))]
    pub content: Option<String>,
    #[validate(range(min = 1, max = 5))]
    pub rating: Option<i32>,
}

#[derive(Debug, Deserialize, Default)]
pub struct PlatformFeedbackListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub keyword: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub customer_id: Option<i64>,
    pub payment_id: Option<i64>,
    pub rating: Option<i32>,
}

// ---------------------------------------------------------------------------
// Revenue
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreateRevenueRequest {
    #[validate(range(min = 1))]
    pub payment_id: i64,
    #[validate(range(min = 1))]
    pub tour_guide_id: i64,
    #[validate(range(min = 1))]
    pub invoice_id: i64,
    #[validate(range(min = 0.01))]
    pub total_amount: f64,
    #[validate(range(min = 0.0))]
    pub platform_commission: f64,
    pub payment_status: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, Default)]
pub struct UpdateRevenueRequest {
    #[validate(range(min = 0.01))]
    pub total_amount: Option<f64>,
    #[validate(range(min = 0.0))]
    pub actual_received: Option<f64>,
    #[validate(range(min = 0.0))]
    pub platform_commission: Option<f64>,
    pub payment_status: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
pub struct RevenueListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub tour_guide_id: Option<i64>,
    pub invoice_id: Option<i64>,
    pub payment_id: Option<i64>,
    pub payment_status: Option<bool>,
}

/// Revenue row with the tour guide's display name resolved remotely.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RevenueResponse {
    #[serde(flatten)]
    pub revenue: Revenue,
    pub tour_guide_name: String,
}

/// Query for the monthly revenue endpoints.
#[derive(Debug, Deserialize, Validate)]
pub struct MonthQuery {
    #[validate(range(min = 2021))]
    pub year: i32,
    #[validate(range(min = 1, max = 12))]
    pub month: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RevenueStatsResponse {
    pub total_revenue: f64,
    pub platform_fee: f64,
    pub net_revenue: f64,
    pub completed_count: i64,
    pub pending_count: i64,
    pub record_count: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RevenueGrowthResponse {
    pub current_total: f64,
    pub previous_total: f64,
    pub growth_percentage: f64,
}

/// Monthly totals, growth and the enriched row list in one response.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RevenueStatsWithListResponse {
    pub stats: RevenueStatsResponse,
    pub growth_percentage: f64,
    pub items: Vec<RevenueResponse>,
}
