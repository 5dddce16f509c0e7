use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Lifecycle states of a payment row.
pub mod payment_status {
    pub const PENDING: &str = "pending";
    pub const PAID: &str = "paid";
    pub const CANCELLED: &str = "cancelled";
}

/// Review a customer left for a tour guide after a booked tour.
#[derive(Debug, Serialize, Deserialize, Clone, FromRow, PartialEq)]
pub struct Feedback {
    pub feedback_id: i64,
    pub customer_id: i64,
    pub tour_guide_id: i64,
    pub service_id: i64,
    pub invoice_id: i64,
    pub content: String,
    pub rating: i32,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, FromRow, PartialEq)]
pub struct Payment {
    pub payment_id: i64,
    pub customer_id: i64,
    pub invoice_id: i64,
    pub service_id: i64,
    pub price: f64,
    pub status: String,
    pub payment_method: String,
    pub created_at: DateTime<Utc>,
}

/// Review a customer left about the platform itself, tied to a payment.
#[derive(Debug, Serialize, Deserialize, Clone, FromRow, PartialEq)]
pub struct PlatformFeedback {
    pub feedback_id: i64,
    pub customer_id: i64,
    pub payment_id: i64,
    pub content: String,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
}

/// Per-payment earnings split between a tour guide and the platform.
#[derive(Debug, Serialize, Deserialize, Clone, FromRow, PartialEq)]
pub struct Revenue {
    pub revenue_id: i64,
    pub payment_id: i64,
    pub tour_guide_id: i64,
    pub invoice_id: i64,
    pub total_amount: f64,
    pub actual_received: f64,
    pub platform_commission: f64,
    pub payment_status: bool,
    pub created_at: DateTime<Utc>,
}
