//! Relational record stores and the shared query primitives.

pub mod database;
pub mod feedback_store;
pub mod payment_store;
pub mod platform_feedback_store;
pub mod query;
pub mod revenue_store;

pub use database::Database;
pub use feedback_store::{FeedbackFilter, FeedbackStore, NewFeedback, ServiceRating};
pub use payment_store::{NewPayment, PaymentFilter, PaymentStore};
pub use platform_feedback_store::{
    NewPlatformFeedback, PlatformFeedbackFilter, PlatformFeedbackStore,
};
pub use query::{Page, SearchPagination, SortDirection, SortKey};
pub use revenue_store::{month_bounds, NewRevenue, RevenueFilter, RevenueStore};
