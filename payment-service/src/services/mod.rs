//! Business services and external collaborators.

pub mod enrichment;
pub mod feedback;
pub mod mailer;
pub mod metrics;
pub mod payment;
pub mod payos;
pub mod platform_feedback;
pub mod revenue;
pub mod revenue_stats;

pub use enrichment::Enrichment;
pub use feedback::FeedbackService;
pub use mailer::Mailer;
pub use metrics::{get_metrics, init_metrics};
pub use payment::PaymentService;
pub use payos::PayosClient;
pub use platform_feedback::PlatformFeedbackService;
pub use revenue::RevenueService;
