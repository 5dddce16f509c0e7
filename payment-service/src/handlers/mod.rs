//! REST handlers.

pub mod feedbacks;
pub mod payments;
pub mod platform_feedbacks;
pub mod revenues;
