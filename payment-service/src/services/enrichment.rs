//! Read-model assembly: local rows merged with remote display data.
//!
//! List endpoints degrade gracefully: a failed lookup substitutes a
//! placeholder so one dependency outage cannot take down a listing.
//! Detail endpoints that exist only to carry the enrichment (payment
//! with service name) propagate the error instead.

use std::collections::HashMap;
use std::sync::Arc;

use service_core::error::AppError;
use service_core::grpc::{TourCatalog, UserDirectory};

use crate::dtos::{FeedbackResponse, PaymentWithServiceResponse, RevenueResponse};
use crate::models::{Feedback, Payment, Revenue};
use crate::services::metrics::DIRECTORY_LOOKUP_DURATION;

pub const UNKNOWN_CUSTOMER: &str = "Unknown Customer";
pub const UNKNOWN_TOUR_GUIDE: &str = "Unknown Tour Guide";

#[derive(Clone)]
pub struct Enrichment {
    users: Arc<dyn UserDirectory>,
    tours: Arc<dyn TourCatalog>,
}

impl Enrichment {
    pub fn new(users: Arc<dyn UserDirectory>, tours: Arc<dyn TourCatalog>) -> Self {
        Self { users, tours }
    }

    pub fn users(&self) -> &dyn UserDirectory {
        self.users.as_ref()
    }

    /// Enrich one feedback row, substituting placeholders on failure.
    pub async fn feedback_response(&self, feedback: Feedback) -> FeedbackResponse {
        let (customer_name, customer_avatar) =
            match self.lookup_customer(feedback.customer_id).await {
                Some(profile) => (profile.0, profile.1),
                None => (UNKNOWN_CUSTOMER.to_string(), String::new()),
            };

        let service_name = self
            .lookup_service_name(feedback.service_id)
            .await
            .unwrap_or_default();

        FeedbackResponse {
            feedback_id: feedback.feedback_id,
            customer_id: feedback.customer_id,
            tour_guide_id: feedback.tour_guide_id,
            service_id: feedback.service_id,
            invoice_id: feedback.invoice_id,
            content: feedback.content,
            rating: feedback.rating,
            is_deleted: feedback.is_deleted,
            customer_name,
            customer_avatar,
            service_name,
            created_at: feedback.created_at,
            updated_at: feedback.updated_at,
        }
    }

    /// Enrich a page of feedback rows, deduplicating remote lookups.
    pub async fn feedback_responses(&self, rows: Vec<Feedback>) -> Vec<FeedbackResponse> {
        let mut customers: HashMap<i64, Option<(String, String)>> = HashMap::new();
        let mut services: HashMap<i64, Option<String>> = HashMap::new();
        let mut responses = Vec::with_capacity(rows.len());

        for feedback in rows {
            if !customers.contains_key(&feedback.customer_id) {
                let profile = self.lookup_customer(feedback.customer_id).await;
                customers.insert(feedback.customer_id, profile);
            }
            if !services.contains_key(&feedback.service_id) {
                let name = self.lookup_service_name(feedback.service_id).await;
                services.insert(feedback.service_id, name);
            }

            let (customer_name, customer_avatar) = customers
                .get(&feedback.customer_id)
                .and_then(|p| p.clone())
                .unwrap_or_else(|| (UNKNOWN_CUSTOMER.to_string(), String::new()));
            let service_name = services
                .get(&feedback.service_id)
                .and_then(|n| n.clone())
                .unwrap_or_default();

            responses.push(FeedbackResponse {
                feedback_id: feedback.feedback_id,
                customer_id: feedback.customer_id,
                tour_guide_id: feedback.tour_guide_id,
                service_id: feedback.service_id,
                invoice_id: feedback.invoice_id,
                content: feedback.content,
                rating: feedback.rating,
                is_deleted: feedback.is_deleted,
                customer_name,
                customer_avatar,
                service_name,
                created_at: feedback.created_at,
                updated_at: feedback.updated_at,
            });
        }

        responses
    }

    /// Enrich one revenue row, substituting a placeholder on failure.
    pub async fn revenue_response(&self, revenue: Revenue) -> RevenueResponse {
        let tour_guide_name = self
            .lookup_tour_guide(revenue.tour_guide_id)
            .await
            .unwrap_or_else(|| UNKNOWN_TOUR_GUIDE.to_string());

        RevenueResponse {
            revenue,
            tour_guide_name,
        }
    }

    pub async fn revenue_responses(&self, rows: Vec<Revenue>) -> Vec<RevenueResponse> {
        let mut guides: HashMap<i64, Option<String>> = HashMap::new();
        let mut responses = Vec::with_capacity(rows.len());

        for revenue in rows {
            if !guides.contains_key(&revenue.tour_guide_id) {
                let name = self.lookup_tour_guide(revenue.tour_guide_id).await;
                guides.insert(revenue.tour_guide_id, name);
            }

            let tour_guide_name = guides
                .get(&revenue.tour_guide_id)
                .and_then(|n| n.clone())
                .unwrap_or_else(|| UNKNOWN_TOUR_GUIDE.to_string());

            responses.push(RevenueResponse {
                revenue,
                tour_guide_name,
            });
        }

        responses
    }

    /// Detail read-model; the service name is the point of the response,
    /// so a failed lookup propagates.
    pub async fn payment_with_service(
        &self,
        payment: Payment,
    ) -> Result<PaymentWithServiceResponse, AppError> {
        let timer = DIRECTORY_LOOKUP_DURATION
            .with_label_values(&["tour"])
            .start_timer();
        let info = self.tours.get_tour_by_id(payment.service_id).await;
        timer.observe_duration();

        let info = info?;

        Ok(PaymentWithServiceResponse {
            payment,
            service_name: info.service_name,
        })
    }

    async fn lookup_customer(&self, customer_id: i64) -> Option<(String, String)> {
        let timer = DIRECTORY_LOOKUP_DURATION
            .with_label_values(&["user"])
            .start_timer();
        let result = self.users.get_customer_by_id(customer_id).await;
        timer.observe_duration();

        match result {
            Ok(profile) => Some((profile.full_name, profile.avatar_url)),
            Err(e) => {
                tracing::warn!(
                    customer_id = customer_id,
                    error = %e,
                    "Customer lookup failed, using placeholder"
                );
                None
            }
        }
    }

    async fn lookup_tour_guide(&self, tour_guide_id: i64) -> Option<String> {
        let timer = DIRECTORY_LOOKUP_DURATION
            .with_label_values(&["user"])
            .start_timer();
        let result = self.users.get_tour_guide_by_id(tour_guide_id).await;
        timer.observe_duration();

        match result {
            Ok(profile) => Some(profile.full_name),
            Err(e) => {
                tracing::warn!(
                    tour_guide_id = tour_guide_id,
                    error = %e,
                    "Tour guide lookup failed, using placeholder"
                );
                None
            }
        }
    }

    async fn lookup_service_name(&self, service_id: i64) -> Option<String> {
        let timer = DIRECTORY_LOOKUP_DURATION
            .with_label_values(&["tour"])
            .start_timer();
        let result = self.tours.get_tour_by_id(service_id).await;
        timer.observe_duration();

        match result {
            Ok(info) => Some(info.service_name),
            Err(e) => {
                tracing::warn!(
                    service_id = service_id,
                    error = %e,
                    "Tour service lookup failed, using placeholder"
                );
                None
            }
        }
    }
}
