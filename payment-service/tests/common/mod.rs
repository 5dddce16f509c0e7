//! In-memory test doubles for the store and directory seams.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use secrecy::Secret;

use payment_service::config::{PayosConfig, SmtpConfig};
use payment_service::models::{Feedback, Payment, PlatformFeedback, Revenue};
use payment_service::repository::query::{Page, SearchPagination, SortDirection, SortKey};
use payment_service::repository::{
    month_bounds, FeedbackFilter, FeedbackStore, NewFeedback, NewPayment, NewPlatformFeedback,
    NewRevenue, PaymentFilter, PaymentStore, PlatformFeedbackFilter, PlatformFeedbackStore,
    RevenueFilter, RevenueStore, ServiceRating,
};
use payment_service::services::{
    Enrichment, FeedbackService, Mailer, PaymentService, PayosClient, PlatformFeedbackService,
    RevenueService,
};
use service_core::error::AppError;
use service_core::grpc::{
    CustomerProfile, TourCatalog, TourGuideProfile, TourServiceInfo, UserDirectory,
};

// ---------------------------------------------------------------------------
// Directory stubs
// ---------------------------------------------------------------------------

/// User directory backed by fixed maps; unknown ids fail like the real
/// client does.
#[derive(Default)]
pub struct StubUserDirectory {
    pub customers: HashMap<i64, CustomerProfile>,
    pub tour_guides: HashMap<i64, TourGuideProfile>,
}

impl StubUserDirectory {
    pub fn with_customer(mut self, id: i64, name: &str, email: &str) -> Self {
        self.customers.insert(
            id,
            CustomerProfile {
                customer_id: id,
                full_name: name.to_string(),
                email: email.to_string(),
                avatar_url: format!("https://cdn.example/avatars/{id}.png"),
            },
        );
        self
    }

    pub fn with_tour_guide(mut self, id: i64, name: &str) -> Self {
        self.tour_guides.insert(
            id,
            TourGuideProfile {
                tour_guide_id: id,
                full_name: name.to_string(),
                email: format!("guide{id}@tourmate.local"),
            },
        );
        self
    }
}

#[async_trait]
impl UserDirectory for StubUserDirectory {
    async fn get_customer_by_id(&self, customer_id: i64) -> Result<CustomerProfile, AppError> {
        self.customers
            .get(&customer_id)
            .cloned()
            .ok_or_else(|| AppError::DependencyError(anyhow::anyhow!("user service lookup failed")))
    }

    async fn get_tour_guide_by_id(
        &self,
        tour_guide_id: i64,
    ) -> Result<TourGuideProfile, AppError> {
        self.tour_guides
            .get(&tour_guide_id)
            .cloned()
            .ok_or_else(|| AppError::DependencyError(anyhow::anyhow!("user service lookup failed")))
    }
}

/// Tour catalog stub; an empty map behaves like an outage.
#[derive(Default)]
pub struct StubTourCatalog {
    pub services: HashMap<i64, String>,
}

impl StubTourCatalog {
    pub fn with_service(mut self, id: i64, name: &str) -> Self {
        self.services.insert(id, name.to_string());
        self
    }
}

#[async_trait]
impl TourCatalog for StubTourCatalog {
    async fn get_tour_by_id(&self, service_id: i64) -> Result<TourServiceInfo, AppError> {
        self.services
            .get(&service_id)
            .map(|name| TourServiceInfo {
                service_id,
                service_name: name.clone(),
            })
            .ok_or_else(|| AppError::DependencyError(anyhow::anyhow!("tour service lookup failed")))
    }
}

// ---------------------------------------------------------------------------
// In-memory stores
// ---------------------------------------------------------------------------

fn paginate<T: Clone>(mut rows: Vec<T>, pagination: &SearchPagination) -> Page<T> {
    let total_count = rows.len() as i64;
    let start = pagination.offset().min(total_count) as usize;
    let end = (pagination.offset() + pagination.limit()).min(total_count) as usize;
    rows = rows[start..end].to_vec();
    Page {
        rows,
        total_count,
        page: pagination.page,
        per_page: pagination.per_page,
    }
}

fn apply_direction<T>(rows: &mut [T], direction: SortDirection) {
    if direction == SortDirection::Descending {
        rows.reverse();
    }
}

#[derive(Default)]
pub struct InMemoryFeedbackStore {
    rows: Mutex<Vec<Feedback>>,
    next_id: AtomicI64,
}

impl InMemoryFeedbackStore {
    pub fn seed(&self, feedback: Feedback) {
        self.rows.lock().unwrap().push(feedback);
    }
}

#[async_trait]
impl FeedbackStore for InMemoryFeedbackStore {
    async fn get_feedback(&self, feedback_id: i64) -> Result<Option<Feedback>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|f| f.feedback_id == feedback_id)
            .cloned())
    }

    async fn list_feedbacks(
        &self,
        filter: &FeedbackFilter,
        pagination: &SearchPagination,
    ) -> Result<Page<Feedback>, AppError> {
        let mut rows: Vec<Feedback> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|f| {
                filter.customer_id.map_or(true, |v| f.customer_id == v)
                    && filter.tour_guide_id.map_or(true, |v| f.tour_guide_id == v)
                    && filter.service_id.map_or(true, |v| f.service_id == v)
                    && filter.rating.map_or(true, |v| f.rating == v)
                    && filter.is_deleted.map_or(true, |v| f.is_deleted == v)
                    && pagination.keyword.as_ref().map_or(true, |k| {
                        f.content.to_lowercase().contains(&k.to_lowercase())
                    })
            })
            .cloned()
            .collect();

        match pagination.sort_key {
            SortKey::Rating => rows.sort_by_key(|f| f.rating),
            _ => rows.sort_by_key(|f| f.created_at),
        }
        apply_direction(&mut rows, pagination.direction);

        Ok(paginate(rows, pagination))
    }

    async fn create_feedback(&self, input: &NewFeedback) -> Result<Feedback, AppError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let now = Utc::now();
        let feedback = Feedback {
            feedback_id: id,
            customer_id: input.customer_id,
            tour_guide_id: input.tour_guide_id,
            service_id: input.service_id,
            invoice_id: input.invoice_id,
            content: input.content.clone(),
            rating: input.rating,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().push(feedback.clone());
        Ok(feedback)
    }

    async fn update_feedback(&self, feedback: &Feedback) -> Result<bool, AppError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|f| f.feedback_id == feedback.feedback_id) {
            Some(row) => {
                row.content = feedback.content.clone();
                row.rating = feedback.rating;
                row.is_deleted = feedback.is_deleted;
                row.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove_feedback(&self, feedback_id: i64) -> Result<bool, AppError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|f| f.feedback_id == feedback_id) {
            Some(row) => {
                row.is_deleted = true;
                row.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn service_rating(&self, service_id: i64) -> Result<ServiceRating, AppError> {
        let rows = self.rows.lock().unwrap();
        let ratings: Vec<i32> = rows
            .iter()
            .filter(|f| f.service_id == service_id && !f.is_deleted)
            .map(|f| f.rating)
            .collect();
        let review_count = ratings.len() as i64;
        let rating = if review_count == 0 {
            0.0
        } else {
            ratings.iter().sum::<i32>() as f64 / review_count as f64
        };
        Ok(ServiceRating {
            rating,
            review_count,
        })
    }
}

#[derive(Default)]
pub struct InMemoryPaymentStore {
    rows: Mutex<Vec<Payment>>,
    next_id: AtomicI64,
}

impl InMemoryPaymentStore {
    pub fn seed(&self, payment: Payment) {
        self.rows.lock().unwrap().push(payment);
    }
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn get_payment(&self, payment_id: i64) -> Result<Option<Payment>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.payment_id == payment_id)
            .cloned())
    }

    async fn list_payments(
        &self,
        filter: &PaymentFilter,
        pagination: &SearchPagination,
    ) -> Result<Page<Payment>, AppError> {
        let mut rows: Vec<Payment> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| {
                filter.customer_id.map_or(true, |v| p.customer_id == v)
                    && filter.invoice_id.map_or(true, |v| p.invoice_id == v)
                    && filter.service_id.map_or(true, |v| p.service_id == v)
                    && filter.status.as_ref().map_or(true, |v| &p.status == v)
                    && pagination.keyword.as_ref().map_or(true, |k| {
                        p.payment_method.to_lowercase().contains(&k.to_lowercase())
                    })
            })
            .cloned()
            .collect();

        match pagination.sort_key {
            SortKey::Price => {
                rows.sort_by(|a, b| a.price.partial_cmp(&b.price).unwrap());
            }
            _ => rows.sort_by_key(|p| p.created_at),
        }
        apply_direction(&mut rows, pagination.direction);

        Ok(paginate(rows, pagination))
    }

    async fn create_payment(&self, input: &NewPayment) -> Result<Payment, AppError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let payment = Payment {
            payment_id: id,
            customer_id: input.customer_id,
            invoice_id: input.invoice_id,
            service_id: input.service_id,
            price: input.price,
            status: input.status.clone(),
            payment_method: input.payment_method.clone(),
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(payment.clone());
        Ok(payment)
    }

    async fn update_payment(&self, payment: &Payment) -> Result<bool, AppError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|p| p.payment_id == payment.payment_id) {
            Some(row) => {
                row.payment_method = payment.payment_method.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_payment_status(
        &self,
        payment_id: i64,
        status: &str,
    ) -> Result<bool, AppError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|p| p.payment_id == payment_id) {
            Some(row) => {
                row.status = status.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct InMemoryPlatformFeedbackStore {
    rows: Mutex<Vec<PlatformFeedback>>,
    next_id: AtomicI64,
}

#[async_trait]
impl PlatformFeedbackStore for InMemoryPlatformFeedbackStore {
    async fn get_platform_feedback(
        &self,
        feedback_id: i64,
    ) -> Result<Option<PlatformFeedback>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|f| f.feedback_id == feedback_id)
            .cloned())
    }

    async fn list_platform_feedbacks(
        &self,
        filter: &PlatformFeedbackFilter,
        pagination: &SearchPagination,
    ) -> Result<Page<PlatformFeedback>, AppError> {
        let mut rows: Vec<PlatformFeedback> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|f| {
                filter.customer_id.map_or(true, |v| f.customer_id == v)
                    && filter.payment_id.map_or(true, |v| f.payment_id == v)
                    && filter.rating.map_or(true, |v| f.rating == v)
                    && pagination.keyword.as_ref().map_or(true, |k| {
                        f.content.to_lowercase().contains(&k.to_lowercase())
                    })
            })
            .cloned()
            .collect();

        match pagination.sort_key {
            SortKey::Rating => rows.sort_by_key(|f| f.rating),
            _ => rows.sort_by_key(|f| f.created_at),
        }
        apply_direction(&mut rows, pagination.direction);

        Ok(paginate(rows, pagination))
    }

    async fn create_platform_feedback(
        &self,
        input: &NewPlatformFeedback,
    ) -> Result<PlatformFeedback, AppError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let feedback = PlatformFeedback {
            feedback_id: id,
            customer_id: input.customer_id,
            payment_id: input.payment_id,
            content: input.content.clone(),
            rating: input.rating,
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(feedback.clone());
        Ok(feedback)
    }

    async fn update_platform_feedback(
        &self,
        feedback: &PlatformFeedback,
    ) -> Result<bool, AppError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|f| f.feedback_id == feedback.feedback_id) {
            Some(row) => {
                row.content = feedback.content.clone();
                row.rating = feedback.rating;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct InMemoryRevenueStore {
    rows: Mutex<Vec<Revenue>>,
    next_id: AtomicI64,
}

impl InMemoryRevenueStore {
    /// Insert a fully specified row, e.g. with a chosen created_at.
    pub fn seed(&self, revenue: Revenue) {
        self.rows.lock().unwrap().push(revenue);
    }
}

#[async_trait]
impl RevenueStore for InMemoryRevenueStore {
    async fn get_revenue(&self, revenue_id: i64) -> Result<Option<Revenue>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.revenue_id == revenue_id)
            .cloned())
    }

    async fn list_revenues(
        &self,
        filter: &RevenueFilter,
        pagination: &SearchPagination,
    ) -> Result<Page<Revenue>, AppError> {
        let mut rows: Vec<Revenue> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| {
                filter.tour_guide_id.map_or(true, |v| r.tour_guide_id == v)
                    && filter.invoice_id.map_or(true, |v| r.invoice_id == v)
                    && filter.payment_id.map_or(true, |v| r.payment_id == v)
                    && filter.payment_status.map_or(true, |v| r.payment_status == v)
            })
            .cloned()
            .collect();

        match pagination.sort_key {
            SortKey::Amount => {
                rows.sort_by(|a, b| a.total_amount.partial_cmp(&b.total_amount).unwrap());
            }
            _ => rows.sort_by_key(|r| r.created_at),
        }
        apply_direction(&mut rows, pagination.direction);

        Ok(paginate(rows, pagination))
    }

    async fn create_revenue(&self, input: &NewRevenue) -> Result<Revenue, AppError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let revenue = Revenue {
            revenue_id: id,
            payment_id: input.payment_id,
            tour_guide_id: input.tour_guide_id,
            invoice_id: input.invoice_id,
            total_amount: input.total_amount,
            actual_received: input.actual_received,
            platform_commission: input.platform_commission,
            payment_status: input.payment_status,
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(revenue.clone());
        Ok(revenue)
    }

    async fn update_revenue(&self, revenue: &Revenue) -> Result<bool, AppError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|r| r.revenue_id == revenue.revenue_id) {
            Some(row) => {
                row.total_amount = revenue.total_amount;
                row.actual_received = revenue.actual_received;
                row.platform_commission = revenue.platform_commission;
                row.payment_status = revenue.payment_status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_revenue(&self, revenue_id: i64) -> Result<bool, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.revenue_id != revenue_id);
        Ok(rows.len() < before)
    }

    async fn list_by_month(
        &self,
        tour_guide_id: i64,
        year: i32,
        month: u32,
    ) -> Result<Vec<Revenue>, AppError> {
        let (start, end) = month_bounds(year, month)?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| {
                r.tour_guide_id == tour_guide_id && r.created_at >= start && r.created_at < end
            })
            .cloned()
            .collect())
    }

    async fn total_amount_by_month(
        &self,
        tour_guide_id: i64,
        year: i32,
        month: u32,
    ) -> Result<f64, AppError> {
        let rows = self.list_by_month(tour_guide_id, year, month).await?;
        Ok(rows.iter().map(|r| r.total_amount).sum())
    }
}

// ---------------------------------------------------------------------------
// Service builders
// ---------------------------------------------------------------------------

pub fn directory() -> StubUserDirectory {
    StubUserDirectory::default()
        .with_customer(5, "Alice Nguyen", "alice@example.com")
        .with_tour_guide(9, "Binh Tran")
}

pub fn catalog() -> StubTourCatalog {
    StubTourCatalog::default().with_service(3, "Old Quarter Walking Tour")
}

pub fn enrichment(users: StubUserDirectory, tours: StubTourCatalog) -> Enrichment {
    Enrichment::new(Arc::new(users), Arc::new(tours))
}

pub fn feedback_service(store: Arc<InMemoryFeedbackStore>) -> FeedbackService {
    FeedbackService::new(store, enrichment(directory(), catalog()))
}

pub fn revenue_service(store: Arc<InMemoryRevenueStore>) -> RevenueService {
    RevenueService::new(store, enrichment(directory(), catalog()))
}

pub fn platform_feedback_service(
    store: Arc<InMemoryPlatformFeedbackStore>,
) -> PlatformFeedbackService {
    PlatformFeedbackService::new(store)
}

pub fn payment_service(store: Arc<InMemoryPaymentStore>) -> PaymentService {
    payment_service_with(store, enrichment(directory(), catalog()))
}

pub fn payment_service_with(
    store: Arc<InMemoryPaymentStore>,
    enrichment: Enrichment,
) -> PaymentService {
    // Blank credentials make every checkout fail at the gateway seam.
    let payos = PayosClient::new(PayosConfig {
        client_id: String::new(),
        api_key: Secret::new(String::new()),
        checksum_key: Secret::new(String::new()),
        api_base_url: "http://localhost:0".to_string(),
        return_url: "http://localhost:0/return".to_string(),
        cancel_url: "http://localhost:0/cancel".to_string(),
    });
    let mailer = Mailer::new(&SmtpConfig {
        host: "localhost".to_string(),
        username: String::new(),
        password: Secret::new(String::new()),
        from_address: "no-reply@tourmate.local".to_string(),
        enabled: false,
    })
    .unwrap();

    PaymentService::new(store, enrichment, payos, mailer)
}
