//! gRPC directory clients for service-to-service lookups.

pub mod tour_client;
pub mod user_client;

pub use tour_client::{TourCatalogClient, TourClientConfig};
pub use user_client::{UserDirectoryClient, UserClientConfig};

use crate::error::AppError;
use async_trait::async_trait;

// Include generated proto code
pub mod proto {
    pub mod user {
        tonic::include_proto!("tourmate.user.v1");
    }
    pub mod tour {
        tonic::include_proto!("tourmate.tour.v1");
    }
}

/// Display data for a customer, resolved from the user service.
#[derive(Clone, Debug, PartialEq)]
pub struct CustomerProfile {
    pub customer_id: i64,
    pub full_name: String,
    pub email: String,
    pub avatar_url: String,
}

/// Display data for a tour guide, resolved from the user service.
#[derive(Clone, Debug, PartialEq)]
pub struct TourGuideProfile {
    pub tour_guide_id: i64,
    pub full_name: String,
    pub email: String,
}

/// Display data for a tour service, resolved from the tour service.
#[derive(Clone, Debug, PartialEq)]
pub struct TourServiceInfo {
    pub service_id: i64,
    pub service_name: String,
}

/// Id -> display-data lookups against the user service.
///
/// Transport failures and missing users both surface as
/// `AppError::DependencyError`; callers that can degrade gracefully must
/// treat any error as "enrichment unavailable".
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn get_customer_by_id(&self, customer_id: i64) -> Result<CustomerProfile, AppError>;
    async fn get_tour_guide_by_id(&self, tour_guide_id: i64)
        -> Result<TourGuideProfile, AppError>;
}

/// Id -> display-data lookups against the tour service.
#[async_trait]
pub trait TourCatalog: Send + Sync {
    async fn get_tour_by_id(&self, service_id: i64) -> Result<TourServiceInfo, AppError>;
}
