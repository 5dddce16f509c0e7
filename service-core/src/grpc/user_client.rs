//! User service gRPC client.

use std::time::Duration;
use tonic::Request;
use tonic::transport::{Channel, Endpoint};

use super::proto::user::user_service_client::UserServiceClient;
use super::proto::user::{GetCustomerByIdRequest, GetTourGuideByIdRequest};
use super::{CustomerProfile, TourGuideProfile, UserDirectory};
use crate::error::AppError;
use crate::retry::{RetryPolicy, retry_grpc_call};
use async_trait::async_trait;

/// Configuration for the user service client.
#[derive(Clone, Debug)]
pub struct UserClientConfig {
    /// The gRPC endpoint of the user service.
    pub endpoint: String,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Per-request deadline.
    pub request_timeout: Duration,
    /// Retry policy for transient failures.
    pub retry_policy: RetryPolicy,
}

impl Default for UserClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:50051".to_string(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
            retry_policy: RetryPolicy::default(),
        }
    }
}

/// User directory client backed by the user service.
#[derive(Clone)]
pub struct UserDirectoryClient {
    client: UserServiceClient<Channel>,
    retry_policy: RetryPolicy,
}

impl UserDirectoryClient {
    /// Create a new client with the given configuration.
    pub async fn new(config: UserClientConfig) -> Result<Self, tonic::transport::Error> {
        let channel = Endpoint::from_shared(config.endpoint)?
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .connect()
            .await?;

        Ok(Self {
            client: UserServiceClient::new(channel),
            retry_policy: config.retry_policy,
        })
    }

    /// Connect to the specified endpoint with default settings.
    pub async fn connect(endpoint: &str) -> Result<Self, tonic::transport::Error> {
        Self::new(UserClientConfig {
            endpoint: endpoint.to_string(),
            ..Default::default()
        })
        .await
    }

    fn dependency_error(operation: &str, status: tonic::Status) -> AppError {
        tracing::error!(
            operation = operation,
            code = ?status.code(),
            message = status.message(),
            "user service call failed"
        );
        AppError::DependencyError(anyhow::anyhow!("user service lookup failed"))
    }
}

#[async_trait]
impl UserDirectory for UserDirectoryClient {
    async fn get_customer_by_id(&self, customer_id: i64) -> Result<CustomerProfile, AppError> {
        let client = self.client.clone();

        let response = retry_grpc_call(&self.retry_policy, "get_customer_by_id", || {
            let mut c = client.clone();
            async move {
                let response = c
                    .get_customer_by_id(Request::new(GetCustomerByIdRequest { customer_id }))
                    .await?;
                Ok(response.into_inner())
            }
        })
        .await
        .map_err(|status| Self::dependency_error("get_customer_by_id", status))?;

        Ok(CustomerProfile {
            customer_id: response.customer_id,
            full_name: response.full_name,
            email: response.email,
            avatar_url: response.avatar_url,
        })
    }

    async fn get_tour_guide_by_id(
        &self,
        tour_guide_id: i64,
    ) -> Result<TourGuideProfile, AppError> {
        let client = self.client.clone();

        let response = retry_grpc_call(&self.retry_policy, "get_tour_guide_by_id", || {
            let mut c = client.clone();
            async move {
                let response = c
                    .get_tour_guide_by_id(Request::new(GetTourGuideByIdRequest { tour_guide_id }))
                    .await?;
                Ok(response.into_inner())
            }
        })
        .await
        .map_err(|status| Self::dependency_error("get_tour_guide_by_id", status))?;

        Ok(TourGuideProfile {
            tour_guide_id: response.tour_guide_id,
            full_name: response.full_name,
            email: response.email,
        })
    }
}
