//! Tour service gRPC client.

use std::time::Duration;
use tonic::Request;
use tonic::transport::{Channel, Endpoint};

use super::proto::tour::tour_service_client::TourServiceClient;
use super::proto::tour::GetTourByIdRequest;
use super::{TourCatalog, TourServiceInfo};
use crate::error::AppError;
use crate::retry::{RetryPolicy, retry_grpc_call};
use async_trait::async_trait;

/// Configuration for the tour service client.
#[derive(Clone, Debug)]
pub struct TourClientConfig {
    pub endpoint: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub retry_policy: RetryPolicy,
}

impl Default for TourClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:50052".to_string(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
            retry_policy: RetryPolicy::default(),
        }
    }
}

/// Tour catalog client backed by the tour service.
#[derive(Clone)]
pub struct TourCatalogClient {
    client: TourServiceClient<Channel>,
    retry_policy: RetryPolicy,
}

impl TourCatalogClient {
    pub async fn new(config: TourClientConfig) -> Result<Self, tonic::transport::Error> {
        let channel = Endpoint::from_shared(config.endpoint)?
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .connect()
            .await?;

        Ok(Self {
            client: TourServiceClient::new(channel),
            retry_policy: config.retry_policy,
        })
    }

    pub async fn connect(endpoint: &str) -> Result<Self, tonic::transport::Error> {
        Self::new(TourClientConfig {
            endpoint: endpoint.to_string(),
            ..Default::default()
        })
        .await
    }
}

#[async_trait]
impl TourCatalog for TourCatalogClient {
    async fn get_tour_by_id(&self, service_id: i64) -> Result<TourServiceInfo, AppError> {
        let client = self.client.clone();

        let response = retry_grpc_call(&self.retry_policy, "get_tour_by_id", || {
            let mut c = client.clone();
            async move {
                let response = c
                    .get_tour_by_id(Request::new(GetTourByIdRequest { service_id }))
                    .await?;
                Ok(response.into_inner())
            }
        })
        .await
        .map_err(|status| {
            tracing::error!(
                operation = "get_tour_by_id",
                code = ?status.code(),
                message = status.message(),
                "tour service call failed"
            );
            AppError::DependencyError(anyhow::anyhow!("tour service lookup failed"))
        })?;

        Ok(TourServiceInfo {
            service_id: response.service_id,
            service_name: response.service_name,
        })
    }
}
