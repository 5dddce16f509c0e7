//! Application startup and lifecycle management.
//!
//! Runs the REST surface and the RatingService gRPC server side by side
//! on separate listeners.

use std::sync::Arc;

use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use secrecy::ExposeSecret;
use serde_json::json;
use tokio::net::TcpListener;
use tonic::transport::Server as GrpcServer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use service_core::error::AppError;
use service_core::grpc::{TourCatalogClient, UserDirectoryClient};

use crate::config::Config;
use crate::grpc::proto::rating_service_server::RatingServiceServer;
use crate::grpc::proto::FILE_DESCRIPTOR_SET;
use crate::grpc::RatingGrpcService;
use crate::handlers::{feedbacks, payments, platform_feedbacks, revenues};
use crate::repository::Database;
use crate::services::metrics::record_http_request;
use crate::services::{
    get_metrics, init_metrics, Enrichment, FeedbackService, Mailer, PaymentService,
    PayosClient, PlatformFeedbackService, RevenueService,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Config,
    pub feedbacks: FeedbackService,
    pub payments: PaymentService,
    pub platform_feedbacks: PlatformFeedbackService,
    pub revenues: RevenueService,
}

/// Health check endpoint for liveness probes.
async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "payment-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// Readiness check endpoint; verifies the database connection.
async fn readiness_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    state.db.health_check().await?;
    Ok((StatusCode::OK, Json(json!({ "status": "ready" }))))
}

/// Counts every finished request, and every 5xx separately.
async fn track_metrics(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let response = next.run(request).await;
    record_http_request(&method, response.status());
    response
}

/// Prometheus metrics endpoint.
async fn metrics_endpoint() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        get_metrics(),
    )
}

/// Listener address for the configured bind host.
fn listen_addr(host: &str, port: u16) -> String {
    format!("{host}:{port}")
}

/// Application container for managing server lifecycle.
pub struct Application {
    http_port: u16,
    grpc_port: u16,
    http_listener: TcpListener,
    grpc_listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: Config) -> Result<Self, AppError> {
        init_metrics();

        let db = Database::new(
            config.database.url.expose_secret(),
            config.database.max_connections,
        )
        .await?;
        db.run_migrations().await?;

        let users = UserDirectoryClient::connect(&config.directory.user_service_endpoint)
            .await
            .map_err(|e| {
                tracing::error!(
                    endpoint = %config.directory.user_service_endpoint,
                    error = %e,
                    "Failed to connect to user service"
                );
                AppError::DependencyError(anyhow::anyhow!("user service unavailable"))
            })?;
        let tours = TourCatalogClient::connect(&config.directory.tour_service_endpoint)
            .await
            .map_err(|e| {
                tracing::error!(
                    endpoint = %config.directory.tour_service_endpoint,
                    error = %e,
                    "Failed to connect to tour service"
                );
                AppError::DependencyError(anyhow::anyhow!("tour service unavailable"))
            })?;

        let enrichment = Enrichment::new(Arc::new(users), Arc::new(tours));

        let payos = PayosClient::new(config.payos.clone());
        if payos.is_configured() {
            tracing::info!("PayOS client initialized");
        } else {
            tracing::warn!("PayOS credentials not configured, checkout links will fail");
        }

        let mailer = Mailer::new(&config.smtp).map_err(AppError::ConfigError)?;

        let feedbacks = FeedbackService::new(Arc::new(db.clone()), enrichment.clone());
        let payments = PaymentService::new(
            Arc::new(db.clone()),
            enrichment.clone(),
            payos,
            mailer,
        );
        let platform_feedbacks = PlatformFeedbackService::new(Arc::new(db.clone()));
        let revenues = RevenueService::new(Arc::new(db.clone()), enrichment);

        let state = AppState {
            db,
            config: config.clone(),
            feedbacks,
            payments,
            platform_feedbacks,
            revenues,
        };

        // Bind HTTP listener (port 0 = random port for testing)
        let http_addr = listen_addr(&config.server.host, config.server.port);
        let http_listener = TcpListener::bind(http_addr.as_str()).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", http_addr, e);
            AppError::from(e)
        })?;
        let http_port = http_listener.local_addr()?.port();

        // Bind gRPC listener
        let grpc_addr = listen_addr(&config.server.host, config.server.grpc_port);
        let grpc_listener = TcpListener::bind(grpc_addr.as_str()).await.map_err(|e| {
            tracing::error!("Failed to bind gRPC listener to {}: {}", grpc_addr, e);
            AppError::from(e)
        })?;
        let grpc_port = grpc_listener.local_addr()?.port();

        tracing::info!(
            "Payment service: HTTP on port {}, gRPC on port {}",
            http_port,
            grpc_port
        );

        Ok(Self {
            http_port,
            grpc_port,
            http_listener,
            grpc_listener,
            state,
        })
    }

    pub fn http_port(&self) -> u16 {
        self.http_port
    }

    pub fn grpc_port(&self) -> u16 {
        self.grpc_port
    }

    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Run the application until stopped.
    ///
    /// Starts the REST server and the gRPC server concurrently.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let api = Router::new()
            .route(
                "/feedbacks",
                get(feedbacks::list_feedbacks).post(feedbacks::create_feedback),
            )
            .route(
                "/feedbacks/:id",
                get(feedbacks::get_feedback)
                    .put(feedbacks::update_feedback)
                    .delete(feedbacks::delete_feedback),
            )
            .route(
                "/payments",
                get(payments::list_payments).post(payments::create_payment),
            )
            .route("/payments/checkout", post(payments::checkout))
            .route(
                "/payments/:id",
                get(payments::get_payment).put(payments::update_payment),
            )
            .route("/payments/:id/service", get(payments::get_payment_with_service))
            .route(
                "/payments/:id/callback/success",
                get(payments::success_callback),
            )
            .route(
                "/payments/:id/callback/cancel",
                get(payments::cancel_callback),
            )
            .route(
                "/platform-feedbacks",
                get(platform_feedbacks::list_platform_feedbacks)
                    .post(platform_feedbacks::create_platform_feedback),
            )
            .route(
                "/platform-feedbacks/:id",
                get(platform_feedbacks::get_platform_feedback)
                    .put(platform_feedbacks::update_platform_feedback),
            )
            .route(
                "/revenues",
                get(revenues::list_revenues).post(revenues::create_revenue),
            )
            .route(
                "/revenues/:id",
                get(revenues::get_revenue)
                    .put(revenues::update_revenue)
                    .delete(revenues::delete_revenue),
            )
            .route(
                "/tour-guides/:id/revenue/monthly",
                get(revenues::monthly_revenue),
            )
            .route(
                "/tour-guides/:id/revenue/growth",
                get(revenues::revenue_growth),
            )
            .route("/tour-guides/:id/revenue/stats", get(revenues::revenue_stats));

        let http_router = Router::new()
            .nest("/api/v1", api)
            .route("/health", get(health_check))
            .route("/ready", get(readiness_check))
            .route("/metrics", get(metrics_endpoint))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .layer(middleware::from_fn(track_metrics))
            .with_state(self.state.clone());

        let rating_service = RatingGrpcService::new(self.state.feedbacks.clone());

        // gRPC health service
        let (mut health_reporter, grpc_health_service) = tonic_health::server::health_reporter();
        health_reporter
            .set_serving::<RatingServiceServer<RatingGrpcService>>()
            .await;

        // Reflection service for debugging
        let reflection_service = tonic_reflection::server::Builder::configure()
            .register_encoded_file_descriptor_set(FILE_DESCRIPTOR_SET)
            .build_v1()
            .map_err(|e| {
                std::io::Error::other(format!("Failed to build reflection service: {}", e))
            })?;

        let incoming = tokio_stream::wrappers::TcpListenerStream::new(self.grpc_listener);
        let grpc_server = GrpcServer::builder()
            .add_service(grpc_health_service)
            .add_service(reflection_service)
            .add_service(RatingServiceServer::new(rating_service))
            .serve_with_incoming(incoming);

        tokio::select! {
            result = axum::serve(self.http_listener, http_router) => {
                if let Err(e) = result {
                    tracing::error!("HTTP server error: {}", e);
                    return Err(std::io::Error::other(format!("HTTP server error: {}", e)));
                }
            }
            result = grpc_server => {
                if let Err(e) = result {
                    tracing::error!("gRPC server error: {}", e);
                    return Err(std::io::Error::other(format!("gRPC server error: {}", e)));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn configured_host_is_the_one_bound() {
        let listener = TcpListener::bind(listen_addr("127.0.0.1", 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();
        assert_eq!(addr.ip(), std::net::IpAddr::from([127, 0, 0, 1]));
        assert_ne!(addr.port(), 0);
    }
}
