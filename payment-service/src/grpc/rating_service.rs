//! gRPC implementation of RatingService.

use tonic::{Request, Response, Status};
use tracing::instrument;

use crate::grpc::proto::rating_service_server::RatingService;
use crate::grpc::proto::{GetTourServiceRatingRequest, TourServiceRatingResponse};
use crate::services::FeedbackService;

pub struct RatingGrpcService {
    feedbacks: FeedbackService,
}

impl RatingGrpcService {
    pub fn new(feedbacks: FeedbackService) -> Self {
        Self { feedbacks }
    }
}

#[tonic::async_trait]
impl RatingService for RatingGrpcService {
    /// Average rating and review count for one tour service, excluding
    /// soft-deleted feedback.
    #[instrument(skip(self, request))]
    async fn get_tour_service_rating(
        &self,
        request: Request<GetTourServiceRatingRequest>,
    ) -> Result<Response<TourServiceRatingResponse>, Status> {
        let service_id = request.into_inner().service_id;
        if service_id <= 0 {
            return Err(Status::invalid_argument("service_id must be positive"));
        }

        let rating = self
            .feedbacks
            .service_rating(service_id)
            .await
            .map_err(|e| {
                tracing::error!(service_id = service_id, error = %e, "Rating lookup failed");
                Status::internal("failed to compute service rating")
            })?;

        Ok(Response::new(TourServiceRatingResponse {
            rating: rating.rating,
            review_count: rating.review_count as i32,
        }))
    }
}
