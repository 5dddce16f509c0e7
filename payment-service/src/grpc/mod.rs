//! gRPC surface of the payment service.

pub mod rating_service;

pub use rating_service::RatingGrpcService;

pub mod proto {
    tonic::include_proto!("tourmate.rating.v1");

    pub const FILE_DESCRIPTOR_SET: &[u8] =
        tonic::include_file_descriptor_set!("rating_descriptor");
}
