//! API layer - gRPC service implementations

mod grpc_service;
mod proto_converters;

pub use grpc_service::ProductServiceImpl;
pub use proto_converters::*;
