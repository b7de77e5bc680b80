//! Utilities for the Matsight API

pub mod dynamo;
mod errors;
pub mod s3;
mod shared;
pub mod trace;

pub use dynamo::TableClient;
pub use errors::ApiError;
pub use s3::S3Client;
pub use shared::{AppState, Shared, Storage};
