//! Errors for the Matsight API

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// An error from the Matsight API
#[derive(Debug)]
pub struct ApiError {
    /// The status code to respond with
    pub code: StatusCode,
    /// The message to respond with if one exists
    pub msg: Option<String>,
}

impl ApiError {
    /// Create a new API error
    ///
    /// # Arguments
    ///
    /// * `code` - The status code to respond with
    /// * `msg` - The message to respond with
    #[must_use]
    pub fn new(code: StatusCode, msg: Option<String>) -> Self {
        ApiError { code, msg }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.msg {
            Some(msg) => write!(f, "{msg}"),
            None => write!(f, "{}", self.code),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    /// Convert this error into an error response
    fn into_response(self) -> Response {
        match self.msg {
            Some(msg) => (self.code, Json(json!({ "error": msg }))).into_response(),
            None => self.code.into_response(),
        }
    }
}

/// Build a 400 response error
#[macro_export]
macro_rules! bad {
    ($msg:expr) => {
        Err($crate::utils::ApiError::new(
            axum::http::StatusCode::BAD_REQUEST,
            Some($msg),
        ))
    };
}

/// Build a 404 response error
#[macro_export]
macro_rules! not_found {
    ($msg:expr) => {
        Err($crate::utils::ApiError::new(
            axum::http::StatusCode::NOT_FOUND,
            Some($msg),
        ))
    };
}

/// Build a 503 response error
#[macro_export]
macro_rules! unavailable {
    ($msg:expr) => {
        Err($crate::utils::ApiError::new(
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            Some($msg),
        ))
    };
}

/// Build a 500 response error
#[macro_export]
macro_rules! internal_err {
    ($msg:expr) => {
        Err($crate::utils::ApiError::new(
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            Some($msg),
        ))
    };
}

impl<E, R> From<aws_sdk_s3::error::SdkError<E, R>> for ApiError
where
    E: std::fmt::Debug,
    R: std::fmt::Debug,
{
    /// Convert an aws sdk error into an API error
    fn from(error: aws_sdk_s3::error::SdkError<E, R>) -> Self {
        ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            Some(format!("{error:?}")),
        )
    }
}

impl From<aws_sdk_s3::primitives::ByteStreamError> for ApiError {
    /// Convert a byte stream error into an API error
    fn from(error: aws_sdk_s3::primitives::ByteStreamError) -> Self {
        ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            Some(format!("{error:?}")),
        )
    }
}

impl From<aws_sdk_s3::presigning::PresigningConfigError> for ApiError {
    /// Convert a presigning config error into an API error
    fn from(error: aws_sdk_s3::presigning::PresigningConfigError) -> Self {
        ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            Some(format!("{error:?}")),
        )
    }
}

impl From<axum::extract::multipart::MultipartError> for ApiError {
    /// Convert a multipart form error into an API error
    fn from(error: axum::extract::multipart::MultipartError) -> Self {
        ApiError::new(StatusCode::BAD_REQUEST, Some(error.to_string()))
    }
}

impl From<image::ImageError> for ApiError {
    /// Convert an image error into an API error
    fn from(error: image::ImageError) -> Self {
        ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            Some(format!("Failed to create result image: {error}")),
        )
    }
}

impl From<reqwest::Error> for ApiError {
    /// Convert a model server error into an API error
    fn from(error: reqwest::Error) -> Self {
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, Some(error.to_string()))
    }
}

impl From<serde_json::Error> for ApiError {
    /// Convert a serialization error into an API error
    fn from(error: serde_json::Error) -> Self {
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, Some(error.to_string()))
    }
}
