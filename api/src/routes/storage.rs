//! Storage self test routes
//!
//! These probe and exercise the storage backends directly so deploy
//! pipelines can verify the wiring end to end.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::models::{MetadataRecord, RecordType};
use crate::utils::{AppState, Storage};

/// Build an error response in the self test shape
///
/// # Arguments
///
/// * `message` - The error message to report
fn test_error(message: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "status": "error", "message": message })),
    )
        .into_response()
}

/// Build a success response in the self test shape
///
/// # Arguments
///
/// * `message` - The success message to report
fn test_success(message: &str) -> Response {
    Json(json!({ "status": "success", "message": message })).into_response()
}

/// Pull the storage backends out of the state or report they are missing
fn require_storage(state: &AppState) -> Result<&Storage, Response> {
    match &state.shared.storage {
        Some(storage) => Ok(storage),
        None => Err(test_error("storage backend not available".to_owned())),
    }
}

/// Test both storage backends
///
/// # Arguments
///
/// * `state` - Shared Matsight objects
#[instrument(name = "routes::storage::test_all", skip_all)]
async fn test_all(State(state): State<AppState>) -> Response {
    let storage = match require_storage(&state) {
        Ok(storage) => storage,
        Err(resp) => return resp,
    };
    if let Err(error) = storage.s3.probe().await {
        return test_error(error.to_string());
    }
    if let Err(error) = storage.table.probe().await {
        return test_error(error.to_string());
    }
    test_success("Storage connections working")
}

/// Test the s3 connection
///
/// # Arguments
///
/// * `state` - Shared Matsight objects
#[instrument(name = "routes::storage::test_s3", skip_all)]
async fn test_s3(State(state): State<AppState>) -> Response {
    let storage = match require_storage(&state) {
        Ok(storage) => storage,
        Err(resp) => return resp,
    };
    match storage.s3.probe().await {
        Ok(()) => test_success("S3 connection working"),
        Err(error) => test_error(error.to_string()),
    }
}

/// Test the DynamoDB connection
///
/// # Arguments
///
/// * `state` - Shared Matsight objects
#[instrument(name = "routes::storage::test_dynamodb", skip_all)]
async fn test_dynamodb(State(state): State<AppState>) -> Response {
    let storage = match require_storage(&state) {
        Ok(storage) => storage,
        Err(resp) => return resp,
    };
    match storage.table.probe().await {
        Ok(()) => test_success("DynamoDB connection working"),
        Err(error) => test_error(error.to_string()),
    }
}

/// Write a test artifact and record through the whole pipeline
///
/// # Arguments
///
/// * `state` - Shared Matsight objects
#[instrument(name = "routes::storage::save_test", skip_all)]
async fn save_test(State(state): State<AppState>) -> Response {
    let storage = match require_storage(&state) {
        Ok(storage) => storage,
        Err(resp) => return resp,
    };
    // write a small test artifact
    let test_key = format!("test/data-{}.json", Uuid::new_v4());
    let payload = json!({ "timestamp": Utc::now().to_rfc3339(), "test": true });
    let data = match serde_json::to_vec(&payload) {
        Ok(data) => data,
        Err(error) => return test_error(error.to_string()),
    };
    if let Err(error) = storage.s3.upload(&test_key, data, "application/json").await {
        return test_error(error.to_string());
    }
    // index it with a short lived test record
    let item_id = format!("test-{}", Uuid::new_v4());
    let record = MetadataRecord::new("test-customer", &item_id, RecordType::Test, &test_key);
    if let Err(error) = record.upsert(storage).await {
        return test_error(error.to_string());
    }
    Json(json!({
        "status": "success",
        "s3_key": test_key,
        "dynamodb_item": record,
    }))
    .into_response()
}

/// Add the storage self test routes to our router
///
/// # Arguments
///
/// * `router` - The router to add routes too
pub fn mount(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/storage/test", get(test_all))
        .route("/storage/s3/test", get(test_s3))
        .route("/storage/dynamodb/test", get(test_dynamodb))
        .route("/storage/save-test", get(save_test))
}
