//! Basic introspection routes
//!
//! None of these have persistence side effects.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{Value, json};
use tracing::instrument;

use crate::utils::AppState;

/// The human readable service name
const SERVICE: &str = "Material Recognition Service";

/// Identify this service
async fn index() -> &'static str {
    "Material Recognition Service Calculator with Storage Testing!"
}

/// A liveness probe with no storage dependencies
///
/// # Arguments
///
/// * `state` - Shared Matsight objects
async fn simple_test(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "success",
        "message": "Application is running",
        "storage_available": state.shared.storage.is_some(),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Report service health with live backend probes
///
/// # Arguments
///
/// * `state` - Shared Matsight objects
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "The service health and backend diagnostics"),
    )
)]
#[instrument(name = "routes::basic::health", skip_all)]
async fn health(State(state): State<AppState>) -> Json<Value> {
    let conf = &state.shared.config.matsight;
    let mut diagnostic = json!({
        "storage_initialized": state.shared.storage.is_some(),
        "model_available": state.shared.detector.model_available(),
        "bucket_name": conf.s3.bucket,
        "table_name": conf.dynamodb.table,
        "aws_region": conf.s3.region,
    });
    // probe both backends live so health reflects right now, not process start
    if let Some(storage) = &state.shared.storage {
        match storage.s3.probe().await {
            Ok(()) => diagnostic["s3_accessible"] = json!(true),
            Err(error) => {
                diagnostic["s3_accessible"] = json!(false);
                diagnostic["s3_error"] = json!(error.to_string());
            }
        }
        match storage.table.probe().await {
            Ok(()) => diagnostic["dynamodb_accessible"] = json!(true),
            Err(error) => {
                diagnostic["dynamodb_accessible"] = json!(false);
                diagnostic["dynamodb_error"] = json!(error.to_string());
            }
        }
    }
    let storage = if state.shared.storage.is_some() {
        "available"
    } else {
        "unavailable"
    };
    Json(json!({
        "status": "healthy",
        "service": SERVICE,
        "storage": storage,
        "diagnostic": diagnostic,
    }))
}

/// Report a detailed diagnosis of the storage and model wiring
///
/// # Arguments
///
/// * `state` - Shared Matsight objects
#[instrument(name = "routes::basic::diagnose", skip_all)]
async fn diagnose(State(state): State<AppState>) -> Json<Value> {
    let conf = &state.shared.config.matsight;
    // credentials are reported as present or absent, never echoed
    let mut diagnosis = json!({
        "version": env!("CARGO_PKG_VERSION"),
        "environment_variables": {
            "AWS_DEFAULT_REGION": std::env::var("AWS_DEFAULT_REGION").ok(),
            "AWS_ACCESS_KEY_ID": std::env::var("AWS_ACCESS_KEY_ID").ok().map(|_| "***"),
            "AWS_SECRET_ACCESS_KEY": std::env::var("AWS_SECRET_ACCESS_KEY").ok().map(|_| "***"),
            "S3_BUCKET_NAME": conf.s3.bucket,
            "DYNAMODB_TABLE_NAME": conf.dynamodb.table,
            "MODEL_PATH": conf.model.path,
        },
        "clients": {
            "storage_initialized": state.shared.storage.is_some(),
            "model_available": state.shared.detector.model_available(),
        },
        "connection_tests": {},
    });
    // run live connection tests when the clients exist
    if let Some(storage) = &state.shared.storage {
        diagnosis["connection_tests"]["s3"] = match storage.s3.probe().await {
            Ok(()) => json!("success"),
            Err(error) => json!(format!("failed: {error}")),
        };
        diagnosis["connection_tests"]["dynamodb"] = match storage.table.probe().await {
            Ok(()) => json!("success"),
            Err(error) => json!(format!("failed: {error}")),
        };
    }
    Json(diagnosis)
}

/// Describe this service and its endpoints
///
/// # Arguments
///
/// * `state` - Shared Matsight objects
async fn info(State(state): State<AppState>) -> Json<Value> {
    let conf = &state.shared.config.matsight;
    let storage_available = state.shared.storage.is_some();
    Json(json!({
        "service": SERVICE,
        "version": env!("CARGO_PKG_VERSION"),
        "model_available": state.shared.detector.model_available(),
        "model_path": conf.model.path,
        "storage": {
            "available": storage_available,
            "s3_bucket": if storage_available { conf.s3.bucket.as_str() } else { "N/A" },
            "dynamodb_table": if storage_available { conf.dynamodb.table.as_str() } else { "N/A" },
        },
        "endpoints": {
            "health": "/health",
            "diagnose": "/diagnose",
            "add": "/add/{a}/{b}",
            "subtract": "/subtract/{a}/{b}",
            "multiply": "/multiply/{a}/{b}",
            "divide": "/divide/{a}/{b}",
            "detect": "/detect (POST)",
            "detect_from_s3": "/detect_from_s3 (POST)",
            "storage_test": "/storage/test",
            "storage_s3_test": "/storage/s3/test",
            "storage_dynamodb_test": "/storage/dynamodb/test",
            "storage_save_test": "/storage/save-test",
            "info": "/info",
        },
        "example_usage": {
            "GET": "/add/10/5",
            "divide_test": "/divide/10/0 (will save error to storage)",
            "detect": {
                "method": "POST",
                "url": "/detect",
                "form_data": { "image": "image file", "customer_id": "customer-123" },
            },
            "detect_from_s3": {
                "method": "POST",
                "url": "/detect_from_s3",
                "json": { "s3_key": "customer-123/uploaded/image.jpg", "customer_id": "customer-123" },
            },
        },
    }))
}

/// Add the basic routes to our router
///
/// # Arguments
///
/// * `router` - The router to add routes too
pub fn mount(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/", get(index))
        .route("/simple-test", get(simple_test))
        .route("/health", get(health))
        .route("/diagnose", get(diagnose))
        .route("/info", get(info))
}
