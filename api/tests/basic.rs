//! Tests the basic routes

use axum::http::StatusCode;

mod utils;

#[tokio::test]
async fn index_identifies_the_service() {
    let app = utils::app();
    let response = tower::ServiceExt::oneshot(
        app,
        axum::http::Request::builder()
            .method("GET")
            .uri("/")
            .body(axum::body::Body::empty())
            .expect("request builder should not fail"),
    )
    .await
    .expect("handler should respond");
    assert_eq!(response.status(), StatusCode::OK);
    let body = http_body_util::BodyExt::collect(response.into_body())
        .await
        .expect("response body must be readable")
        .to_bytes();
    assert_eq!(
        body.as_ref(),
        b"Material Recognition Service Calculator with Storage Testing!"
    );
}

#[tokio::test]
async fn health_reports_storage_availability() {
    let (status, body) = utils::get(utils::app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "Material Recognition Service");
    assert_eq!(body["storage"], "unavailable");
    assert_eq!(body["diagnostic"]["storage_initialized"], false);
    assert_eq!(body["diagnostic"]["bucket_name"], "matsight-customer-images");
    assert_eq!(body["diagnostic"]["table_name"], "CustomerImages");
}

#[tokio::test]
async fn simple_test_has_no_storage_dependencies() {
    let (status, body) = utils::get(utils::app(), "/simple-test").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["storage_available"], false);
}

#[tokio::test]
async fn info_catalogs_the_endpoints() {
    let (status, body) = utils::get(utils::app(), "/info").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "Material Recognition Service");
    assert_eq!(body["model_available"], false);
    // unavailable storage is reported, not hidden
    assert_eq!(body["storage"]["available"], false);
    assert_eq!(body["storage"]["s3_bucket"], "N/A");
    assert_eq!(body["endpoints"]["add"], "/add/{a}/{b}");
    assert_eq!(body["endpoints"]["detect"], "/detect (POST)");
}

#[tokio::test]
async fn diagnose_masks_credentials() {
    let (status, body) = utils::get(utils::app(), "/diagnose").await;
    assert_eq!(status, StatusCode::OK);
    let secret = &body["environment_variables"]["AWS_SECRET_ACCESS_KEY"];
    assert!(secret.is_null() || secret == "***");
    assert_eq!(body["clients"]["storage_initialized"], false);
}

#[tokio::test]
async fn storage_self_tests_report_missing_backends() {
    for uri in [
        "/storage/test",
        "/storage/s3/test",
        "/storage/dynamodb/test",
        "/storage/save-test",
    ] {
        let (status, body) = utils::get(utils::app(), uri).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], "error");
    }
}

#[tokio::test]
async fn unknown_routes_fall_back_to_404() {
    let (status, _) = utils::get(utils::app(), "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
