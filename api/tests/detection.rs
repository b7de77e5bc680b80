//! Tests the detection routes

use axum::http::StatusCode;
use serde_json::json;

mod utils;

#[tokio::test]
async fn detect_defaults_the_customer() {
    let jpeg = utils::test_jpeg(160, 120);
    let fields = [("image", Some("flake.jpg"), "image/jpeg", jpeg)];
    let (status, body) = utils::post_multipart(utils::app(), "/detect", &fields).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["customer_id"], "default-customer");
    // the flake count always matches the flake list
    let flakes = body["detection_results"]["flakes"]
        .as_array()
        .expect("flakes must be a list");
    assert_eq!(
        body["detection_results"]["total_flakes"],
        json!(flakes.len())
    );
    assert_eq!(body["detection_results"]["image_dimensions"], json!([160, 120]));
    // storage is disabled, so no urls get signed but the detection still lands
    assert_eq!(body["storage_status"], "unavailable");
    assert!(body.get("result_image_url").is_none());
    assert!(body.get("original_image_url").is_none());
}

#[tokio::test]
async fn detect_echoes_the_customer_and_keys() {
    let jpeg = utils::test_jpeg(160, 120);
    let fields = [
        ("image", Some("flake.jpg"), "image/jpeg", jpeg),
        ("customer_id", None, "text/plain", b"acme".to_vec()),
    ];
    let (status, body) = utils::post_multipart(utils::app(), "/detect", &fields).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["customer_id"], "acme");
    let image_id = body["image_id"].as_str().expect("image_id must be a string");
    assert!(image_id.starts_with("img-"));
    assert_eq!(
        body["s3_keys"]["original"],
        json!(format!("acme/uploaded/{image_id}_original.jpg"))
    );
    assert_eq!(
        body["s3_keys"]["result"],
        json!(format!("acme/saved-result/{image_id}_result.jpg"))
    );
}

#[tokio::test]
async fn detect_requires_an_image_field() {
    let fields = [("customer_id", None, "text/plain", b"acme".to_vec())];
    let (status, body) = utils::post_multipart(utils::app(), "/detect", &fields).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No image file provided");
}

#[tokio::test]
async fn detect_rejects_empty_uploads() {
    let fields = [("image", Some("flake.jpg"), "image/jpeg", Vec::new())];
    let (status, body) = utils::post_multipart(utils::app(), "/detect", &fields).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No image file selected");
}

#[tokio::test]
async fn detect_rejects_undecodable_images() {
    let fields = [(
        "image",
        Some("flake.jpg"),
        "image/jpeg",
        b"not a jpeg at all".to_vec(),
    )];
    let (status, body) = utils::post_multipart(utils::app(), "/detect", &fields).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error = body["error"].as_str().expect("error must be a string");
    assert!(error.starts_with("Could not load image"));
}

#[tokio::test]
async fn detect_from_s3_requires_a_key() {
    let body = json!({ "customer_id": "acme" });
    let (status, body) = utils::post_json(utils::app(), "/detect_from_s3", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No S3 key provided");
}

#[tokio::test]
async fn detect_from_s3_needs_the_object_store() {
    // unlike the upload flow this one cannot compute anything without storage
    let body = json!({ "s3_key": "acme/uploaded/img.jpg" });
    let (status, body) = utils::post_json(utils::app(), "/detect_from_s3", body).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "Storage backend is unavailable");
}
