//! Utilities for testing the Matsight API

// not every test binary uses every helper
#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use matsight::conf::Conf;
use matsight::detect::Detector;
use matsight::utils::{AppState, Shared};

/// Build an app with storage disabled and the mock detector
///
/// This mirrors a process whose startup probes failed, which is the only
/// storage state the tests can exercise without live backends.
pub fn app() -> Router {
    let config = Conf::default();
    let detector = Detector::new(&config);
    let shared = Shared {
        config: config.clone(),
        storage: None,
        detector,
    };
    matsight::build_app(AppState::new(shared), &config)
}

/// Send a GET request and parse the json response
///
/// # Arguments
///
/// * `app` - The app to drive
/// * `uri` - The uri to get
pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .expect("request builder should not fail"),
        )
        .await
        .expect("handler should respond");
    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("response body must be readable")
        .to_bytes();
    let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, value)
}

/// Send a POST request with a json body and parse the json response
///
/// # Arguments
///
/// * `app` - The app to drive
/// * `uri` - The uri to post to
/// * `body` - The json body to send
pub async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("request builder should not fail"),
        )
        .await
        .expect("handler should respond");
    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("response body must be readable")
        .to_bytes();
    let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, value)
}

/// Send a multipart POST request and parse the json response
///
/// # Arguments
///
/// * `app` - The app to drive
/// * `uri` - The uri to post to
/// * `fields` - The (name, filename, content type, data) form fields to send
pub async fn post_multipart(
    app: Router,
    uri: &str,
    fields: &[(&str, Option<&str>, &str, Vec<u8>)],
) -> (StatusCode, Value) {
    let boundary = "matsight-test-boundary";
    // assemble the multipart body by hand
    let mut body = Vec::new();
    for (name, filename, content_type, data) in fields {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        match filename {
            Some(filename) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n"
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n").as_bytes(),
            ),
        }
        body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(body))
                .expect("request builder should not fail"),
        )
        .await
        .expect("handler should respond");
    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("response body must be readable")
        .to_bytes();
    let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, value)
}

/// Encode a small jpeg for upload tests
///
/// # Arguments
///
/// * `width` - The image width
/// * `height` - The image height
pub fn test_jpeg(width: u32, height: u32) -> Vec<u8> {
    let image = image::DynamicImage::new_rgb8(width, height);
    let mut data = std::io::Cursor::new(Vec::new());
    image
        .write_to(&mut data, image::ImageFormat::Jpeg)
        .expect("encoding a test jpeg should not fail");
    data.into_inner()
}
