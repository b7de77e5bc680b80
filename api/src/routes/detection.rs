//! Routes for the flake detection API

use axum::extract::{Multipart, State};
use axum::routing::post;
use axum::{Json, Router};
use tracing::instrument;

use crate::detect::annotate;
use crate::models::{
    DetectFromS3Request, DetectionJob, DetectionResponse, Detections, PersistOutcome,
};
use crate::utils::{ApiError, AppState};
use crate::{bad, unavailable};

/// The customer detections fall back to when none is given
pub const DEFAULT_CUSTOMER: &str = "default-customer";

/// Decode an uploaded image, keeping decode failures as client errors
///
/// # Arguments
///
/// * `data` - The raw image bytes
fn load_image(data: &[u8]) -> Result<image::DynamicImage, ApiError> {
    match image::load_from_memory(data) {
        Ok(image) => Ok(image),
        Err(error) => bad!(format!("Could not load image: {error}")),
    }
}

/// Run detection and build the annotated result image
///
/// # Arguments
///
/// * `state` - Shared Matsight objects
/// * `image` - The decoded image to analyze
async fn run_detection(
    state: &AppState,
    image: &image::DynamicImage,
) -> Result<(Detections, Vec<u8>), ApiError> {
    // the detector's output is opaque; we only use it to build the response
    let detections = state.shared.detector.detect(image).await?;
    let annotated = annotate(image, &detections)?;
    Ok((detections, annotated))
}

/// Detect 2D material flakes in an uploaded image
///
/// # Arguments
///
/// * `state` - Shared Matsight objects
/// * `form` - The multipart form containing the image upload
#[utoipa::path(
    post,
    path = "/detect",
    responses(
        (status = 200, description = "The detection results and retrieval urls", body = DetectionResponse),
        (status = 400, description = "No image file was provided or it could not be decoded"),
        (status = 500, description = "The detector failed"),
    )
)]
#[instrument(name = "routes::detection::detect", skip_all, err(Debug))]
#[axum_macros::debug_handler]
async fn detect(
    State(state): State<AppState>,
    mut form: Multipart,
) -> Result<Json<DetectionResponse>, ApiError> {
    // pull the image and customer id out of the form
    let mut upload: Option<(String, Vec<u8>)> = None;
    let mut customer_id: Option<String> = None;
    while let Some(field) = form.next_field().await? {
        // copy the name out so consuming the field below is legal
        let name = field.name().map(ToOwned::to_owned);
        match name.as_deref() {
            Some("image") => {
                let filename = field.file_name().unwrap_or("upload.jpg").to_owned();
                upload = Some((filename, field.bytes().await?.to_vec()));
            }
            Some("customer_id") => customer_id = Some(field.text().await?),
            _ => continue,
        }
    }
    let (filename, original) = match upload {
        Some(upload) => upload,
        None => return bad!("No image file provided".to_owned()),
    };
    if original.is_empty() {
        return bad!("No image file selected".to_owned());
    }
    let customer_id = customer_id.unwrap_or_else(|| DEFAULT_CUSTOMER.to_owned());
    // decode before detection so client errors stay client errors
    let image = load_image(&original)?;
    let (detections, annotated) = run_detection(&state, &image).await?;
    let job = DetectionJob::new(customer_id, detections);
    // artifacts land first, then the record, then the urls get signed
    let (outcome, urls) = match &state.shared.storage {
        None => (PersistOutcome::Unavailable, None),
        Some(storage) => match job.save_upload(storage, &original, annotated, &filename).await {
            Ok(urls) => (PersistOutcome::Saved, Some(urls)),
            Err(error) => (PersistOutcome::Failed(error.to_string()), None),
        },
    };
    Ok(Json(DetectionResponse::uploaded(job, urls, outcome)))
}

/// Detect 2D material flakes in an image that is already in the object store
///
/// # Arguments
///
/// * `state` - Shared Matsight objects
/// * `request` - The request naming the image to analyze
#[utoipa::path(
    post,
    path = "/detect_from_s3",
    request_body = DetectFromS3Request,
    responses(
        (status = 200, description = "The detection results and the result retrieval url", body = DetectionResponse),
        (status = 400, description = "No s3 key was provided"),
        (status = 503, description = "The storage backend is unavailable"),
    )
)]
#[instrument(name = "routes::detection::detect_from_s3", skip_all, err(Debug))]
async fn detect_from_s3(
    State(state): State<AppState>,
    Json(request): Json<DetectFromS3Request>,
) -> Result<Json<DetectionResponse>, ApiError> {
    let s3_key = match request.s3_key {
        Some(key) if !key.is_empty() => key,
        _ => return bad!("No S3 key provided".to_owned()),
    };
    let customer_id = request
        .customer_id
        .unwrap_or_else(|| DEFAULT_CUSTOMER.to_owned());
    // this flow cannot compute anything without the object store
    let storage = match &state.shared.storage {
        Some(storage) => storage,
        None => return unavailable!("Storage backend is unavailable".to_owned()),
    };
    // fetch the existing artifact instead of an upload
    let source = storage.s3.download(&s3_key).await?;
    let image = load_image(&source)?;
    let (detections, annotated) = run_detection(&state, &image).await?;
    let job = DetectionJob::new(customer_id, detections);
    // the result artifact lands first, then the record, then the url gets signed
    let (outcome, url) = match job.save_result(storage, annotated, &s3_key).await {
        Ok(url) => (PersistOutcome::Saved, Some(url)),
        Err(error) => (PersistOutcome::Failed(error.to_string()), None),
    };
    Ok(Json(DetectionResponse::from_s3(job, s3_key, url, outcome)))
}

/// Add the detection routes to our router
///
/// # Arguments
///
/// * `router` - The router to add routes too
pub fn mount(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/detect", post(detect))
        .route("/detect_from_s3", post(detect_from_s3))
}
