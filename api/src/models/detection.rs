//! Models for the flake detection API

use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{PersistOutcome, StorageStatus};

/// One detected flake region
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Flake {
    /// The bounding box as [x1, y1, x2, y2] pixel coordinates
    pub bbox: [u32; 4],
    /// The detector's confidence in [0, 1]
    pub confidence: f64,
    /// The bounded area in pixels
    pub area: u64,
    /// The material label the detector assigned
    pub material_type: String,
}

/// Everything the detector reported for one image
///
/// Detector output is treated as opaque; nothing here is validated beyond
/// what is needed to build the response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Detections {
    /// The detected flakes
    pub flakes: Vec<Flake>,
    /// How many flakes were detected
    pub total_flakes: usize,
    /// The [width, height] of the analyzed image
    pub image_dimensions: [u32; 2],
}

/// The json body for detecting an image that is already in the object store
#[derive(Debug, Deserialize, ToSchema)]
pub struct DetectFromS3Request {
    /// The key of the image to analyze
    pub s3_key: Option<String>,
    /// The customer this detection belongs to
    pub customer_id: Option<String>,
}

/// A completed detection pass ready to persist and return
#[derive(Debug)]
pub struct DetectionJob {
    /// The customer this detection belongs to
    pub customer_id: String,
    /// The generated id for this detection
    pub image_id: String,
    /// What the detector reported
    pub detections: Detections,
    /// When this detection ran in epoch seconds
    pub timestamp: i64,
}

impl DetectionJob {
    /// Start a new detection job with a fresh image id
    ///
    /// # Arguments
    ///
    /// * `customer_id` - The customer this detection belongs to
    /// * `detections` - What the detector reported
    #[must_use]
    pub fn new(customer_id: String, detections: Detections) -> Self {
        DetectionJob {
            customer_id,
            image_id: format!("img-{}", Uuid::new_v4()),
            detections,
            timestamp: Utc::now().timestamp(),
        }
    }

    /// The key the original upload is written to
    #[must_use]
    pub fn original_key(&self) -> String {
        format!("{}/uploaded/{}_original.jpg", self.customer_id, self.image_id)
    }

    /// The key the annotated result image is written to
    #[must_use]
    pub fn result_key(&self) -> String {
        format!(
            "{}/saved-result/{}_result.jpg",
            self.customer_id, self.image_id
        )
    }
}

/// The keys a detection pass wrote or referenced
#[derive(Debug, Serialize, ToSchema)]
pub struct S3Keys {
    /// The source image key for detections on existing artifacts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// The original upload key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original: Option<String>,
    /// The annotated result image key
    pub result: String,
}

/// The response body for both detection endpoints
#[derive(Debug, Serialize, ToSchema)]
pub struct DetectionResponse {
    /// Whether the detection succeeded
    pub status: String,
    /// The generated id for this detection
    pub image_id: String,
    /// The customer this detection belongs to
    pub customer_id: String,
    /// What the detector reported
    pub detection_results: Detections,
    /// A time limited url for the original upload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_image_url: Option<String>,
    /// A time limited url for the annotated result image
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_image_url: Option<String>,
    /// The keys this detection wrote or referenced
    pub s3_keys: S3Keys,
    /// When this detection ran in epoch seconds
    pub processing_timestamp: i64,
    /// What happened to the persistence attempt
    pub storage_status: StorageStatus,
    /// The storage error if persistence failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_error: Option<String>,
}

impl DetectionResponse {
    /// Build the response for a detection on a fresh upload
    ///
    /// # Arguments
    ///
    /// * `job` - The completed detection job
    /// * `urls` - The presigned (original, result) urls if persistence succeeded
    /// * `outcome` - What happened when we tried to persist
    #[must_use]
    pub fn uploaded(
        job: DetectionJob,
        urls: Option<(String, String)>,
        outcome: PersistOutcome,
    ) -> Self {
        let (storage_status, storage_error) = outcome.into_parts();
        let (original_image_url, result_image_url) = match urls {
            Some((original, result)) => (Some(original), Some(result)),
            None => (None, None),
        };
        let s3_keys = S3Keys {
            source: None,
            original: Some(job.original_key()),
            result: job.result_key(),
        };
        DetectionResponse {
            status: "success".to_owned(),
            image_id: job.image_id,
            customer_id: job.customer_id,
            detection_results: job.detections,
            original_image_url,
            result_image_url,
            s3_keys,
            processing_timestamp: job.timestamp,
            storage_status,
            storage_error,
        }
    }

    /// Build the response for a detection on an existing artifact
    ///
    /// # Arguments
    ///
    /// * `job` - The completed detection job
    /// * `source_key` - The key the source image was read from
    /// * `url` - The presigned result url if persistence succeeded
    /// * `outcome` - What happened when we tried to persist
    #[must_use]
    pub fn from_s3(
        job: DetectionJob,
        source_key: String,
        url: Option<String>,
        outcome: PersistOutcome,
    ) -> Self {
        let (storage_status, storage_error) = outcome.into_parts();
        let s3_keys = S3Keys {
            source: Some(source_key),
            original: None,
            result: job.result_key(),
        };
        DetectionResponse {
            status: "success".to_owned(),
            image_id: job.image_id,
            customer_id: job.customer_id,
            detection_results: job.detections,
            original_image_url: None,
            result_image_url: url,
            s3_keys,
            processing_timestamp: job.timestamp,
            storage_status,
            storage_error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a small set of detections for tests
    fn detections() -> Detections {
        Detections {
            flakes: vec![Flake {
                bbox: [10, 20, 60, 90],
                confidence: 0.8,
                area: 3500,
                material_type: "graphene".to_owned(),
            }],
            total_flakes: 1,
            image_dimensions: [640, 480],
        }
    }

    #[test]
    fn keys_follow_the_customer_layout() {
        let job = DetectionJob::new("acme".to_owned(), detections());
        assert_eq!(
            job.original_key(),
            format!("acme/uploaded/{}_original.jpg", job.image_id)
        );
        assert_eq!(
            job.result_key(),
            format!("acme/saved-result/{}_result.jpg", job.image_id)
        );
        assert!(job.image_id.starts_with("img-"));
    }

    #[test]
    fn fresh_jobs_get_distinct_ids() {
        let first = DetectionJob::new("acme".to_owned(), detections());
        let second = DetectionJob::new("acme".to_owned(), detections());
        assert_ne!(first.image_id, second.image_id);
    }
}
