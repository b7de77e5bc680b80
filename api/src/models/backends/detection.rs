//! Persists detection inputs and results

use serde_json::json;
use tracing::instrument;

use crate::models::{DetectionJob, MetadataRecord, RecordType};
use crate::utils::{ApiError, Storage};

/// How many seconds presigned retrieval urls stay valid for
const PRESIGN_EXPIRY_SECS: u64 = 3600;

impl DetectionJob {
    /// Persist a detection pass over a fresh upload
    ///
    /// Both image artifacts land before the record that indexes them; the
    /// retrieval urls are only signed once everything is in place.
    ///
    /// # Arguments
    ///
    /// * `storage` - The storage backends
    /// * `original` - The uploaded image bytes
    /// * `annotated` - The annotated result image bytes
    /// * `filename` - The filename the image was uploaded with
    #[instrument(
        name = "DetectionJob::save_upload",
        skip_all,
        fields(image_id = %self.image_id),
        err(Debug)
    )]
    pub async fn save_upload(
        &self,
        storage: &Storage,
        original: &[u8],
        annotated: Vec<u8>,
        filename: &str,
    ) -> Result<(String, String), ApiError> {
        let original_key = self.original_key();
        let result_key = self.result_key();
        // both artifacts land before the record that indexes them
        storage
            .s3
            .upload(&original_key, original.to_vec(), "image/jpeg")
            .await?;
        storage
            .s3
            .upload(&result_key, annotated, "image/jpeg")
            .await?;
        // build and upsert the record referencing the original upload
        let metadata = json!({
            "detection_results": self.detections,
            "total_flakes": self.detections.total_flakes,
            "uploadSource": "api",
            "originalFilename": filename,
            "processing_timestamp": self.timestamp,
        });
        let record = MetadataRecord::new(
            &self.customer_id,
            &self.image_id,
            RecordType::Uploaded,
            &original_key,
        )
        .content("detected", original.len(), "jpg")
        .metadata(metadata);
        record.upsert(storage).await?;
        // sign the retrieval urls for both images
        let original_url = storage.s3.presign(&original_key, PRESIGN_EXPIRY_SECS).await?;
        let result_url = storage.s3.presign(&result_key, PRESIGN_EXPIRY_SECS).await?;
        Ok((original_url, result_url))
    }

    /// Persist a detection pass over an artifact that was already uploaded
    ///
    /// # Arguments
    ///
    /// * `storage` - The storage backends
    /// * `annotated` - The annotated result image bytes
    /// * `source_key` - The key the source image was read from
    #[instrument(
        name = "DetectionJob::save_result",
        skip_all,
        fields(image_id = %self.image_id),
        err(Debug)
    )]
    pub async fn save_result(
        &self,
        storage: &Storage,
        annotated: Vec<u8>,
        source_key: &str,
    ) -> Result<String, ApiError> {
        let result_key = self.result_key();
        let size = annotated.len();
        // the artifact always lands before the record that indexes it
        storage
            .s3
            .upload(&result_key, annotated, "image/jpeg")
            .await?;
        // build and upsert the record referencing the result image
        let metadata = json!({
            "detection_results": self.detections,
            "total_flakes": self.detections.total_flakes,
            "source_s3_key": source_key,
            "processing_timestamp": self.timestamp,
        });
        let record = MetadataRecord::new(
            &self.customer_id,
            &self.image_id,
            RecordType::SavedResult,
            &result_key,
        )
        .content("detected", size, "jpg")
        .metadata(metadata);
        record.upsert(storage).await?;
        // sign the retrieval url for the result image
        storage.s3.presign(&result_key, PRESIGN_EXPIRY_SECS).await
    }
}
