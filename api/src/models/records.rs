//! Metadata records indexing artifacts in the key value table

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use utoipa::ToSchema;

/// How many days calculator, error, and test records live for
const DEFAULT_TTL_DAYS: i64 = 30;

/// How many days detection records live for
const DETECTION_TTL_DAYS: i64 = 365;

/// The kind of artifact a metadata record indexes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordType {
    Uploaded,
    SavedResult,
    Calculation,
    Error,
    Test,
}

impl RecordType {
    /// How many days records of this kind live before the table expires them
    #[must_use]
    pub fn ttl_days(self) -> i64 {
        match self {
            RecordType::Uploaded | RecordType::SavedResult => DETECTION_TTL_DAYS,
            RecordType::Calculation | RecordType::Error | RecordType::Test => DEFAULT_TTL_DAYS,
        }
    }
}

/// The lifecycle state of a record
///
/// Only active records are ever produced here; expiry is the table's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Active,
    Deleted,
}

/// One append-only index entry referencing exactly one artifact
///
/// The referenced artifact is always written before this record is, so a
/// fault between the two writes can orphan an artifact but never leave a
/// record pointing at a missing one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataRecord {
    /// The partition key
    #[serde(rename = "customerID")]
    pub customer_id: String,
    /// The sort key; reused as a generic item id for non image artifacts
    #[serde(rename = "imageID")]
    pub image_id: String,
    /// When this record was created in epoch seconds
    #[serde(rename = "createdAt")]
    pub created_at: i64,
    /// The kind of artifact this record indexes
    #[serde(rename = "type")]
    pub kind: RecordType,
    /// The key of the artifact this record references
    #[serde(rename = "s3Key")]
    pub s3_key: String,
    /// The thumbnail key; the artifact key when no distinct thumbnail exists
    #[serde(rename = "thumbnailKey")]
    pub thumbnail_key: String,
    /// The lifecycle state of this record
    pub status: RecordStatus,
    /// The coarse material label for this artifact
    #[serde(rename = "materialType", skip_serializing_if = "Option::is_none")]
    pub material_type: Option<String>,
    /// The artifact size in bytes
    #[serde(rename = "imageSize", skip_serializing_if = "Option::is_none")]
    pub image_size: Option<usize>,
    /// The artifact format
    #[serde(rename = "imageFormat", skip_serializing_if = "Option::is_none")]
    pub image_format: Option<String>,
    /// Where this artifact is in its processing lifecycle
    #[serde(rename = "processingStatus", skip_serializing_if = "Option::is_none")]
    pub processing_status: Option<String>,
    /// Operation specific fields; float leaves get normalized before the write
    pub metadata: Value,
    /// When the table expires this record in epoch seconds
    #[serde(rename = "expiresAt")]
    pub expires_at: i64,
}

impl MetadataRecord {
    /// Build a new active record for an artifact that was already written
    ///
    /// # Arguments
    ///
    /// * `customer_id` - The partition key
    /// * `image_id` - The sort key
    /// * `kind` - The kind of artifact this record indexes
    /// * `s3_key` - The key of the artifact this record references
    #[must_use]
    pub fn new(customer_id: &str, image_id: &str, kind: RecordType, s3_key: &str) -> Self {
        let created_at = Utc::now().timestamp();
        MetadataRecord {
            customer_id: customer_id.to_owned(),
            image_id: image_id.to_owned(),
            created_at,
            kind,
            s3_key: s3_key.to_owned(),
            thumbnail_key: s3_key.to_owned(),
            status: RecordStatus::Active,
            material_type: None,
            image_size: None,
            image_format: None,
            processing_status: None,
            metadata: json!({}),
            expires_at: created_at + chrono::Duration::days(kind.ttl_days()).num_seconds(),
        }
    }

    /// Add the content description fields to this record
    ///
    /// # Arguments
    ///
    /// * `material_type` - The coarse material label
    /// * `size` - The artifact size in bytes
    /// * `format` - The artifact format
    #[must_use]
    pub fn content(mut self, material_type: &str, size: usize, format: &str) -> Self {
        self.material_type = Some(material_type.to_owned());
        self.image_size = Some(size);
        self.image_format = Some(format.to_owned());
        self.processing_status = Some("completed".to_owned());
        self
    }

    /// Set the operation specific metadata for this record
    ///
    /// # Arguments
    ///
    /// * `metadata` - The operation specific fields
    #[must_use]
    pub fn metadata(mut self, metadata: Value) -> Self {
        self.metadata = metadata;
        self
    }
}

/// What happened when a handler tried to persist a result
///
/// Domain computation success is never held hostage by the storage layer;
/// this outcome only annotates the response.
#[derive(Debug)]
pub enum PersistOutcome {
    /// The artifact and its record both landed
    Saved,
    /// The storage backends were unreachable at process start, nothing was attempted
    Unavailable,
    /// A storage write failed; the error only annotates the response
    Failed(String),
}

impl PersistOutcome {
    /// Split this outcome into its response annotations
    #[must_use]
    pub fn into_parts(self) -> (StorageStatus, Option<String>) {
        match self {
            PersistOutcome::Saved => (StorageStatus::Saved, None),
            PersistOutcome::Unavailable => (StorageStatus::Unavailable, None),
            PersistOutcome::Failed(error) => (StorageStatus::Failed, Some(error)),
        }
    }
}

/// The response annotation decoupling domain success from persistence success
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StorageStatus {
    Saved,
    Unavailable,
    Failed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_is_strictly_after_creation() {
        for kind in [
            RecordType::Uploaded,
            RecordType::SavedResult,
            RecordType::Calculation,
            RecordType::Error,
            RecordType::Test,
        ] {
            let record = MetadataRecord::new("test-customer", "test-id", kind, "test/key.json");
            assert!(record.expires_at > record.created_at);
        }
    }

    #[test]
    fn detection_records_outlive_calculator_records() {
        let detection =
            MetadataRecord::new("cust", "img", RecordType::Uploaded, "cust/uploaded/img.jpg");
        let calc = MetadataRecord::new("calculator-user", "calc", RecordType::Calculation, "k");
        let day = 86_400;
        assert_eq!(detection.expires_at - detection.created_at, 365 * day);
        assert_eq!(calc.expires_at - calc.created_at, 30 * day);
    }

    #[test]
    fn records_serialize_with_the_table_field_names() {
        let record = MetadataRecord::new(
            "calculator-user",
            "calc-123",
            RecordType::Calculation,
            "calculations/calc-123.json",
        )
        .content("calculation", 42, "json")
        .metadata(json!({"operation": "addition"}));
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["customerID"], "calculator-user");
        assert_eq!(value["imageID"], "calc-123");
        assert_eq!(value["type"], "CALCULATION");
        assert_eq!(value["s3Key"], "calculations/calc-123.json");
        assert_eq!(value["thumbnailKey"], "calculations/calc-123.json");
        assert_eq!(value["status"], "active");
        assert_eq!(value["materialType"], "calculation");
        assert_eq!(value["imageSize"], 42);
        assert_eq!(value["imageFormat"], "json");
        assert_eq!(value["processingStatus"], "completed");
        assert_eq!(value["metadata"]["operation"], "addition");
    }

    #[test]
    fn record_types_serialize_screaming() {
        assert_eq!(
            serde_json::to_string(&RecordType::SavedResult).unwrap(),
            "\"SAVED_RESULT\""
        );
        assert_eq!(
            serde_json::to_string(&RecordType::Uploaded).unwrap(),
            "\"UPLOADED\""
        );
    }
}
