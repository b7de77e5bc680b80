//! Persists calculator results and errors

use chrono::Utc;
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::models::{Calculation, FailedCalculation, MetadataRecord, PersistOutcome, RecordType};
use crate::utils::{ApiError, Shared, Storage};

/// The fixed customer calculator records are filed under
const CALCULATOR_CUSTOMER: &str = "calculator-user";

impl Calculation {
    /// Write this calculation through the artifact then record pipeline
    ///
    /// # Arguments
    ///
    /// * `storage` - The storage backends
    #[instrument(name = "Calculation::save", skip_all, fields(operation = %self.operation), err(Debug))]
    async fn save(&self, storage: &Storage) -> Result<(), ApiError> {
        let calculation_id = format!("calc-{}", Uuid::new_v4());
        // serialize the raw payload for the artifact
        let payload = json!({
            "operation": self.operation,
            "a": self.a,
            "b": self.b,
            "result": self.result,
            "timestamp": Utc::now().to_rfc3339(),
        });
        let data = serde_json::to_vec(&payload)?;
        let size = data.len();
        // the artifact always lands before the record that indexes it
        let s3_key = format!("calculations/{calculation_id}.json");
        storage.s3.upload(&s3_key, data, "application/json").await?;
        // build and upsert the record referencing the artifact we just wrote
        let metadata = json!({
            "operation": self.operation,
            "operand_a": self.a,
            "operand_b": self.b,
            "result": self.result,
            "uploadSource": "api",
            "originalFilename": format!("{}_calculation.json", self.operation),
        });
        let record = MetadataRecord::new(
            CALCULATOR_CUSTOMER,
            &calculation_id,
            RecordType::Calculation,
            &s3_key,
        )
        .content("calculation", size, "json")
        .metadata(metadata);
        record.upsert(storage).await
    }

    /// Try to persist this calculation, folding the storage layer into a
    /// tagged outcome
    ///
    /// # Arguments
    ///
    /// * `shared` - Shared Matsight objects
    pub async fn persist(&self, shared: &Shared) -> PersistOutcome {
        match &shared.storage {
            Some(storage) => match self.save(storage).await {
                Ok(()) => PersistOutcome::Saved,
                Err(error) => PersistOutcome::Failed(error.to_string()),
            },
            None => PersistOutcome::Unavailable,
        }
    }
}

impl FailedCalculation {
    /// Write this domain error through the artifact then record pipeline
    ///
    /// # Arguments
    ///
    /// * `storage` - The storage backends
    #[instrument(name = "FailedCalculation::save", skip_all, fields(operation = %self.operation), err(Debug))]
    async fn save(&self, storage: &Storage) -> Result<(), ApiError> {
        let error_id = format!("error-{}", Uuid::new_v4());
        // serialize the raw payload for the artifact
        let payload = json!({
            "operation": self.operation,
            "a": self.a,
            "b": self.b,
            "error": self.error,
            "timestamp": Utc::now().to_rfc3339(),
        });
        let data = serde_json::to_vec(&payload)?;
        let size = data.len();
        // the artifact always lands before the record that indexes it
        let s3_key = format!("errors/{error_id}.json");
        storage.s3.upload(&s3_key, data, "application/json").await?;
        // build and upsert the record referencing the artifact we just wrote
        let metadata = json!({
            "operation": self.operation,
            "operand_a": self.a,
            "operand_b": self.b,
            "error": self.error,
            "uploadSource": "api",
            "originalFilename": format!("{}_error.json", self.operation),
        });
        let record =
            MetadataRecord::new(CALCULATOR_CUSTOMER, &error_id, RecordType::Error, &s3_key)
                .content("error", size, "json")
                .metadata(metadata);
        record.upsert(storage).await
    }

    /// Try to persist this domain error, folding the storage layer into a
    /// tagged outcome
    ///
    /// # Arguments
    ///
    /// * `shared` - Shared Matsight objects
    pub async fn persist(&self, shared: &Shared) -> PersistOutcome {
        match &shared.storage {
            Some(storage) => match self.save(storage).await {
                Ok(()) => PersistOutcome::Saved,
                Err(error) => PersistOutcome::Failed(error.to_string()),
            },
            None => PersistOutcome::Unavailable,
        }
    }
}
