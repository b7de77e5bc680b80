//! Upserts metadata records into the key value table

use tracing::instrument;

use crate::models::MetadataRecord;
use crate::utils::{ApiError, Storage, dynamo};

impl MetadataRecord {
    /// Upsert this record by primary key; last write wins
    ///
    /// The artifact this record references must already be in the object
    /// store. The table cannot represent binary floats, so the record is
    /// passed through the numeric normalizer before the write.
    ///
    /// # Arguments
    ///
    /// * `storage` - The storage backends
    #[instrument(
        name = "MetadataRecord::upsert",
        skip_all,
        fields(image_id = %self.image_id),
        err(Debug)
    )]
    pub async fn upsert(&self, storage: &Storage) -> Result<(), ApiError> {
        // rebuild every float leaf as an exact decimal
        let value = serde_json::to_value(self)?;
        let item = dynamo::to_item(&value)?;
        storage.table.put(item).await
    }
}
