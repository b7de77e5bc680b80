//! Handles upserting metadata records into DynamoDB

use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::AttributeValue;
use serde_json::Value;
use std::collections::HashMap;
use tracing::instrument;

use super::ApiError;
use crate::internal_err;

pub struct TableClient {
    /// The table to upsert records into
    pub table: String,
    /// The aws sdk DynamoDB client
    pub client: Client,
}

impl TableClient {
    /// Builds a new table client
    ///
    /// # Arguments
    ///
    /// * `table` - The table to upsert records into
    /// * `sdk` - The shared sdk config to inherit http and retry settings from
    #[must_use]
    pub fn new(table: &str, sdk: &aws_config::SdkConfig) -> Self {
        // inherit transport settings from the shared sdk config
        let builder = aws_sdk_dynamodb::config::Builder::from(sdk);
        // build our DynamoDB client
        let client = Client::from_conf(builder.build());
        TableClient {
            table: table.to_owned(),
            client,
        }
    }

    /// Upsert one item by primary key
    ///
    /// Duplicate keys are overwritten; last write wins. There is no read
    /// before the write and no retry on failure.
    ///
    /// # Arguments
    ///
    /// * `item` - The item to upsert
    #[instrument(name = "TableClient::put", skip_all, err(Debug))]
    pub async fn put(&self, item: HashMap<String, AttributeValue>) -> Result<(), ApiError> {
        // upsert this item into our table
        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(item))
            .send()
            .await?;
        Ok(())
    }

    /// Check that our table is reachable
    #[instrument(name = "TableClient::probe", skip(self), err(Debug))]
    pub async fn probe(&self) -> Result<(), ApiError> {
        // describe our table to make sure it exists and we can reach it
        self.client
            .describe_table()
            .table_name(&self.table)
            .send()
            .await?;
        Ok(())
    }
}

/// Convert a json value into a DynamoDB attribute value
///
/// The table cannot represent binary floats, so every float leaf is rebuilt
/// as an exact decimal number from its shortest round trip string form
/// rather than from the binary float itself. Structure is preserved exactly
/// and non numeric leaves pass through unchanged.
///
/// # Arguments
///
/// * `value` - The value to convert
#[must_use]
pub fn to_attr(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(flag) => AttributeValue::Bool(*flag),
        Value::Number(num) => AttributeValue::N(num.to_string()),
        Value::String(text) => AttributeValue::S(text.clone()),
        Value::Array(items) => AttributeValue::L(items.iter().map(to_attr).collect()),
        Value::Object(map) => AttributeValue::M(
            map.iter()
                .map(|(key, nested)| (key.clone(), to_attr(nested)))
                .collect(),
        ),
    }
}

/// Convert a top level json object into a DynamoDB item
///
/// # Arguments
///
/// * `value` - The object to convert
pub fn to_item(value: &Value) -> Result<HashMap<String, AttributeValue>, ApiError> {
    match value {
        Value::Object(map) => Ok(map
            .iter()
            .map(|(key, nested)| (key.clone(), to_attr(nested)))
            .collect()),
        _ => internal_err!("metadata records must serialize to objects".to_owned()),
    }
}
