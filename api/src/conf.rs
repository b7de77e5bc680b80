//! The config for the Matsight API

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// The default interface to bind to
fn default_interface() -> String {
    "0.0.0.0".to_owned()
}

/// The default port to bind to
fn default_port() -> u16 {
    5000
}

/// The default bucket customer images and results are written to
fn default_bucket() -> String {
    "matsight-customer-images".to_owned()
}

/// The default aws region to talk to
fn default_region() -> String {
    "us-east-1".to_owned()
}

/// The default table metadata records are upserted into
fn default_table() -> String {
    "CustomerImages".to_owned()
}

/// The default path model weights are loaded from
fn default_model_path() -> String {
    "/opt/maskterial/models".to_owned()
}

/// The default local log level
fn default_level() -> String {
    "info".to_owned()
}

/// The settings for talking to s3
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3 {
    /// The bucket to write artifacts to
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// The region our bucket and table live in
    #[serde(default = "default_region")]
    pub region: String,
    /// An endpoint override for s3 compatible stores
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Whether to use path style bucket addressing
    #[serde(default)]
    pub use_path_style: bool,
    /// An explicit access key to use instead of the ambient credential chain
    #[serde(default)]
    pub access_key: Option<String>,
    /// An explicit secret to use instead of the ambient credential chain
    #[serde(default)]
    pub secret_token: Option<String>,
}

impl Default for S3 {
    /// Build a default s3 config
    fn default() -> Self {
        S3 {
            bucket: default_bucket(),
            region: default_region(),
            endpoint: None,
            use_path_style: false,
            access_key: None,
            secret_token: None,
        }
    }
}

/// The settings for talking to DynamoDB
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DynamoDb {
    /// The table metadata records are upserted into
    #[serde(default = "default_table")]
    pub table: String,
}

impl Default for DynamoDb {
    /// Build a default DynamoDB config
    fn default() -> Self {
        DynamoDb {
            table: default_table(),
        }
    }
}

/// Which detector implementation to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectorKind {
    /// The adapter for the external MaskTerial model
    Model,
    /// A mock that fabricates flakes
    #[default]
    Mock,
}

/// The settings for the flake detector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    /// The detector implementation to use
    #[serde(default)]
    pub detector: DetectorKind,
    /// The path model weights are loaded from
    #[serde(default = "default_model_path")]
    pub path: String,
    /// The inference endpoint for the model server
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl Default for Model {
    /// Build a default model config
    fn default() -> Self {
        Model {
            detector: DetectorKind::default(),
            path: default_model_path(),
            endpoint: None,
        }
    }
}

/// The cors settings for the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cors {
    /// Whether to allow all origins
    #[serde(default = "crate::conf::Cors::default_insecure")]
    pub insecure: bool,
    /// The domains to allow when not running insecurely
    #[serde(default)]
    pub domains: Vec<String>,
}

impl Cors {
    /// CORS is open by default since the original service ran behind a dev gateway
    fn default_insecure() -> bool {
        true
    }
}

impl Default for Cors {
    /// Build a default cors config
    fn default() -> Self {
        Cors {
            insecure: Cors::default_insecure(),
            domains: Vec::default(),
        }
    }
}

/// The tracing settings for the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tracing {
    /// The log level to use when RUST_LOG is not set
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for Tracing {
    /// Build a default tracing config
    fn default() -> Self {
        Tracing {
            level: default_level(),
        }
    }
}

/// The Matsight specific settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Matsight {
    /// The interface to bind to
    #[serde(default = "default_interface")]
    pub interface: String,
    /// The port to bind to
    #[serde(default = "default_port")]
    pub port: u16,
    /// The s3 settings
    #[serde(default)]
    pub s3: S3,
    /// The DynamoDB settings
    #[serde(default)]
    pub dynamodb: DynamoDb,
    /// The detector settings
    #[serde(default)]
    pub model: Model,
    /// The cors settings
    #[serde(default)]
    pub cors: Cors,
    /// The tracing settings
    #[serde(default)]
    pub tracing: Tracing,
}

impl Default for Matsight {
    /// Build a default Matsight config
    fn default() -> Self {
        Matsight {
            interface: default_interface(),
            port: default_port(),
            s3: S3::default(),
            dynamodb: DynamoDb::default(),
            model: Model::default(),
            cors: Cors::default(),
            tracing: Tracing::default(),
        }
    }
}

/// The config for the Matsight API
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Conf {
    /// The Matsight specific settings
    #[serde(default)]
    pub matsight: Matsight,
}

impl Conf {
    /// Load a config from a file and the environment
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the config file to load
    pub fn new(path: &str) -> Result<Self, ConfigError> {
        // build our config from an optional file and any MATSIGHT_ env vars
        let mut conf: Conf = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("MATSIGHT").separator("__"))
            .build()?
            .try_deserialize()?;
        // apply the well known env vars on top of the file settings
        conf.env_overrides();
        Ok(conf)
    }

    /// Apply the well known environment variables
    ///
    /// These are read exactly once at process start.
    fn env_overrides(&mut self) {
        if let Ok(bucket) = std::env::var("S3_BUCKET_NAME") {
            self.matsight.s3.bucket = bucket;
        }
        if let Ok(table) = std::env::var("DYNAMODB_TABLE_NAME") {
            self.matsight.dynamodb.table = table;
        }
        if let Ok(region) = std::env::var("AWS_DEFAULT_REGION") {
            self.matsight.s3.region = region;
        }
        if let Ok(path) = std::env::var("MODEL_PATH") {
            self.matsight.model.path = path;
        }
        if let Ok(port) = std::env::var("PORT")
            && let Ok(port) = port.parse()
        {
            self.matsight.port = port;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Make sure an empty config lands on the original service defaults
    #[test]
    fn defaults() {
        let conf = Conf::default();
        assert_eq!(conf.matsight.interface, "0.0.0.0");
        assert_eq!(conf.matsight.port, 5000);
        assert_eq!(conf.matsight.s3.bucket, "matsight-customer-images");
        assert_eq!(conf.matsight.s3.region, "us-east-1");
        assert_eq!(conf.matsight.dynamodb.table, "CustomerImages");
        assert_eq!(conf.matsight.model.path, "/opt/maskterial/models");
        assert_eq!(conf.matsight.model.detector, DetectorKind::Mock);
    }
}
