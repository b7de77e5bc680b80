//! Shared objects for the Matsight API

use std::sync::Arc;
use tracing::{Level, event, instrument};

use super::{S3Client, TableClient};
use crate::conf::Conf;
use crate::detect::Detector;

/// The storage backends for artifacts and metadata records
///
/// This only exists when both backends answered their probes at process
/// start; otherwise persistence is disabled for the life of the process.
pub struct Storage {
    /// The client for the artifact bucket
    pub s3: S3Client,
    /// The client for the metadata record table
    pub table: TableClient,
}

impl Storage {
    /// Build the storage clients and probe both backends once
    ///
    /// # Arguments
    ///
    /// * `config` - The Matsight config
    #[instrument(name = "Storage::probe", skip_all)]
    pub async fn probe(config: &Conf) -> Option<Storage> {
        // load the ambient aws config with our configured region
        let sdk = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_types::region::Region::new(
                config.matsight.s3.region.clone(),
            ))
            .load()
            .await;
        // build our clients off of the shared sdk config
        let s3 = S3Client::new(&config.matsight.s3.bucket, &config.matsight.s3, &sdk);
        let table = TableClient::new(&config.matsight.dynamodb.table, &sdk);
        // make sure our bucket is reachable
        if let Err(error) = s3.probe().await {
            event!(
                Level::WARN,
                bucket = %s3.bucket,
                error = %error,
                msg = "S3 bucket is not accessible; storage disabled"
            );
            return None;
        }
        // make sure our table is reachable
        if let Err(error) = table.probe().await {
            event!(
                Level::WARN,
                table = %table.table,
                error = %error,
                msg = "DynamoDB table is not accessible; storage disabled"
            );
            return None;
        }
        event!(
            Level::INFO,
            bucket = %s3.bucket,
            table = %table.table,
            msg = "Storage backends are accessible"
        );
        Some(Storage { s3, table })
    }
}

/// Shared objects constructed once at process start and passed by
/// reference into every handler
pub struct Shared {
    /// The Matsight config
    pub config: Conf,
    /// The storage backends if they were reachable at process start
    pub storage: Option<Storage>,
    /// The flake detector
    pub detector: Detector,
}

impl Shared {
    /// Build the shared objects for the API
    ///
    /// # Arguments
    ///
    /// * `config` - The Matsight config
    pub async fn new(config: Conf) -> Shared {
        // select our detector from the config
        let detector = Detector::new(&config);
        // build and probe our storage backends
        let storage = Storage::probe(&config).await;
        Shared {
            config,
            storage,
            detector,
        }
    }
}

/// The state shared across all routes
#[derive(Clone)]
pub struct AppState {
    /// Shared Matsight objects
    pub shared: Arc<Shared>,
}

impl AppState {
    /// Build the state for our app
    ///
    /// # Arguments
    ///
    /// * `shared` - Shared Matsight objects
    #[must_use]
    pub fn new(shared: Shared) -> Self {
        AppState {
            shared: Arc::new(shared),
        }
    }
}
