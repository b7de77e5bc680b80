//! Handles writing artifacts to s3

use aws_credential_types::provider::SharedCredentialsProvider;
use aws_sdk_s3::operation::head_object::HeadObjectError;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::{Client, config::Credentials};
use std::time::Duration;
use tracing::instrument;

use super::ApiError;
use crate::{bad, internal_err};

pub struct S3Client {
    /// The bucket to write artifacts to
    pub bucket: String,
    /// The aws sdk s3 client
    pub client: Client,
}

impl S3Client {
    /// Builds a new s3 client
    ///
    /// # Arguments
    ///
    /// * `bucket` - The bucket to write artifacts to
    /// * `conf` - The s3 config options
    /// * `sdk` - The shared sdk config to inherit http and retry settings from
    #[must_use]
    pub fn new(bucket: &str, conf: &crate::conf::S3, sdk: &aws_config::SdkConfig) -> Self {
        // start from the shared sdk config so transport settings carry over
        let mut builder =
            aws_sdk_s3::config::Builder::from(sdk).force_path_style(conf.use_path_style);
        // if explicit keys were configured then prefer them over the ambient chain
        if let (Some(access), Some(secret)) = (&conf.access_key, &conf.secret_token) {
            let creds = Credentials::new(access, secret, None, None, "Matsight");
            builder = builder.credentials_provider(SharedCredentialsProvider::new(creds));
        }
        // if we have an endpoint override then add that to our config
        if let Some(endpoint) = &conf.endpoint {
            builder = builder.endpoint_url(endpoint);
        }
        // set our region
        builder = builder.region(aws_types::region::Region::new(conf.region.clone()));
        // build our s3 client
        let client = Client::from_conf(builder.build());
        S3Client {
            bucket: bucket.to_owned(),
            client,
        }
    }

    /// Write an artifact to s3
    ///
    /// The write either fully lands or errors; artifacts are never updated
    /// in place and failures propagate immediately with no retries.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to write this artifact to
    /// * `data` - The artifact bytes
    /// * `content_type` - The content type to set for this artifact
    #[instrument(name = "S3Client::upload", skip(self, data), err(Debug))]
    pub async fn upload(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<(), ApiError> {
        // ban any keys that might contain traversal attacks
        if key.contains("..") {
            return bad!("S3 keys cannot contain '..'".to_owned());
        }
        // write this artifact to s3
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .send()
            .await?;
        Ok(())
    }

    /// Download an artifact from s3
    ///
    /// # Arguments
    ///
    /// * `key` - The key to an artifact in s3
    #[instrument(name = "S3Client::download", skip(self), err(Debug))]
    pub async fn download(&self, key: &str) -> Result<Vec<u8>, ApiError> {
        // get this artifact from s3
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await?;
        // collect the body into memory
        let data = resp.body.collect().await?;
        Ok(data.into_bytes().to_vec())
    }

    /// Check if an artifact exists in s3 by key
    ///
    /// # Arguments
    ///
    /// * `key` - The key to check against
    #[instrument(name = "S3Client::exists", skip(self), err(Debug))]
    pub async fn exists(&self, key: &str) -> Result<bool, ApiError> {
        // head this key to see if it exists
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(sdk_err) => match sdk_err.into_service_error() {
                HeadObjectError::NotFound(_) => Ok(false),
                err => internal_err!(format!("{err:?}")),
            },
        }
    }

    /// Check that our bucket is reachable
    #[instrument(name = "S3Client::probe", skip(self), err(Debug))]
    pub async fn probe(&self) -> Result<(), ApiError> {
        // head our bucket to make sure it exists and we can reach it
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await?;
        Ok(())
    }

    /// Build a time limited url for retrieving an artifact
    ///
    /// # Arguments
    ///
    /// * `key` - The key to an artifact in s3
    /// * `expires_in` - How many seconds the url stays valid for
    #[instrument(name = "S3Client::presign", skip(self), err(Debug))]
    pub async fn presign(&self, key: &str, expires_in: u64) -> Result<String, ApiError> {
        // build the presigning settings for this url
        let presigning = PresigningConfig::expires_in(Duration::from_secs(expires_in))?;
        // sign a get request for this artifact
        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await?;
        Ok(presigned.uri().to_string())
    }
}
