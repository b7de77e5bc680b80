//! The adapter for the external MaskTerial model

use image::DynamicImage;
use tracing::instrument;

use crate::conf::Model;
use crate::internal_err;
use crate::models::Detections;
use crate::utils::ApiError;

/// Talks to a MaskTerial model server over http
pub struct ModelDetector {
    /// The inference endpoint for the model server
    endpoint: String,
    /// The http client used for inference calls
    client: reqwest::Client,
}

impl ModelDetector {
    /// Build the model adapter, verifying the weights path up front
    ///
    /// # Arguments
    ///
    /// * `conf` - The detector config options
    pub fn new(conf: &Model) -> Result<Self, ApiError> {
        // an explicit endpoint is required to select model detection
        let endpoint = match &conf.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => return internal_err!("Model detection requires a model endpoint".to_owned()),
        };
        // refuse to pretend a model exists when its weights are missing
        if !std::path::Path::new(&conf.path).is_dir() {
            return internal_err!(format!("Model path {} does not exist", conf.path));
        }
        Ok(ModelDetector {
            endpoint,
            client: reqwest::Client::new(),
        })
    }

    /// Run inference by posting the image to the model server
    ///
    /// The model's output is opaque to us; whatever it reports flows
    /// straight through to the caller.
    ///
    /// # Arguments
    ///
    /// * `image` - The image to analyze
    #[instrument(name = "ModelDetector::detect", skip_all, err(Debug))]
    pub async fn detect(&self, image: &DynamicImage) -> Result<Detections, ApiError> {
        // the model server takes a jpeg body and returns the detection json
        let mut data = std::io::Cursor::new(Vec::new());
        image.write_to(&mut data, image::ImageFormat::Jpeg)?;
        let resp = self
            .client
            .post(&self.endpoint)
            .header(http::header::CONTENT_TYPE, "image/jpeg")
            .body(data.into_inner())
            .send()
            .await?
            .error_for_status()?;
        let detections = resp.json::<Detections>().await?;
        Ok(detections)
    }
}
