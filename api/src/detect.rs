//! Flake detection for the Matsight API
//!
//! There is exactly one detection capability and exactly two
//! implementations of it, selected by config and never by runtime
//! introspection of the model library.

mod annotate;
mod mock;
mod model;

pub use annotate::annotate;
pub use mock::MockDetector;
pub use model::ModelDetector;

use image::DynamicImage;
use tracing::{Level, event};

use crate::conf::{Conf, DetectorKind};
use crate::models::Detections;
use crate::utils::ApiError;

/// The flake detector for this process
pub enum Detector {
    /// The adapter for the external MaskTerial model
    Model(ModelDetector),
    /// A mock that fabricates flakes
    Mock(MockDetector),
}

impl Detector {
    /// Select a detector from the config
    ///
    /// The service degrades to mock detection rather than refusing to start
    /// when the model adapter cannot be built.
    ///
    /// # Arguments
    ///
    /// * `config` - The Matsight config
    #[must_use]
    pub fn new(config: &Conf) -> Detector {
        match config.matsight.model.detector {
            DetectorKind::Model => match ModelDetector::new(&config.matsight.model) {
                Ok(model) => Detector::Model(model),
                Err(error) => {
                    event!(
                        Level::WARN,
                        error = %error,
                        msg = "Failed to build the model detector; falling back to mock detection"
                    );
                    Detector::Mock(MockDetector::default())
                }
            },
            DetectorKind::Mock => Detector::Mock(MockDetector::default()),
        }
    }

    /// Detect flakes in an image
    ///
    /// # Arguments
    ///
    /// * `image` - The image to analyze
    pub async fn detect(&self, image: &DynamicImage) -> Result<Detections, ApiError> {
        match self {
            Detector::Model(model) => model.detect(image).await,
            Detector::Mock(mock) => Ok(mock.detect(image)),
        }
    }

    /// Whether the external model is wired up
    #[must_use]
    pub fn model_available(&self) -> bool {
        matches!(self, Detector::Model(_))
    }
}
