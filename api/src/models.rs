//! Data models for the Matsight API

mod backends;
mod calculations;
mod detection;
mod records;

pub use calculations::{
    CalcValue, Calculation, CalculationError, CalculationResponse, FailedCalculation, MathOp,
};
pub use detection::{
    DetectFromS3Request, DetectionJob, DetectionResponse, Detections, Flake, S3Keys,
};
pub use records::{MetadataRecord, PersistOutcome, RecordStatus, RecordType, StorageStatus};
