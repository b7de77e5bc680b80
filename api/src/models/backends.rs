//! Storage backend logic for the Matsight models
//!
//! Everything here follows one pipeline: serialize the payload, write the
//! artifact to s3, then upsert the metadata record that indexes it. The
//! artifact always lands first, so a fault between the two writes can only
//! ever orphan an artifact.

mod calculations;
mod detection;
mod records;
