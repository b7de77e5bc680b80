//! Routes for the Matsight API

pub mod basic;
pub mod calculations;
pub mod detection;
pub mod storage;
