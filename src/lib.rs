// Library root — exposes the classifier, the query pipeline and the study-aid
// generators to the binary and to integration tests.

#[cfg(feature = "http-api")]
pub mod api;
pub mod classifier;
pub mod config;
pub mod error;
pub mod generate;
pub mod llm;
pub mod logger;
pub mod query;
pub mod structured;

pub use classifier::{QueryKind, ResponseProfile, classify};
