//! Data models for ccparse.

pub mod config;
pub mod record;

pub use config::CcparseConfig;
pub use record::{ExtractedRecord, Field};
