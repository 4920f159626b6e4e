//! Input/output helpers.
//!
//! - delimited matrix ingest (`ingest`)
//! - CSV table exports (`export`)
//! - JSON run reports (`report_json`)

pub mod export;
pub mod ingest;
pub mod report_json;

pub use export::*;
pub use ingest::*;
pub use report_json::*;
