//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - run configuration (`FitMode`, `FitConfig`, `FitParams`, `CriteriaConfig`)
//! - the raw observation matrix alias (`Matrix`)
//! - fit outputs (`FitResult`, `FitStats`)

pub mod types;

pub use types::*;
