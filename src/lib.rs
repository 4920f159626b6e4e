//! `concord-fit` library crate.
//!
//! The binary (`cfit`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the fitting core (`data`, `fit`, `lp`, `criteria`) is usable without the CLI

pub mod app;
pub mod cli;
pub mod criteria;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod lp;
pub mod math;
pub mod report;
