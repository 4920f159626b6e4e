//! Mathematical utilities shared by the fitting and criteria code.

pub mod pairs;

pub use pairs::*;
