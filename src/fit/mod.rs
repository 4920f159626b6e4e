//! Fitting orchestration.
//!
//! Responsibilities:
//!
//! - build the LP for a model kind (`formulate`)
//! - solve once and summarise the solution (`fitter`, `aggregate`)
//! - sweep r and pick the ideal point (`r_grid`, `selection`)

pub mod aggregate;
pub mod control;
pub mod fitter;
pub mod formulate;
pub mod r_grid;
pub mod selection;

pub use control::CancelToken;
pub use fitter::*;
pub use selection::*;
