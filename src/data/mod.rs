//! Dataset preparation: observation matrix -> predictors, response and
//! pairwise concordance signs.

pub mod prepare;

pub use prepare::*;
