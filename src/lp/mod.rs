//! Linear programming: a solver-independent program description and the
//! solvers that can optimise it.

pub mod program;
pub mod solver;

pub use program::*;
pub use solver::*;
