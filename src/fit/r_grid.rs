//! Trade-off parameter grid.
//!
//! r values are handled as integer hundredths ("steps") so the grid is exact:
//! step 30 is r = 0.30, and "r is a multiple of 0.1" is `step % 10 == 0`.

use std::ops::RangeInclusive;

use crate::error::FitError;

/// Steps per unit of r.
pub const STEPS_PER_UNIT: u32 = 100;

/// Convert a step to its r value.
pub fn step_to_r(step: u32) -> f64 {
    f64::from(step) / f64::from(STEPS_PER_UNIT)
}

/// Steps probed for a non-trivial solution: r = 0.01 ..= 0.99.
pub fn probe_steps() -> RangeInclusive<u32> {
    1..=STEPS_PER_UNIT - 1
}

/// Steps of the full sweep: r = left ..= 1.00.
pub fn sweep_steps(left: u32) -> Result<RangeInclusive<u32>, FitError> {
    if left == 0 || left > STEPS_PER_UNIT {
        return Err(FitError::shape(format!(
            "sweep start {} is outside 0.01..=1.00",
            step_to_r(left)
        )));
    }
    Ok(left..=STEPS_PER_UNIT)
}

/// True when `step` is a whole tenth of r.
pub fn is_tenth(step: u32) -> bool {
    step % 10 == 0
}
