//! Step logic for the simulated approach of the current temperature toward
//! the setpoint. The timer that drives it lives in the server's controller;
//! this module is the pure per-tick computation.

/// Degrees moved per tick.
pub const STEP_DEG_C: f64 = 0.1;
/// Milliseconds between ticks.
pub const TICK_INTERVAL_MS: u64 = 500;

/// Result of one simulation tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// Moved one step; the run continues.
    Stepped(f64),
    /// Within one step of the target: snapped to it exactly, run over.
    Converged(f64),
}

/// Whether a reading is already close enough to the target that a
/// simulation run would be pointless.
pub fn at_target(current: f64, target: f64) -> bool {
    (target - current).abs() < STEP_DEG_C
}

/// Advance the current temperature one tick toward the target.
///
/// The stepped value is rounded to one decimal place so repeated steps
/// land on clean tenths instead of accumulating float noise.
pub fn step_toward(current: f64, target: f64) -> StepOutcome {
    let diff = target - current;
    if diff.abs() < STEP_DEG_C {
        StepOutcome::Converged(target)
    } else if diff > 0.0 {
        StepOutcome::Stepped(round_tenth(current + STEP_DEG_C))
    } else {
        StepOutcome::Stepped(round_tenth(current - STEP_DEG_C))
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
