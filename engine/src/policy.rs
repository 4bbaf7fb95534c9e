//! Heating/cooling drive derivation with a deadband around the setpoint.
//!
//! The deadband keeps the outputs from oscillating on small fluctuations:
//! within ±0.5 °C of the target nothing runs. Outside it, drive ramps at
//! 25%/°C, so 4 °C beyond the deadband saturates at 100%.

use serde::Serialize;

use crate::comfort;

/// Tolerance band around the setpoint. Not user-configurable.
pub const DEADBAND_C: f64 = 0.5;
/// Output percent per degree beyond the deadband. Fixed by design;
/// expected outputs elsewhere depend on this exact value.
const OUTPUT_GAIN_PER_DEG: f64 = 25.0;

/// Raw policy result for one (perceived, target) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyOutput {
    pub heating: f64,
    pub cooling: f64,
    pub reasoning: String,
}

/// The full decision record: drive outputs plus the diagnostic values the
/// rest of the system displays. Always replaced as a whole, never patched
/// field by field.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ControlDecision {
    pub heating_output: f64,
    pub cooling_output: f64,
    pub reasoning: String,
    pub perceived_temperature: f64,
    pub temperature_difference: f64,
    pub humidity_reasoning: String,
}

/// Derive heating/cooling drive from a perceived temperature.
///
/// At most one of the two outputs is non-zero; both are clamped to
/// [0, 100]. A difference of exactly ±deadband still counts as idle.
pub fn control_outputs(perceived: f64, target: f64, deadband: f64) -> PolicyOutput {
    let diff = target - perceived;

    if diff > deadband {
        PolicyOutput {
            heating: ((diff - deadband) * OUTPUT_GAIN_PER_DEG).clamp(0.0, 100.0),
            cooling: 0.0,
            reasoning: format!(
                "Heating: Effective temperature {:.1}°C is below the target of {:.1}°C by more than the {}°C deadband.",
                perceived, target, deadband
            ),
        }
    } else if diff < -deadband {
        PolicyOutput {
            heating: 0.0,
            cooling: ((diff.abs() - deadband) * OUTPUT_GAIN_PER_DEG).clamp(0.0, 100.0),
            reasoning: format!(
                "Cooling: Effective temperature {:.1}°C is above the target of {:.1}°C by more than the {}°C deadband.",
                perceived, target, deadband
            ),
        }
    } else {
        PolicyOutput {
            heating: 0.0,
            cooling: 0.0,
            reasoning: format!(
                "Idle: Effective temperature {:.1}°C is within ±{}°C of the target {:.1}°C.",
                perceived, deadband, target
            ),
        }
    }
}

/// Run the whole pipeline for one set of inputs: perceived temperature
/// first, then the deadband policy, returned as one consistent record.
pub fn decide(sensed: f64, humidity: f64, target: f64) -> ControlDecision {
    let perceived = comfort::perceived_temperature(sensed, humidity);
    let output = control_outputs(perceived.value, target, DEADBAND_C);

    ControlDecision {
        heating_output: output.heating,
        cooling_output: output.cooling,
        reasoning: output.reasoning,
        perceived_temperature: perceived.value,
        temperature_difference: target - perceived.value,
        humidity_reasoning: perceived.reasoning,
    }
}
