//! Humidity-adjusted "feels like" temperature.
//!
//! High humidity makes a room feel warmer than the sensor reads, dry air
//! cooler. The adjustment is linear outside the 40-60% comfort band at
//! 0.05 °C per percentage point.

/// Lower edge of the comfort band; below it dry air feels cooler.
const IDEAL_HUMIDITY_LOW: f64 = 40.0;
/// Upper edge of the comfort band; above it humid air feels warmer.
const IDEAL_HUMIDITY_HIGH: f64 = 60.0;
/// Degrees of perceived shift per percentage point outside the band.
const ADJUST_PER_PCT: f64 = 0.05;

/// A perceived temperature and the sentence explaining how it was derived.
#[derive(Debug, Clone, PartialEq)]
pub struct PerceivedTemperature {
    pub value: f64,
    pub reasoning: String,
}

/// Derive the perceived temperature from a sensed reading.
///
/// Humidity exactly at 40% or 60% counts as inside the comfort band and
/// leaves the reading unchanged.
pub fn perceived_temperature(sensed: f64, humidity: f64) -> PerceivedTemperature {
    if humidity > IDEAL_HUMIDITY_HIGH {
        let adjustment = (humidity - IDEAL_HUMIDITY_HIGH) * ADJUST_PER_PCT;
        PerceivedTemperature {
            value: sensed - adjustment,
            reasoning: format!(
                "Feels {:.1}°C warmer due to high humidity ({}%)",
                adjustment, humidity
            ),
        }
    } else if humidity < IDEAL_HUMIDITY_LOW {
        let adjustment = (IDEAL_HUMIDITY_LOW - humidity) * ADJUST_PER_PCT;
        PerceivedTemperature {
            value: sensed + adjustment,
            reasoning: format!(
                "Feels {:.1}°C cooler due to low humidity ({}%)",
                adjustment, humidity
            ),
        }
    } else {
        PerceivedTemperature {
            value: sensed,
            reasoning:
                "Humidity is in the ideal range (40-60%). No perceived temperature adjustment."
                    .to_string(),
        }
    }
}
