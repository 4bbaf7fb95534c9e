use serde::Serialize;
use std::fmt;

/// Discrete user-facing events emitted by the controller.
///
/// The display text is what a notification surface would show; the
/// structured fields ride along for clients that render their own copy.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    ScheduleApplied { name: String, temperature: f64 },
    ScheduleAdded { name: String },
    ScheduleUpdated { name: String },
    ScheduleDeleted { name: String },
    WeatherFetched { temperature: f64, humidity: f64, location: String },
    WeatherError { message: String },
    AlreadyAtTarget,
    Reset,
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Notification::ScheduleApplied { name, temperature } => {
                write!(f, "Temperature set to {}°C by '{}' schedule.", temperature, name)
            }
            Notification::ScheduleAdded { name } => write!(f, "'{}' schedule created.", name),
            Notification::ScheduleUpdated { name } => write!(f, "'{}' schedule modified.", name),
            Notification::ScheduleDeleted { name } => write!(f, "'{}' schedule removed.", name),
            Notification::WeatherFetched { temperature, humidity, location } => {
                write!(f, "Temp: {}°C, Hum: {}% ({})", temperature, humidity, location)
            }
            Notification::WeatherError { message } => write!(f, "{}", message),
            Notification::AlreadyAtTarget => {
                write!(f, "Current temperature is already at the desired temperature.")
            }
            Notification::Reset => write!(f, "All values reset to defaults."),
        }
    }
}

/// A notification together with the wall-clock second it was recorded.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NotificationRecord {
    pub timestamp: i64,
    pub message: String,
    pub event: Notification,
}
