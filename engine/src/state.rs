//! The single owned application state. Everything mutable lives here,
//! behind whatever lock the controller chooses; no ambient globals.

use std::collections::VecDeque;

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::event::{Notification, NotificationRecord};
use crate::policy::{self, ControlDecision};
use crate::schedule::ScheduleEntry;

pub const DEFAULT_TEMPERATURE_C: f64 = 22.0;
pub const DEFAULT_HUMIDITY_PCT: f64 = 45.0;
pub const DEFAULT_TARGET_C: f64 = 20.0;
pub const DEFAULT_LOCATION: &str = "Vienna";

/// Recent notifications kept for the status surface.
const NOTIFICATION_CAPACITY: usize = 32;

/// Where the current readings come from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Readings edited by hand (or by the simulated approach).
    Manual,
    /// Readings supplied by the live weather collaborator.
    Weather,
}

/// Full thermostat state: readings, setpoint, schedule, collaborator
/// flags, the last control decision, and recent notifications.
#[derive(Debug, Clone, Serialize)]
pub struct ThermostatState {
    pub current_temperature: f64,
    pub current_humidity: f64,
    pub target_temperature: f64,
    pub schedule: Vec<ScheduleEntry>,
    pub data_source: DataSource,
    pub location_query: String,
    pub fetched_location: Option<String>,
    pub fetching_weather: bool,
    pub weather_error: Option<String>,
    pub simulating: bool,
    pub decision: ControlDecision,
    pub notifications: VecDeque<NotificationRecord>,
}

impl Default for ThermostatState {
    fn default() -> Self {
        ThermostatState {
            current_temperature: DEFAULT_TEMPERATURE_C,
            current_humidity: DEFAULT_HUMIDITY_PCT,
            target_temperature: DEFAULT_TARGET_C,
            schedule: Vec::new(),
            data_source: DataSource::Manual,
            location_query: DEFAULT_LOCATION.to_string(),
            fetched_location: None,
            fetching_weather: false,
            weather_error: None,
            simulating: false,
            decision: policy::decide(DEFAULT_TEMPERATURE_C, DEFAULT_HUMIDITY_PCT, DEFAULT_TARGET_C),
            notifications: VecDeque::new(),
        }
    }
}

impl ThermostatState {
    /// Re-run the decision pipeline over the current inputs. The decision
    /// record is replaced as a whole.
    pub fn refresh_decision(&mut self) {
        self.decision = policy::decide(
            self.current_temperature,
            self.current_humidity,
            self.target_temperature,
        );
    }

    /// Append a notification to the bounded recent-events list.
    pub fn record(&mut self, event: Notification) {
        self.notifications.push_back(NotificationRecord {
            timestamp: Local::now().timestamp(),
            message: event.to_string(),
            event,
        });
        while self.notifications.len() > NOTIFICATION_CAPACITY {
            self.notifications.pop_front();
        }
    }

    /// Whether manual reading edits (and simulation start) are currently
    /// locked out: readings are externally supplied, a fetch is in flight,
    /// or a simulation run owns them.
    pub fn manual_controls_locked(&self) -> bool {
        self.data_source != DataSource::Manual || self.fetching_weather || self.simulating
    }
}
