//! The orchestrator. Owns the thermostat state and the two periodic
//! tasks (schedule resolution, simulated approach), and re-runs the
//! decision pipeline after every mutation.
//!
//! Both tickers are held as `JoinHandle`s; spawning a new run of either
//! first aborts the previous handle, and every stop path aborts the
//! pending ticker so nothing keeps mutating state after a logical stop.

use std::sync::Arc;
use std::time::Duration;

use log::{error, info, warn};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time;
use uuid::Uuid;

use thermostat_engine::error::EngineError;
use thermostat_engine::event::Notification;
use thermostat_engine::schedule::{self, ScheduleEntry};
use thermostat_engine::simulation::{self, StepOutcome};
use thermostat_engine::state::{DataSource, ThermostatState, DEFAULT_LOCATION};

use crate::weather::WeatherProvider;

/// How often the active schedule entry is re-resolved.
const SCHEDULE_RESOLVE_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct Thermostat {
    state: Arc<Mutex<ThermostatState>>,
    weather: Arc<dyn WeatherProvider>,
    sim_ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    schedule_ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    sim_tick: Duration,
    schedule_tick: Duration,
}

impl Thermostat {
    pub fn new(weather: Arc<dyn WeatherProvider>) -> Self {
        Thermostat {
            state: Arc::new(Mutex::new(ThermostatState::default())),
            weather,
            sim_ticker: Arc::new(Mutex::new(None)),
            schedule_ticker: Arc::new(Mutex::new(None)),
            sim_tick: Duration::from_millis(simulation::TICK_INTERVAL_MS),
            schedule_tick: SCHEDULE_RESOLVE_INTERVAL,
        }
    }

    pub async fn snapshot(&self) -> ThermostatState {
        self.state.lock().await.clone()
    }

    /// Nudge the manually controlled temperature reading.
    pub async fn adjust_temperature(&self, delta: f64) -> Result<(), EngineError> {
        let mut st = self.state.lock().await;
        if st.manual_controls_locked() {
            warn!("temperature adjustment rejected: manual controls locked");
            return Err(EngineError::Precondition(
                "manual reading controls are currently disabled".to_string(),
            ));
        }
        st.current_temperature += delta;
        st.refresh_decision();
        Ok(())
    }

    /// Nudge the manually controlled humidity reading, clamped to [0, 100].
    pub async fn adjust_humidity(&self, delta: f64) -> Result<(), EngineError> {
        let mut st = self.state.lock().await;
        if st.manual_controls_locked() {
            warn!("humidity adjustment rejected: manual controls locked");
            return Err(EngineError::Precondition(
                "manual reading controls are currently disabled".to_string(),
            ));
        }
        st.current_humidity = (st.current_humidity + delta).clamp(0.0, 100.0);
        st.refresh_decision();
        Ok(())
    }

    /// Set the desired temperature. Always accepted; a running simulation
    /// picks the new value up on its next tick.
    pub async fn set_target(&self, temperature: f64) {
        let mut st = self.state.lock().await;
        st.target_temperature = temperature;
        st.refresh_decision();
        info!("target temperature set to {}°C", temperature);
    }

    pub async fn add_schedule_entry(
        &self,
        name: String,
        time: String,
        temperature: f64,
    ) -> Result<ScheduleEntry, EngineError> {
        let entry = ScheduleEntry::new(name, time, temperature)?;
        {
            let mut st = self.state.lock().await;
            st.schedule.push(entry.clone());
            st.record(Notification::ScheduleAdded { name: entry.name.clone() });
        }
        info!("schedule entry '{}' added at {}", entry.name, entry.time);
        self.resolve_schedule_now().await;
        self.respawn_schedule_ticker().await;
        Ok(entry)
    }

    pub async fn update_schedule_entry(
        &self,
        id: Uuid,
        name: String,
        time: String,
        temperature: f64,
    ) -> Result<(), EngineError> {
        schedule::validate_hhmm(&time)?;
        {
            let mut st = self.state.lock().await;
            let entry = st
                .schedule
                .iter_mut()
                .find(|e| e.id == id)
                .ok_or_else(|| EngineError::InvalidInput(format!("unknown schedule entry {}", id)))?;
            entry.name = name.clone();
            entry.time = time;
            entry.temperature = temperature;
            st.record(Notification::ScheduleUpdated { name });
        }
        self.resolve_schedule_now().await;
        self.respawn_schedule_ticker().await;
        Ok(())
    }

    pub async fn delete_schedule_entry(&self, id: Uuid) -> Result<(), EngineError> {
        let schedule_empty = {
            let mut st = self.state.lock().await;
            let index = st
                .schedule
                .iter()
                .position(|e| e.id == id)
                .ok_or_else(|| EngineError::InvalidInput(format!("unknown schedule entry {}", id)))?;
            let removed = st.schedule.remove(index);
            st.record(Notification::ScheduleDeleted { name: removed.name });
            st.schedule.is_empty()
        };
        if schedule_empty {
            self.cancel_schedule_ticker().await;
        } else {
            self.resolve_schedule_now().await;
            self.respawn_schedule_ticker().await;
        }
        Ok(())
    }

    /// Switch where readings come from. Leaving manual mode cancels any
    /// running simulation; entering weather mode fetches immediately.
    pub async fn set_data_source(&self, source: DataSource) {
        let (was_simulating, location) = {
            let mut st = self.state.lock().await;
            if st.data_source == source {
                return;
            }
            let was_simulating = st.simulating;
            if source != DataSource::Manual && st.simulating {
                st.simulating = false;
            }
            st.data_source = source;
            (was_simulating, st.location_query.clone())
        };
        if was_simulating && source != DataSource::Manual {
            self.cancel_sim_ticker().await;
            info!("simulation cancelled: reading source changed");
        }
        if source == DataSource::Weather {
            self.spawn_fetch(location);
        }
    }

    /// Update the location query; in weather mode this re-fetches at once.
    pub async fn set_location(&self, query: String) {
        let source = {
            let mut st = self.state.lock().await;
            st.location_query = query.clone();
            st.data_source
        };
        if source == DataSource::Weather {
            self.spawn_fetch(query);
        }
    }

    /// Start a simulated approach of the current temperature toward the
    /// target. Rejected while readings are not manually controlled, while
    /// a weather fetch is in flight, or when already at the target; a
    /// second start while running is a no-op.
    pub async fn start_simulation(&self) -> Result<(), EngineError> {
        {
            let mut st = self.state.lock().await;
            if st.simulating {
                return Ok(());
            }
            if st.data_source != DataSource::Manual {
                warn!("simulation start rejected: readings are externally supplied");
                return Err(EngineError::Precondition(
                    "simulation requires manually controlled readings".to_string(),
                ));
            }
            if st.fetching_weather {
                warn!("simulation start rejected: weather fetch in progress");
                return Err(EngineError::Precondition(
                    "weather fetch in progress".to_string(),
                ));
            }
            if simulation::at_target(st.current_temperature, st.target_temperature) {
                st.record(Notification::AlreadyAtTarget);
                return Err(EngineError::Precondition(
                    "Current temperature is already at the desired temperature.".to_string(),
                ));
            }
            st.simulating = true;
        }
        self.spawn_sim_ticker().await;
        info!("simulation started");
        Ok(())
    }

    pub async fn stop_simulation(&self) {
        let was_running = {
            let mut st = self.state.lock().await;
            let was = st.simulating;
            st.simulating = false;
            was
        };
        self.cancel_sim_ticker().await;
        if was_running {
            info!("simulation stopped");
        }
    }

    /// Restore all defaults, cancel both tickers, and re-fetch for the
    /// default location if readings were externally supplied before.
    pub async fn reset(&self) {
        self.cancel_sim_ticker().await;
        self.cancel_schedule_ticker().await;
        let prior_source = {
            let mut st = self.state.lock().await;
            let prior = st.data_source;
            *st = ThermostatState::default();
            st.record(Notification::Reset);
            prior
        };
        info!("state reset to defaults");
        if prior_source == DataSource::Weather {
            self.spawn_fetch(DEFAULT_LOCATION.to_string());
        }
    }

    /// Resolve the active schedule entry against the current wall clock
    /// and apply its temperature if it differs from the target.
    ///
    /// Skipped entirely while a simulation runs: the schedule and the
    /// simulated approach would otherwise fight over the setpoint. The
    /// check lives here, not in timer bookkeeping, so the two tickers can
    /// coexist safely.
    pub async fn resolve_schedule_now(&self) {
        let mut st = self.state.lock().await;
        if st.simulating || st.schedule.is_empty() {
            return;
        }
        let now = schedule::local_hhmm();
        let applied = schedule::resolve_active(&st.schedule, &now)
            .filter(|entry| entry.temperature != st.target_temperature)
            .map(|entry| (entry.name.clone(), entry.temperature));
        if let Some((name, temperature)) = applied {
            st.target_temperature = temperature;
            st.refresh_decision();
            info!("schedule '{}' applied: target {}°C", name, temperature);
            st.record(Notification::ScheduleApplied { name, temperature });
        }
    }

    fn spawn_fetch(&self, location: String) {
        let ctrl = self.clone();
        tokio::spawn(async move {
            ctrl.run_fetch(location).await;
        });
    }

    async fn run_fetch(&self, location: String) {
        let trimmed = location.trim().to_string();
        if trimmed.is_empty() {
            let mut st = self.state.lock().await;
            st.weather_error = Some("Please enter a city name.".to_string());
            st.record(Notification::WeatherError {
                message: "City name cannot be empty to fetch live weather.".to_string(),
            });
            warn!("weather fetch skipped: empty location query");
            return;
        }

        {
            let mut st = self.state.lock().await;
            st.fetching_weather = true;
            st.weather_error = None;
            st.fetched_location = None;
        }

        info!("fetching current weather for '{}'", trimmed);
        let result = self.weather.fetch_current(&trimmed).await;

        let mut st = self.state.lock().await;
        st.fetching_weather = false;
        match result {
            Ok(observation) => {
                st.current_temperature = observation.temperature;
                st.current_humidity = observation.humidity;
                st.fetched_location = Some(observation.location_name.clone());
                st.refresh_decision();
                info!(
                    "weather for '{}': {}°C at {}% humidity",
                    observation.location_name, observation.temperature, observation.humidity
                );
                st.record(Notification::WeatherFetched {
                    temperature: observation.temperature,
                    humidity: observation.humidity,
                    location: observation.location_name,
                });
            }
            Err(err) => {
                let failure = EngineError::FetchFailed(err.to_string());
                let message = failure.to_string();
                error!("weather fetch for '{}' failed: {}", trimmed, message);
                st.weather_error = Some(message.clone());
                st.record(Notification::WeatherError { message });
            }
        }
    }

    async fn spawn_sim_ticker(&self) {
        let mut guard = self.sim_ticker.lock().await;
        if let Some(handle) = guard.take() {
            handle.abort();
        }

        let ctrl = self.clone();
        let tick = self.sim_tick;
        *guard = Some(tokio::spawn(async move {
            let mut ticker = time::interval(tick);
            // An interval yields immediately; consume that so the first
            // step lands one full tick after start.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let mut st = ctrl.state.lock().await;
                if !st.simulating {
                    break;
                }
                // The target is read live each tick, so mid-run setpoint
                // changes redirect the approach without a restart.
                match simulation::step_toward(st.current_temperature, st.target_temperature) {
                    StepOutcome::Stepped(next) => {
                        st.current_temperature = next;
                        st.refresh_decision();
                    }
                    StepOutcome::Converged(target) => {
                        st.current_temperature = target;
                        st.simulating = false;
                        st.refresh_decision();
                        info!("simulation converged at {}°C", target);
                        break;
                    }
                }
            }
        }));
    }

    async fn cancel_sim_ticker(&self) {
        if let Some(handle) = self.sim_ticker.lock().await.take() {
            handle.abort();
        }
    }

    async fn respawn_schedule_ticker(&self) {
        let mut guard = self.schedule_ticker.lock().await;
        if let Some(handle) = guard.take() {
            handle.abort();
        }

        let ctrl = self.clone();
        let tick = self.schedule_tick;
        *guard = Some(tokio::spawn(async move {
            let mut ticker = time::interval(tick);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                ctrl.resolve_schedule_now().await;
            }
        }));
    }

    async fn cancel_schedule_ticker(&self) {
        if let Some(handle) = self.schedule_ticker.lock().await.take() {
            handle.abort();
        }
    }
}
