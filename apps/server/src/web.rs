use axum::{
    extract::{Json, Path, State},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::compression::CompressionLayer;
use uuid::Uuid;

use thermostat_engine::error::EngineError;
use thermostat_engine::state::{DataSource, ThermostatState};

use crate::controller::Thermostat;

#[derive(Clone)]
pub struct WebState {
    pub thermostat: Thermostat,
}

#[derive(Deserialize)]
pub struct ReadingAdjustRequest {
    temperature_delta: Option<f64>,
    humidity_delta: Option<f64>,
}

#[derive(Deserialize)]
pub struct TargetRequest {
    temperature: f64,
}

#[derive(Deserialize)]
pub struct ScheduleEntryRequest {
    name: String,
    time: String,
    temperature: f64,
}

#[derive(Deserialize)]
pub struct SourceRequest {
    source: DataSource,
}

#[derive(Deserialize)]
pub struct LocationRequest {
    location: String,
}

#[derive(Deserialize)]
pub struct SimulationRequest {
    action: String,
}

pub async fn create_web_server(thermostat: Thermostat, bind_addr: &str) -> anyhow::Result<()> {
    let app = router(thermostat);

    println!("Starting web server on http://{}", bind_addr);
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn router(thermostat: Thermostat) -> Router {
    Router::new()
        .route("/api/status", get(get_status))
        .route("/api/events", get(get_events))
        .route("/api/reading", post(adjust_reading))
        .route("/api/target", post(set_target))
        .route("/api/schedule", post(add_schedule_entry))
        .route("/api/schedule/:id", put(update_schedule_entry).delete(delete_schedule_entry))
        .route("/api/source", post(set_source))
        .route("/api/location", post(set_location))
        .route("/api/simulation", post(control_simulation))
        .route("/api/reset", post(reset))
        .layer(CompressionLayer::new())
        .with_state(WebState { thermostat })
}

fn failure(err: EngineError) -> axum::Json<serde_json::Value> {
    axum::Json(json!({
        "success": false,
        "error": err.to_string()
    }))
}

fn success() -> axum::Json<serde_json::Value> {
    axum::Json(json!({
        "success": true
    }))
}

async fn get_status(State(state): State<WebState>) -> axum::Json<ThermostatState> {
    axum::Json(state.thermostat.snapshot().await)
}

async fn get_events(State(state): State<WebState>) -> axum::Json<serde_json::Value> {
    let snapshot = state.thermostat.snapshot().await;
    axum::Json(json!({
        "notifications": snapshot.notifications
    }))
}

async fn adjust_reading(
    State(state): State<WebState>,
    Json(request): Json<ReadingAdjustRequest>,
) -> axum::Json<serde_json::Value> {
    if let Some(delta) = request.temperature_delta {
        if let Err(e) = state.thermostat.adjust_temperature(delta).await {
            return failure(e);
        }
    }
    if let Some(delta) = request.humidity_delta {
        if let Err(e) = state.thermostat.adjust_humidity(delta).await {
            return failure(e);
        }
    }
    success()
}

async fn set_target(
    State(state): State<WebState>,
    Json(request): Json<TargetRequest>,
) -> axum::Json<serde_json::Value> {
    state.thermostat.set_target(request.temperature).await;
    success()
}

async fn add_schedule_entry(
    State(state): State<WebState>,
    Json(request): Json<ScheduleEntryRequest>,
) -> axum::Json<serde_json::Value> {
    match state
        .thermostat
        .add_schedule_entry(request.name, request.time, request.temperature)
        .await
    {
        Ok(entry) => axum::Json(json!({
            "success": true,
            "entry": entry
        })),
        Err(e) => failure(e),
    }
}

async fn update_schedule_entry(
    State(state): State<WebState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ScheduleEntryRequest>,
) -> axum::Json<serde_json::Value> {
    match state
        .thermostat
        .update_schedule_entry(id, request.name, request.time, request.temperature)
        .await
    {
        Ok(()) => success(),
        Err(e) => failure(e),
    }
}

async fn delete_schedule_entry(
    State(state): State<WebState>,
    Path(id): Path<Uuid>,
) -> axum::Json<serde_json::Value> {
    match state.thermostat.delete_schedule_entry(id).await {
        Ok(()) => success(),
        Err(e) => failure(e),
    }
}

async fn set_source(
    State(state): State<WebState>,
    Json(request): Json<SourceRequest>,
) -> axum::Json<serde_json::Value> {
    state.thermostat.set_data_source(request.source).await;
    success()
}

async fn set_location(
    State(state): State<WebState>,
    Json(request): Json<LocationRequest>,
) -> axum::Json<serde_json::Value> {
    state.thermostat.set_location(request.location).await;
    success()
}

async fn control_simulation(
    State(state): State<WebState>,
    Json(request): Json<SimulationRequest>,
) -> axum::Json<serde_json::Value> {
    match request.action.as_str() {
        "start" => match state.thermostat.start_simulation().await {
            Ok(()) => success(),
            Err(e) => failure(e),
        },
        "stop" => {
            state.thermostat.stop_simulation().await;
            success()
        }
        other => axum::Json(json!({
            "success": false,
            "error": format!("unknown simulation action '{}'", other)
        })),
    }
}

async fn reset(State(state): State<WebState>) -> axum::Json<serde_json::Value> {
    state.thermostat.reset().await;
    success()
}
