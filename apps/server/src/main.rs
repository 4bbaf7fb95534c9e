pub mod controller;
pub mod weather;
pub mod web;

use std::sync::Arc;

use anyhow::Result;
use log::info;

use crate::controller::Thermostat;
use crate::weather::OpenMeteo;
use crate::web::create_web_server;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let weather = Arc::new(OpenMeteo::new()?);
    let thermostat = Thermostat::new(weather);

    info!("thermostat controller ready");
    create_web_server(thermostat, "0.0.0.0:8080").await
}
