//! # sprinklerd — sprinkler daemon
//!
//! Composition root that wires the zone controller to the broker and the zone
//! outputs.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Initialise logging
//! - Build the zone registry and the output driver
//! - Connect to the MQTT broker and spawn the dispatcher
//! - On Ctrl-C: stop the event loop, let the dispatcher drain and switch the
//!   running zone off
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use sprinkler_adapter_virtual::VirtualOutputs;
use sprinkler_app::cooldown::SleepCooldown;
use sprinkler_app::dispatcher::Dispatcher;
use sprinkler_app::services::zone_controller::ZoneController;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    // Outputs
    let registry = config.zone_registry()?;
    let outputs = Arc::new(VirtualOutputs::new(registry.outputs()));
    tracing::info!(zones = registry.len(), "zone outputs ready");

    // Broker
    let (channel, events, event_loop) = sprinkler_adapter_mqtt::connect(&config.mqtt);

    // Dispatcher
    let controller = ZoneController::new(registry, config.channel_identity(), Arc::clone(&outputs));
    let dispatcher = Dispatcher::new(
        controller,
        config.feedback(),
        channel,
        SleepCooldown,
        config.cooldown(),
    );
    let mut dispatcher_task = tokio::spawn(dispatcher.run(events));

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result?;
            tracing::info!("shutdown requested");
        }
        result = &mut dispatcher_task => {
            result?;
            tracing::warn!("dispatcher stopped unexpectedly");
            return Ok(());
        }
    }

    event_loop.abort();
    let dispatcher = dispatcher_task.await?;
    tracing::info!(
        state = ?dispatcher.state(),
        energized = outputs.energized().len(),
        "sprinklerd stopped"
    );
    Ok(())
}
