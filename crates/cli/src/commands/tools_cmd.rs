//! `reactclaw tools` — List the tools available to the agent.
//!
//! Prints the same capability block the model sees in its system prompt.

use std::time::Duration;
use reactclaw_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let registry = reactclaw_tools::registry_with(
        &config.tools.weather_base_url,
        Duration::from_secs(config.tools.probe_timeout_secs),
    );

    println!("Available tools ({}):", registry.names().len());
    println!("{}", registry.describe_all());

    Ok(())
}
