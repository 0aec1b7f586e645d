//! Built-in tool implementations for reactclaw.
//!
//! The fixed tool set the agent can act with: probe a website's response
//! time, rank it, look up the weather, or ask the user a clarifying
//! question. Registration order matters — it is the order the tools are
//! described to the model in the system prompt.

pub mod ask_user;
pub mod response_category;
pub mod response_time;
pub mod weather;

use std::time::Duration;
use reactclaw_core::tool::ToolRegistry;

pub use ask_user::AskUserTool;
pub use response_category::ResponseCategoryTool;
pub use response_time::ResponseTimeTool;
pub use weather::WeatherTool;

/// Create the default tool registry with stock endpoints and timeouts.
pub fn default_registry() -> ToolRegistry {
    registry_with("https://wttr.in", Duration::from_secs(5))
}

/// Create the tool registry with explicit tool settings (from config).
pub fn registry_with(weather_base_url: &str, probe_timeout: Duration) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(ResponseTimeTool::new(probe_timeout)));
    registry.register(Box::new(ResponseCategoryTool));
    registry.register(Box::new(WeatherTool::new(weather_base_url)));
    registry.register(Box::new(AskUserTool));
    registry
}
