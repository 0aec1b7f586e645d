//! Action dispatcher — validates a parsed action and runs the tool.
//!
//! The dispatcher is the only place that turns a [`ParsedAction`] into a
//! tool invocation, and every way that can go wrong is classified into an
//! [`Outcome`] variant rather than propagated as an error: the loop decides
//! what each outcome means for the conversation.

use reactclaw_core::action::{Outcome, ParsedAction};
use reactclaw_core::tool::ToolRegistry;
use tracing::{debug, warn};

/// Dispatch one action against the registry.
///
/// - Unregistered name → [`Outcome::UnknownAction`]; no tool is invoked.
/// - Arguments are validated against the descriptor (presence, type, no
///   extras) before invocation; failures → [`Outcome::DispatchFailed`].
/// - The clarification tool's result becomes
///   [`Outcome::ClarificationRequested`]; every other tool's result becomes
///   [`Outcome::ToolResult`].
pub async fn dispatch(action: &ParsedAction, registry: &ToolRegistry) -> Outcome {
    let Some(tool) = registry.resolve(&action.function_name) else {
        warn!(action = %action.function_name, "Unknown action requested");
        return Outcome::UnknownAction {
            name: action.function_name.clone(),
            params: action.function_params.clone(),
        };
    };

    let descriptor = tool.descriptor();

    let args = match descriptor.validate(&action.function_params) {
        Ok(args) => args,
        Err(error) => {
            warn!(tool = %descriptor.name, %error, "Argument validation failed");
            return Outcome::DispatchFailed {
                name: descriptor.name,
                error,
            };
        }
    };

    debug!(tool = %descriptor.name, "Invoking tool");

    match tool.call(args).await {
        Ok(value) if descriptor.clarification => {
            Outcome::ClarificationRequested(value.to_string())
        }
        Ok(value) => Outcome::ToolResult(value),
        Err(error) => {
            warn!(tool = %descriptor.name, %error, "Tool execution failed");
            Outcome::DispatchFailed {
                name: descriptor.name,
                error,
            }
        }
    }
}
