//! Parsed actions and dispatch outcomes.
//!
//! An action is the structured request the model embeds in its free-text
//! reply: one JSON object with `function_name` and `function_params` keys.
//! The parser produces a [`ParsedAction`], the dispatcher consumes it and
//! classifies the result as an [`Outcome`].

use serde::{Deserialize, Serialize};
use crate::error::ToolError;
use crate::tool::ToolValue;

/// A structured tool request extracted from model output.
///
/// Ephemeral: constructed by the parser, consumed by the dispatcher,
/// discarded after the turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedAction {
    /// Name of the tool to invoke
    pub function_name: String,

    /// Parameter name → value mapping, as the model wrote it
    pub function_params: serde_json::Map<String, serde_json::Value>,
}

/// The classified result of dispatching one parsed action.
#[derive(Debug)]
pub enum Outcome {
    /// A registered tool ran; the value is fed back to the model as an
    /// `Action_Response:` user message and the loop continues.
    ToolResult(ToolValue),

    /// The clarification tool ran; the question is surfaced directly to the
    /// user as an assistant message and the loop halts for this turn.
    ClarificationRequested(String),

    /// The action names a tool absent from the registry. Nothing was
    /// invoked; the loop halts for this turn.
    UnknownAction {
        name: String,
        params: serde_json::Map<String, serde_json::Value>,
    },

    /// Argument validation or tool execution failed. Caught and reported
    /// instead of crashing the turn.
    DispatchFailed { name: String, error: ToolError },
}

impl Outcome {
    /// Stable label for logs and domain events.
    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::ToolResult(_) => "tool_result",
            Outcome::ClarificationRequested(_) => "clarification",
            Outcome::UnknownAction { .. } => "unknown_action",
            Outcome::DispatchFailed { .. } => "dispatch_failed",
        }
    }
}
