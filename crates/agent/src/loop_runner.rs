//! The agent reasoning loop implementation.
//!
//! One call to [`AgentLoop::process`] drives a single user turn:
//! call the model with the full transcript, parse its reply for an action,
//! dispatch the action, feed the result back, and repeat until a terminal
//! state is reached or the turn budget runs out. The conversation is owned
//! by the caller and survives every terminal state — the next user message
//! re-enters the loop with full history.

use std::sync::Arc;
use std::time::Instant;

use reactclaw_core::action::Outcome;
use reactclaw_core::error::{Error, ToolError};
use reactclaw_core::event::{DomainEvent, EventBus};
use reactclaw_core::message::{Conversation, Message, Role};
use reactclaw_core::provider::{CompletionRequest, Provider};
use reactclaw_core::tool::ToolRegistry;
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::dispatcher;
use crate::parser;
use crate::prompt;

/// Feedback prefix the model is told (via the system prompt) to expect.
const ACTION_RESPONSE_PREFIX: &str = "Action_Response: ";

/// How a single user turn ended.
///
/// Every variant is terminal for the turn only; the session persists.
#[derive(Debug)]
pub enum TurnOutcome {
    /// The model replied without an action — its text is the final answer.
    Answered(String),

    /// The model asked the user a question via the clarification tool.
    ClarificationPending(String),

    /// The model requested a tool that is not registered.
    UnknownAction {
        name: String,
        params: serde_json::Map<String, serde_json::Value>,
    },

    /// Argument validation or tool execution failed.
    DispatchFailed { name: String, error: ToolError },

    /// The turn budget ran out before another terminal state was reached.
    TurnLimitReached,
}

impl TurnOutcome {
    /// Stable label for logs and domain events.
    pub fn kind(&self) -> &'static str {
        match self {
            TurnOutcome::Answered(_) => "answered",
            TurnOutcome::ClarificationPending(_) => "clarification_pending",
            TurnOutcome::UnknownAction { .. } => "unknown_action",
            TurnOutcome::DispatchFailed { .. } => "dispatch_failed",
            TurnOutcome::TurnLimitReached => "turn_limit_reached",
        }
    }
}

/// The core agent loop that orchestrates model calls and tool execution.
pub struct AgentLoop {
    /// The LLM provider to use
    provider: Arc<dyn Provider>,

    /// The model to use
    model: String,

    /// Temperature setting
    temperature: f32,

    /// Default max tokens per response
    max_tokens: Option<u32>,

    /// Tool registry
    tools: Arc<ToolRegistry>,

    /// Event bus for domain events
    event_bus: Arc<EventBus>,
}

impl AgentLoop {
    /// Create a new agent loop.
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        temperature: f32,
        tools: Arc<ToolRegistry>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature,
            max_tokens: None,
            tools,
            event_bus,
        }
    }

    /// Set the default max tokens per LLM response.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Process one user message and drive the loop to a terminal state.
    ///
    /// Appends the user message, then repeats model call → parse → dispatch
    /// → feedback while the turn budget allows. Messages are appended
    /// strictly in the order produced and nothing is ever removed, so the
    /// model always sees the complete prior transcript.
    pub async fn process(
        &self,
        conversation: &mut Conversation,
        user_message: &str,
    ) -> Result<TurnOutcome, Error> {
        // The protocol prompt must be the first message of the session.
        if conversation.messages.is_empty() || conversation.messages[0].role != Role::System {
            let system_prompt = prompt::system_prompt(&self.tools);
            conversation.messages.insert(0, Message::system(system_prompt));
        }

        conversation.push(Message::user(user_message));

        info!(
            conversation_id = %conversation.id,
            messages = conversation.messages.len(),
            turn_count = conversation.turn_count,
            "Processing user message"
        );

        while conversation.has_budget() {
            let request = CompletionRequest {
                model: self.model.clone(),
                messages: conversation.messages.clone(),
                temperature: self.temperature,
                max_tokens: self.max_tokens,
            };

            let response = self.provider.complete(request).await?;

            if let Some(usage) = &response.usage {
                self.event_bus.publish(DomainEvent::ModelResponded {
                    conversation_id: conversation.id.to_string(),
                    model: response.model.clone(),
                    tokens_used: usage.total_tokens,
                    timestamp: Utc::now(),
                });
            }

            conversation.push(Message::assistant(&response.content));

            let Some(action) = parser::first_action(&response.content) else {
                // No action found — the reply is the final answer. A reply
                // where the model *meant* to act but emitted malformed JSON
                // ends up here too; the two cases are indistinguishable.
                debug!(conversation_id = %conversation.id, "No action found, treating as answer");
                return Ok(self.finish(conversation, TurnOutcome::Answered(response.content)));
            };

            let start = Instant::now();
            let outcome = dispatcher::dispatch(&action, &self.tools).await;
            let duration_ms = start.elapsed().as_millis() as u64;

            self.event_bus.publish(DomainEvent::ActionDispatched {
                tool_name: action.function_name.clone(),
                outcome: outcome.kind().into(),
                duration_ms,
                timestamp: Utc::now(),
            });

            match outcome {
                Outcome::ToolResult(value) => {
                    let feedback = format!("{ACTION_RESPONSE_PREFIX}{value}");
                    debug!(
                        tool = %action.function_name,
                        %feedback,
                        "Tool result fed back to model"
                    );
                    conversation.push(Message::user(feedback));
                    conversation.turn_count += 1;
                }
                Outcome::ClarificationRequested(question) => {
                    conversation.push(Message::assistant(&question));
                    return Ok(
                        self.finish(conversation, TurnOutcome::ClarificationPending(question))
                    );
                }
                Outcome::UnknownAction { name, params } => {
                    return Ok(self.finish(conversation, TurnOutcome::UnknownAction { name, params }));
                }
                Outcome::DispatchFailed { name, error } => {
                    return Ok(self.finish(conversation, TurnOutcome::DispatchFailed { name, error }));
                }
            }
        }

        warn!(
            conversation_id = %conversation.id,
            max_turns = conversation.max_turns,
            "Turn limit reached, stopping loop"
        );
        Ok(self.finish(conversation, TurnOutcome::TurnLimitReached))
    }

    fn finish(&self, conversation: &Conversation, outcome: TurnOutcome) -> TurnOutcome {
        self.event_bus.publish(DomainEvent::TurnCompleted {
            conversation_id: conversation.id.to_string(),
            terminal_state: outcome.kind().into(),
            turns_used: conversation.turn_count,
            timestamp: Utc::now(),
        });

        info!(
            conversation_id = %conversation.id,
            terminal_state = outcome.kind(),
            turns_used = conversation.turn_count,
            "Turn completed"
        );

        outcome
    }
}
