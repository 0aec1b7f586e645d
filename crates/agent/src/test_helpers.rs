//! Shared test helpers for agent loop tests.

use async_trait::async_trait;
use reactclaw_core::error::{ProviderError, ToolError};
use reactclaw_core::provider::{CompletionRequest, CompletionResponse, Provider, Usage};
use reactclaw_core::tool::{ParamSpec, Tool, ToolDescriptor, ToolRegistry, ToolValue, ValueType};
use std::sync::Mutex;

/// A mock provider that returns a sequence of scripted reply texts.
///
/// Each call to `complete` returns the next reply in the queue.
/// Panics if more calls are made than replies provided.
pub struct SequentialMockProvider {
    responses: Mutex<Vec<String>>,
    call_count: Mutex<usize>,
}

impl SequentialMockProvider {
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            responses: Mutex::new(responses),
            call_count: Mutex::new(0),
        }
    }

    /// Create a provider that returns a single text reply (no action).
    pub fn single_text(text: &str) -> Self {
        Self::new(vec![text.to_string()])
    }

    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait]
impl Provider for SequentialMockProvider {
    fn name(&self) -> &str {
        "sequential_mock"
    }

    async fn complete(
        &self,
        _request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        let mut count = self.call_count.lock().unwrap();
        let responses = self.responses.lock().unwrap();

        if *count >= responses.len() {
            panic!(
                "SequentialMockProvider: no more responses (call #{}, have {})",
                *count,
                responses.len()
            );
        }

        let content = responses[*count].clone();
        *count += 1;

        Ok(CompletionResponse {
            content,
            model: "mock-model".into(),
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
        })
    }
}

/// Format a protocol-conformant action reply the way the model would.
pub fn action_text(name: &str, params: serde_json::Value) -> String {
    let action = serde_json::json!({
        "function_name": name,
        "function_params": params,
    });
    format!(
        "Thought: I should run {name}.\nAction:\n\n{}\n\nPAUSE",
        serde_json::to_string_pretty(&action).unwrap()
    )
}

/// A probe stub that always reports 5 ms, so loop tests stay off the network.
pub struct StubProbeTool;

#[async_trait]
impl Tool for StubProbeTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "get_response_time".into(),
            description: "Returns the response time of a website in ms".into(),
            params: vec![ParamSpec::new("url", ValueType::Str)],
            returns: ValueType::Int,
            example_input: "google.com".into(),
            clarification: false,
        }
    }

    async fn call(&self, _args: Vec<ToolValue>) -> Result<ToolValue, ToolError> {
        Ok(ToolValue::Int(5))
    }
}

/// Registry for loop tests: the stub probe plus the real (pure)
/// clarification and category tools.
pub fn stub_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(StubProbeTool));
    registry.register(Box::new(reactclaw_tools::ResponseCategoryTool));
    registry.register(Box::new(reactclaw_tools::AskUserTool));
    registry
}
