//! End-to-end integration tests for the reactclaw agent runtime.
//!
//! These tests exercise the full pipeline from user input to terminal
//! state: prompt construction, model call, JSON action extraction,
//! descriptor validation, tool dispatch, and feedback — over a scripted
//! provider and network-free tools.

use std::sync::Arc;

use async_trait::async_trait;
use reactclaw_agent::{AgentLoop, TurnOutcome};
use reactclaw_core::error::{ProviderError, ToolError};
use reactclaw_core::event::{DomainEvent, EventBus};
use reactclaw_core::message::{Conversation, Role};
use reactclaw_core::provider::{CompletionRequest, CompletionResponse, Provider, Usage};
use reactclaw_core::tool::{ParamSpec, Tool, ToolDescriptor, ToolRegistry, ToolValue, ValueType};

// ── Mock Provider ────────────────────────────────────────────────────────

/// A mock provider that returns scripted reply texts in sequence.
struct ScriptedProvider {
    responses: std::sync::Mutex<Vec<String>>,
    call_count: std::sync::Mutex<usize>,
}

impl ScriptedProvider {
    fn new(responses: Vec<String>) -> Self {
        Self {
            responses: std::sync::Mutex::new(responses),
            call_count: std::sync::Mutex::new(0),
        }
    }

    fn calls(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "e2e_mock"
    }

    async fn complete(
        &self,
        _request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        let mut count = self.call_count.lock().unwrap();
        let responses = self.responses.lock().unwrap();
        if *count >= responses.len() {
            panic!(
                "ScriptedProvider exhausted: call #{}, have {}",
                *count,
                responses.len()
            );
        }
        let content = responses[*count].clone();
        *count += 1;
        Ok(CompletionResponse {
            content,
            model: "mock".into(),
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
        })
    }
}

/// Format a protocol-conformant action reply the way the model would.
fn action_text(name: &str, params: serde_json::Value) -> String {
    let action = serde_json::json!({
        "function_name": name,
        "function_params": params,
    });
    format!(
        "Thought: running {name}.\nAction:\n\n{}\n\nPAUSE",
        serde_json::to_string_pretty(&action).unwrap()
    )
}

// ── Network-free tools ───────────────────────────────────────────────────

struct FixedProbe(i64);

#[async_trait]
impl Tool for FixedProbe {
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
        Ok(ToolValue::Int(self.0))
    }
}

struct FixedWeather;

#[async_trait]
impl Tool for FixedWeather {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "get_weather".into(),
            description: "Returns the weather information of a particular 'city'".into(),
            params: vec![ParamSpec::new("city", ValueType::Str)],
            returns: ValueType::StrList,
            example_input: "New York".into(),
            clarification: false,
        }
    }

    async fn call(&self, _args: Vec<ToolValue>) -> Result<ToolValue, ToolError> {
        Ok(ToolValue::List(vec![
            "Sunny".into(),
            "+22°C".into(),
            "40%".into(),
            "↑11km/h".into(),
        ]))
    }
}

fn e2e_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(FixedProbe(5)));
    registry.register(Box::new(reactclaw_tools::ResponseCategoryTool));
    registry.register(Box::new(FixedWeather));
    registry.register(Box::new(reactclaw_tools::AskUserTool));
    registry
}

fn e2e_agent(provider: Arc<ScriptedProvider>) -> AgentLoop {
    AgentLoop::new(
        provider,
        "mock",
        0.7,
        Arc::new(e2e_registry()),
        Arc::new(EventBus::default()),
    )
}

// ── E2E: Full ReAct pipeline ─────────────────────────────────────────────

#[tokio::test]
async fn e2e_two_step_react_session() {
    // The example-session flow: probe the response time, rank it, answer.
    let provider = Arc::new(ScriptedProvider::new(vec![
        action_text(
            "get_response_time",
            serde_json::json!({"url": "something.com"}),
        ),
        action_text(
            "get_response_time_category",
            serde_json::json!({"response_time": 5}),
        ),
        "Answer: The response time category for something.com is Fast.".into(),
    ]));
    let agent = e2e_agent(provider.clone());

    let mut conv = Conversation::new();
    let outcome = agent
        .process(&mut conv, "what is the response time category for something.com?")
        .await
        .unwrap();

    match outcome {
        TurnOutcome::Answered(text) => assert!(text.contains("Fast")),
        other => panic!("expected Answered, got {other:?}"),
    }

    assert_eq!(provider.calls(), 3);
    assert_eq!(conv.turn_count, 2);

    // Both feedback messages went in as user-role Action_Responses
    let feedback: Vec<_> = conv
        .messages
        .iter()
        .filter(|m| m.role == Role::User && m.content.starts_with("Action_Response: "))
        .collect();
    assert_eq!(feedback.len(), 2);
    assert_eq!(feedback[0].content, "Action_Response: 5");
    assert_eq!(feedback[1].content, "Action_Response: Fast");
}

#[tokio::test]
async fn e2e_weather_list_result() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        action_text("get_weather", serde_json::json!({"city": "New York"})),
        "Answer: It's sunny at 22°C in New York.".into(),
    ]));
    let agent = e2e_agent(provider);

    let mut conv = Conversation::new();
    let outcome = agent
        .process(&mut conv, "weather in New York?")
        .await
        .unwrap();

    assert!(matches!(outcome, TurnOutcome::Answered(_)));

    let feedback = conv
        .messages
        .iter()
        .find(|m| m.content.starts_with("Action_Response: "))
        .unwrap();
    assert_eq!(
        feedback.content,
        r#"Action_Response: ["Sunny","+22°C","40%","↑11km/h"]"#
    );
}

#[tokio::test]
async fn e2e_clarification_then_answer_next_turn() {
    // Turn 1: the model asks for the city. Turn 2: the user answers and the
    // model completes — same session, history intact.
    let provider = Arc::new(ScriptedProvider::new(vec![
        action_text(
            "ask_user_question",
            serde_json::json!({"question": "Which city do you mean?"}),
        ),
        action_text("get_weather", serde_json::json!({"city": "Paris"})),
        "Answer: Sunny in Paris.".into(),
    ]));
    let agent = e2e_agent(provider.clone());

    let mut conv = Conversation::new();

    let first = agent.process(&mut conv, "what's the weather?").await.unwrap();
    match &first {
        TurnOutcome::ClarificationPending(q) => assert_eq!(q, "Which city do you mean?"),
        other => panic!("expected ClarificationPending, got {other:?}"),
    }
    assert_eq!(conv.turn_count, 0);
    assert_eq!(
        conv.messages.last().unwrap().content,
        "Which city do you mean?"
    );

    let second = agent.process(&mut conv, "Paris").await.unwrap();
    assert!(matches!(second, TurnOutcome::Answered(_)));
    assert_eq!(provider.calls(), 3);
    // One tool round-trip happened in turn 2
    assert_eq!(conv.turn_count, 1);
}

#[tokio::test]
async fn e2e_unknown_action_halts_turn_but_not_session() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        action_text("set_thermostat", serde_json::json!({"celsius": 21})),
        "Answer: just text this time.".into(),
    ]));
    let agent = e2e_agent(provider.clone());

    let mut conv = Conversation::new();
    let first = agent.process(&mut conv, "warm it up").await.unwrap();
    match first {
        TurnOutcome::UnknownAction { name, .. } => assert_eq!(name, "set_thermostat"),
        other => panic!("expected UnknownAction, got {other:?}"),
    }

    // The session carries on with history intact
    let second = agent.process(&mut conv, "fine, skip it").await.unwrap();
    assert!(matches!(second, TurnOutcome::Answered(_)));
    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn e2e_turn_limit_circuit_breaker() {
    let responses: Vec<String> = (0..5)
        .map(|_| action_text("get_response_time", serde_json::json!({"url": "x.com"})))
        .collect();
    let provider = Arc::new(ScriptedProvider::new(responses));
    let agent = e2e_agent(provider.clone());

    let mut conv = Conversation::with_max_turns(2);
    let outcome = agent.process(&mut conv, "loop forever").await.unwrap();

    assert!(matches!(outcome, TurnOutcome::TurnLimitReached));
    assert_eq!(provider.calls(), 2);
    assert_eq!(conv.turn_count, 2);
}

#[tokio::test]
async fn e2e_events_published_for_tool_turns() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        action_text("get_response_time", serde_json::json!({"url": "x.com"})),
        "Answer: done.".into(),
    ]));

    let event_bus = Arc::new(EventBus::default());
    let mut events = event_bus.subscribe();

    let agent = AgentLoop::new(
        provider,
        "mock",
        0.7,
        Arc::new(e2e_registry()),
        event_bus.clone(),
    );

    let mut conv = Conversation::new();
    agent.process(&mut conv, "ping x.com").await.unwrap();

    let mut saw_model = false;
    let mut saw_dispatch = false;
    let mut saw_turn = false;
    while let Ok(event) = events.try_recv() {
        match event.as_ref() {
            DomainEvent::ModelResponded { .. } => saw_model = true,
            DomainEvent::ActionDispatched { tool_name, outcome, .. } => {
                assert_eq!(tool_name, "get_response_time");
                assert_eq!(outcome, "tool_result");
                saw_dispatch = true;
            }
            DomainEvent::TurnCompleted { terminal_state, .. } => {
                assert_eq!(terminal_state, "answered");
                saw_turn = true;
            }
            _ => {}
        }
    }
    assert!(saw_model && saw_dispatch && saw_turn);
}

#[tokio::test]
async fn e2e_system_prompt_carries_tool_block() {
    // The first model call must already see the capability block.
    struct PromptAssertingProvider;

    #[async_trait]
    impl Provider for PromptAssertingProvider {
        fn name(&self) -> &str {
            "prompt_assert"
        }

        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> Result<CompletionResponse, ProviderError> {
            let system = &request.messages[0];
            assert_eq!(system.role, Role::System);
            assert!(system.content.contains("Thought, Action, PAUSE, Action_Response"));
            assert!(system.content.contains("get_response_time:"));
            assert!(system.content.contains("ask_user_question:"));
            Ok(CompletionResponse {
                content: "Answer: ok.".into(),
                model: "mock".into(),
                usage: None,
            })
        }
    }

    let agent = AgentLoop::new(
        Arc::new(PromptAssertingProvider),
        "mock",
        0.7,
        Arc::new(e2e_registry()),
        Arc::new(EventBus::default()),
    );

    let mut conv = Conversation::new();
    let outcome = agent.process(&mut conv, "hello").await.unwrap();
    assert!(matches!(outcome, TurnOutcome::Answered(_)));
}
