//! `reactclaw chat` — Interactive or single-message chat mode.

use std::sync::Arc;
use std::time::Duration;

use reactclaw_agent::{AgentLoop, TurnOutcome};
use reactclaw_config::AppConfig;
use reactclaw_core::event::EventBus;
use reactclaw_core::message::{Conversation, Role};
use tokio::io::{AsyncBufReadExt, BufReader};

pub async fn run(message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    // Check for API key early — give a clear error
    if config.api_key.is_none() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    OPENROUTER_API_KEY='sk-or-v1-...'   (recommended)");
        eprintln!("    OPENAI_API_KEY='sk-...'             (for OpenAI direct)");
        eprintln!("    REACTCLAW_API_KEY='sk-...'          (generic)");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    // Build provider and tools from config
    let provider = reactclaw_providers::build_from_config(&config);
    let tools = Arc::new(reactclaw_tools::registry_with(
        &config.tools.weather_base_url,
        Duration::from_secs(config.tools.probe_timeout_secs),
    ));
    let tool_names = tools.names().join(", ");

    let event_bus = Arc::new(EventBus::default());
    let agent = AgentLoop::new(
        provider,
        &config.default_model,
        config.default_temperature,
        tools,
        event_bus,
    )
    .with_max_tokens(config.default_max_tokens);

    let mut conv = Conversation::with_max_turns(config.agent.max_turns);

    if let Some(msg) = message {
        // Single message mode
        eprint!("  Thinking...");
        let before = conv.messages.len();
        let outcome = agent.process(&mut conv, &msg).await?;
        eprint!("\r              \r");
        render_turn(&conv, before, &outcome);
    } else {
        // Interactive mode
        println!();
        println!("  reactclaw — Interactive Mode");
        println!("  ----------------------------");
        println!();
        println!("  Provider:   {}", config.default_provider);
        println!("  Model:      {}", config.default_model);
        println!("  Tools:      {tool_names}");
        println!("  Max turns:  {}", config.agent.max_turns);
        println!();
        println!("  Type your message and press Enter.");
        println!("  Type 'exit' or Ctrl+D to quit.");
        println!();

        let stdin = tokio::io::stdin();
        let reader = BufReader::new(stdin);
        let mut lines = reader.lines();

        print!("  You > ");
        use std::io::Write;
        std::io::stdout().flush()?;

        while let Some(line) = lines.next_line().await? {
            let line = line.trim().to_string();
            if line.is_empty() {
                print!("  You > ");
                std::io::stdout().flush()?;
                continue;
            }
            if matches!(line.as_str(), "exit" | "quit" | "/exit" | "/quit" | ":q") {
                break;
            }

            eprint!("  ...");
            let before = conv.messages.len();

            match agent.process(&mut conv, &line).await {
                Ok(outcome) => {
                    eprint!("\r     \r");
                    println!();
                    render_turn(&conv, before, &outcome);
                    println!();
                }
                Err(e) => {
                    eprint!("\r     \r");
                    eprintln!("  [Error] {e}");
                    println!();
                }
            }

            print!("  You > ");
            std::io::stdout().flush()?;
        }

        println!();
        println!("  Goodbye!");
        println!();
    }

    Ok(())
}

/// Render everything the turn appended to the transcript, then the
/// terminal state. The transcript is read-only here — the loop owns it.
fn render_turn(conv: &Conversation, before: usize, outcome: &TurnOutcome) {
    // The first turn inserts the system prompt, which is not rendered.
    for msg in conv.messages[before.min(conv.messages.len())..].iter() {
        match msg.role {
            Role::Assistant => {
                for line in msg.content.lines() {
                    println!("  Assistant > {line}");
                }
            }
            Role::User if msg.content.starts_with("Action_Response: ") => {
                println!("  Tool > {}", msg.content);
            }
            // The user's own input and the system prompt are not echoed
            Role::User | Role::System => {}
        }
    }

    match outcome {
        TurnOutcome::Answered(_) | TurnOutcome::ClarificationPending(_) => {}
        TurnOutcome::UnknownAction { name, params } => {
            eprintln!(
                "  [Error] Unknown action: {name}: {}",
                serde_json::Value::Object(params.clone())
            );
        }
        TurnOutcome::DispatchFailed { name, error } => {
            eprintln!("  [Error] {name}: {error}");
        }
        // The loop stops silently when the turn budget runs out
        TurnOutcome::TurnLimitReached => {}
    }
}
