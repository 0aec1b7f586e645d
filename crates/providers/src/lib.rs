//! LLM Provider implementations for reactclaw.
//!
//! All providers implement the `reactclaw_core::Provider` trait. The loop
//! performs exactly one blocking completion per iteration — no retry,
//! fallback, or streaming layers sit between it and the backend.

use std::sync::Arc;
use reactclaw_core::provider::Provider;

pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;

/// Build the configured provider.
///
/// Provider-specific config (api_key, api_url) takes precedence over the
/// top-level defaults; well-known provider names get their usual base URL.
pub fn build_from_config(config: &reactclaw_config::AppConfig) -> Arc<dyn Provider> {
    let name = config.default_provider.as_str();
    let provider_config = config.providers.get(name);

    let api_key = provider_config
        .and_then(|p| p.api_key.clone())
        .or_else(|| config.api_key.clone())
        .unwrap_or_default();

    let base_url = provider_config
        .and_then(|p| p.api_url.clone())
        .unwrap_or_else(|| default_base_url(name));

    Arc::new(OpenAiCompatProvider::new(name, base_url, api_key))
}

/// Get the default base URL for well-known providers.
fn default_base_url(provider_name: &str) -> String {
    match provider_name {
        "openrouter" => "https://openrouter.ai/api/v1".into(),
        "openai" => "https://api.openai.com/v1".into(),
        "ollama" => "http://localhost:11434/v1".into(),
        "deepseek" => "https://api.deepseek.com/v1".into(),
        "groq" => "https://api.groq.com/openai/v1".into(),
        "together" => "https://api.together.xyz/v1".into(),
        "vllm" => "http://localhost:8000/v1".into(),
        "llamacpp" | "llama.cpp" => "http://localhost:8080/v1".into(),
        _ => format!("https://{provider_name}.api.example.com/v1"),
    }
}
