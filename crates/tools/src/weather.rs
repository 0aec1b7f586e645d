//! Weather lookup tool — queries wttr.in's one-line report format.
//!
//! The `%C+%t+%h+%w` format yields condition, temperature, humidity, and
//! wind in a single whitespace-separated line, which is returned to the
//! model as a list of strings.

use async_trait::async_trait;
use reactclaw_core::error::ToolError;
use reactclaw_core::tool::{ParamSpec, Tool, ToolDescriptor, ToolValue, ValueType};
use tracing::debug;

const REPORT_FORMAT: &str = "%C+%t+%h+%w";

pub struct WeatherTool {
    base_url: String,
    client: reqwest::Client,
}

impl WeatherTool {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }
}

impl Default for WeatherTool {
    fn default() -> Self {
        Self::new("https://wttr.in")
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "get_weather".into(),
            description: "Returns the weather information of a particular 'city' which includes \
                          Condition, Temperature, Humidity, Wind Speed"
                .into(),
            params: vec![ParamSpec::new("city", ValueType::Str)],
            returns: ValueType::StrList,
            example_input: "New York".into(),
            clarification: false,
        }
    }

    async fn call(&self, args: Vec<ToolValue>) -> Result<ToolValue, ToolError> {
        let city = match args.first() {
            Some(ToolValue::Str(city)) => city,
            _ => return Err(ToolError::InvalidArguments("expected city: str".into())),
        };

        // wttr.in accepts '+' for spaces in the location path
        let url = format!(
            "{}/{}?format={REPORT_FORMAT}",
            self.base_url,
            city.trim().replace(' ', "+")
        );

        debug!(%url, "Fetching weather report");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ToolError::Unreachable(format!("weather service: {e}")))?;

        if !response.status().is_success() {
            return Ok(ToolValue::List(vec![
                "Error: Unable to fetch weather data".into(),
            ]));
        }

        let text = response
            .text()
            .await
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: "get_weather".into(),
                reason: e.to_string(),
            })?;

        Ok(ToolValue::List(split_report(&text)))
    }
}

/// Split the one-line report into its whitespace-separated fields.
fn split_report(text: &str) -> Vec<String> {
    text.trim().split_whitespace().map(String::from).collect()
}
