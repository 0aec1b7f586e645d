//! Response time probe — measures how quickly a host answers.
//!
//! Times a TCP connect to the target (port 80 unless the URL names one)
//! and reports whole milliseconds. Unreachable or timed-out hosts report
//! `-1` rather than failing the turn, so the model can reason about the
//! outage instead of the loop aborting.

use async_trait::async_trait;
use reactclaw_core::error::ToolError;
use reactclaw_core::tool::{ParamSpec, Tool, ToolDescriptor, ToolValue, ValueType};
use std::time::{Duration, Instant};
use tokio::net::TcpStream;
use tracing::debug;

pub struct ResponseTimeTool {
    timeout: Duration,
}

impl ResponseTimeTool {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for ResponseTimeTool {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

#[async_trait]
impl Tool for ResponseTimeTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "get_response_time".into(),
            description:
                "Returns the response time of a website in ms, returns -1 if the website is unreachable"
                    .into(),
            params: vec![ParamSpec::new("url", ValueType::Str)],
            returns: ValueType::Int,
            example_input: "google.com".into(),
            clarification: false,
        }
    }

    async fn call(&self, args: Vec<ToolValue>) -> Result<ToolValue, ToolError> {
        let url = match args.first() {
            Some(ToolValue::Str(url)) => url,
            _ => return Err(ToolError::InvalidArguments("expected url: str".into())),
        };

        let addr = connect_target(url);
        let start = Instant::now();

        let millis = match tokio::time::timeout(self.timeout, TcpStream::connect(&addr)).await {
            Ok(Ok(_stream)) => start.elapsed().as_millis() as i64,
            Ok(Err(e)) => {
                debug!(target = %addr, error = %e, "Probe failed");
                -1
            }
            Err(_) => {
                debug!(target = %addr, "Probe timed out");
                -1
            }
        };

        Ok(ToolValue::Int(millis))
    }
}

/// Reduce a user-supplied URL to a `host:port` connect target.
///
/// Accepts bare hosts ("google.com"), scheme-prefixed URLs, and explicit
/// ports; anything past the first `/` is discarded.
fn connect_target(url: &str) -> String {
    let stripped = url
        .trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://");
    let host = stripped.split('/').next().unwrap_or(stripped);

    if host.rsplit(':').next().is_some_and(|p| p.parse::<u16>().is_ok()) {
        host.to_string()
    } else {
        format!("{host}:80")
    }
}
