//! Response time category — pure threshold classification.

use async_trait::async_trait;
use reactclaw_core::error::ToolError;
use reactclaw_core::tool::{ParamSpec, Tool, ToolDescriptor, ToolValue, ValueType};

/// Response times at or below this many milliseconds rank as "Fast".
const FAST_THRESHOLD_MS: i64 = 10;

pub struct ResponseCategoryTool;

#[async_trait]
impl Tool for ResponseCategoryTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "get_response_time_category".into(),
            description: "Returns the category based upon the response time of a website".into(),
            params: vec![ParamSpec::new("response_time", ValueType::Int)],
            returns: ValueType::Str,
            example_input: "5".into(),
            clarification: false,
        }
    }

    async fn call(&self, args: Vec<ToolValue>) -> Result<ToolValue, ToolError> {
        let response_time = match args.first() {
            Some(ToolValue::Int(ms)) => *ms,
            _ => {
                return Err(ToolError::InvalidArguments(
                    "expected response_time: int".into(),
                ));
            }
        };

        Ok(ToolValue::Str(categorize(response_time).into()))
    }
}

fn categorize(response_time: i64) -> &'static str {
    if response_time <= FAST_THRESHOLD_MS {
        "Fast"
    } else {
        "Slow"
    }
}
