//! Ask-user tool — the designated clarification mechanism.
//!
//! A pure pass-through: the question goes in, the question comes out.
//! The dispatcher recognizes the `clarification` flag on the descriptor
//! and surfaces the result to the user as a visible assistant message
//! instead of feeding it back to the model.

use async_trait::async_trait;
use reactclaw_core::error::ToolError;
use reactclaw_core::tool::{ParamSpec, Tool, ToolDescriptor, ToolValue, ValueType};

pub struct AskUserTool;

#[async_trait]
impl Tool for AskUserTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "ask_user_question".into(),
            description: "Ask user a question to get information inorder to answer the question \
                          asked by the user"
                .into(),
            params: vec![ParamSpec::new("question", ValueType::Str)],
            returns: ValueType::Str,
            example_input: "Where are you going?".into(),
            clarification: true,
        }
    }

    async fn call(&self, mut args: Vec<ToolValue>) -> Result<ToolValue, ToolError> {
        if matches!(args.first(), Some(ToolValue::Str(_))) {
            Ok(args.remove(0))
        } else {
            Err(ToolError::InvalidArguments("expected question: str".into()))
        }
    }
}
