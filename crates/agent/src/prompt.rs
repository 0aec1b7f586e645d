//! System prompt construction for the ReAct text protocol.
//!
//! The prompt is the wire protocol: it instructs the model to emit
//! `Thought:` / `Action:` (one JSON object with `function_name` and
//! `function_params`) / `PAUSE`, to expect `Action_Response: <value>` back,
//! and to finish with `Answer: <text>`. The parser and dispatcher only
//! understand this exact convention, so the wording here and the code over
//! in `parser`/`loop_runner` have to move together.

use reactclaw_core::tool::ToolRegistry;

const TOOL_DESCRIPTIONS_SLOT: &str = "{tool_descriptions}";

const REACT_LOOP_PROMPT: &str = "
You run in a loop of Thought, Action, PAUSE, Action_Response.
At the end of the loop you output an Answer.

Use Thought to understand the question you have been asked.
Use Action to run one of the actions available to you - then return PAUSE.
Action_Response will be the result of running those actions.

Thought and Action should occur in the same turn.

If you have multiple actions to run, you can run them in consecutive turns.

Your available actions are:
{tool_descriptions}
";

const EXAMPLE_SESSION: &str = r#"
# Example session:

Question: what is the response time category for something.com?
Thought: I should check the response time for the web page first.
Action:

{
  "function_name": "get_response_time",
  "function_params": {
    "url": "something.com"
  }
}

PAUSE

You will be called again with this:

Action_Response: 5

Thought: I should now output the response time ranking.

Action:

{
  "function_name": "get_response_time_category",
  "function_params": {
    "response_time": 5
  }
}

PAUSE

You will be called again with this:

Action_Response: Fast

You then output:

Answer: The response time category for something.com is Fast.
"#;

/// Build the full system prompt: protocol instructions with the registry's
/// capability block substituted in, followed by the worked example session.
pub fn system_prompt(registry: &ToolRegistry) -> String {
    let mut prompt = REACT_LOOP_PROMPT.replace(TOOL_DESCRIPTIONS_SLOT, &registry.describe_all());
    prompt.push_str(EXAMPLE_SESSION);
    prompt
}
