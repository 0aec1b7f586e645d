//! Tool trait — the abstraction over agent capabilities.
//!
//! Tools are the actions the model can request through the text protocol:
//! probe a host's response time, look up the weather, or ask the user a
//! clarifying question. Unlike provider-native function calling, the model
//! learns about tools from a rendered description block in the system
//! prompt and invokes them by emitting a JSON action in its reply.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::error::ToolError;

/// Type tag for tool parameters and return values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Int,
    Str,
    StrList,
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueType::Int => write!(f, "int"),
            ValueType::Str => write!(f, "str"),
            ValueType::StrList => write!(f, "list[str]"),
        }
    }
}

/// A tagged tool value — argument in, result out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolValue {
    Int(i64),
    Str(String),
    List(Vec<String>),
}

impl ToolValue {
    pub fn kind(&self) -> ValueType {
        match self {
            ToolValue::Int(_) => ValueType::Int,
            ToolValue::Str(_) => ValueType::Str,
            ToolValue::List(_) => ValueType::StrList,
        }
    }
}

/// The Display form is what lands after `Action_Response: ` in the
/// feedback message the model reads.
impl std::fmt::Display for ToolValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolValue::Int(i) => write!(f, "{i}"),
            ToolValue::Str(s) => write!(f, "{s}"),
            ToolValue::List(items) => {
                write!(f, "{}", serde_json::to_string(items).map_err(|_| std::fmt::Error)?)
            }
        }
    }
}

/// A declared tool parameter: name plus type tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    pub ty: ValueType,
}

impl ParamSpec {
    pub fn new(name: impl Into<String>, ty: ValueType) -> Self {
        Self { name: name.into(), ty }
    }
}

/// Static metadata for a tool. Built once at registration, never mutated.
///
/// The descriptor is both the prompt-facing documentation (via
/// [`ToolRegistry::describe_all`]) and the validation contract the
/// dispatcher checks parsed actions against before invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Unique tool name (what the model puts in `function_name`)
    pub name: String,

    /// Human description, rendered into the system prompt
    pub description: String,

    /// Ordered parameter declarations
    pub params: Vec<ParamSpec>,

    /// Return type tag
    pub returns: ValueType,

    /// Example input shown in the prompt (`e.g. <name>: <example>`)
    pub example_input: String,

    /// Marks the designated clarification tool. Its result is surfaced to
    /// the user as a question instead of being fed back to the model.
    #[serde(default)]
    pub clarification: bool,
}

impl ToolDescriptor {
    /// Validate a parsed parameter map against this descriptor and produce
    /// the ordered argument vector for [`Tool::call`].
    ///
    /// Every declared parameter must be present with the declared type;
    /// parameters the descriptor does not declare are rejected. No coercion
    /// is attempted.
    pub fn validate(
        &self,
        params: &serde_json::Map<String, serde_json::Value>,
    ) -> std::result::Result<Vec<ToolValue>, ToolError> {
        for key in params.keys() {
            if !self.params.iter().any(|p| &p.name == key) {
                return Err(ToolError::InvalidArguments(format!(
                    "unknown parameter '{key}' for tool '{}'",
                    self.name
                )));
            }
        }

        let mut args = Vec::with_capacity(self.params.len());
        for spec in &self.params {
            let value = params.get(&spec.name).ok_or_else(|| {
                ToolError::InvalidArguments(format!(
                    "missing parameter '{}' for tool '{}'",
                    spec.name, self.name
                ))
            })?;

            let arg = match spec.ty {
                ValueType::Int => value
                    .as_i64()
                    .map(ToolValue::Int)
                    .ok_or_else(|| type_mismatch(&self.name, spec, value))?,
                ValueType::Str => value
                    .as_str()
                    .map(|s| ToolValue::Str(s.to_string()))
                    .ok_or_else(|| type_mismatch(&self.name, spec, value))?,
                ValueType::StrList => value
                    .as_array()
                    .and_then(|arr| {
                        arr.iter()
                            .map(|v| v.as_str().map(String::from))
                            .collect::<Option<Vec<_>>>()
                    })
                    .map(ToolValue::List)
                    .ok_or_else(|| type_mismatch(&self.name, spec, value))?,
            };
            args.push(arg);
        }

        Ok(args)
    }
}

fn type_mismatch(tool: &str, spec: &ParamSpec, got: &serde_json::Value) -> ToolError {
    ToolError::InvalidArguments(format!(
        "parameter '{}' of tool '{tool}' expects {}, got {got}",
        spec.name, spec.ty
    ))
}

/// The core Tool trait.
///
/// One uniform signature for every tool: descriptor-ordered argument
/// values in, a tagged result out. The dispatcher validates arguments
/// against the descriptor before calling, so implementations may rely on
/// arity and types matching their declaration.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Static metadata: name, parameters, return type, example.
    fn descriptor(&self) -> ToolDescriptor;

    /// Execute the tool with validated, descriptor-ordered arguments.
    async fn call(&self, args: Vec<ToolValue>) -> std::result::Result<ToolValue, ToolError>;
}

/// A registry of available tools.
///
/// The agent loop uses this to:
/// 1. Render the capability block injected into the system prompt
/// 2. Look up and execute tools when the model requests them
///
/// Registration order is preserved so the prompt text is deterministic.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Register a tool. Replaces any existing tool with the same name,
    /// keeping its original position.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.descriptor().name;
        if let Some(existing) = self
            .tools
            .iter_mut()
            .find(|t| t.descriptor().name == name)
        {
            *existing = tool;
        } else {
            self.tools.push(tool);
        }
    }

    /// Get a tool by name.
    pub fn resolve(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|t| t.descriptor().name == name)
            .map(|t| t.as_ref())
    }

    /// All descriptors, in registration order.
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools.iter().map(|t| t.descriptor()).collect()
    }

    /// List all registered tool names, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.descriptor().name).collect()
    }

    /// Render every descriptor into the capability block used verbatim in
    /// the system prompt:
    ///
    /// ```text
    /// <name>:
    /// Description: <description>
    /// Parameters:
    ///     <param>: <type>
    ///     Return type: <type>
    /// e.g. <name>: <example>
    /// ```
    ///
    /// Blocks are separated by a blank line.
    pub fn describe_all(&self) -> String {
        let mut out = String::new();
        for tool in &self.tools {
            let d = tool.descriptor();
            out.push('\n');
            out.push_str(&d.name);
            out.push(':');
            out.push_str("\nDescription: ");
            out.push_str(&d.description);
            out.push_str("\nParameters:");
            for p in &d.params {
                out.push_str(&format!("\n\t{}: {}", p.name, p.ty));
            }
            out.push_str(&format!("\n\tReturn type: {}", d.returns));
            out.push_str(&format!("\ne.g. {}: {}", d.name, d.example_input));
            out.push('\n');
        }
        out
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A simple test tool for unit tests.
    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn descriptor(&self) -> ToolDescriptor {
            ToolDescriptor {
                name: "echo".into(),
                description: "Echoes back the input".into(),
                params: vec![ParamSpec::new("text", ValueType::Str)],
                returns: ValueType::Str,
                example_input: "hello".into(),
                clarification: false,
            }
        }

        async fn call(&self, mut args: Vec<ToolValue>) -> Result<ToolValue, ToolError> {
            Ok(args.remove(0))
        }
    }

    #[test]
    fn registry_register_and_lookup() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        assert!(registry.resolve("echo").is_some());
        assert!(registry.resolve("nonexistent").is_none());
    }

    #[test]
    fn registry_preserves_order() {
        struct Named(&'static str);

        #[async_trait]
        impl Tool for Named {
            fn descriptor(&self) -> ToolDescriptor {
                ToolDescriptor {
                    name: self.0.into(),
                    description: "test".into(),
                    params: vec![],
                    returns: ValueType::Str,
                    example_input: String::new(),
                    clarification: false,
                }
            }
            async fn call(&self, _args: Vec<ToolValue>) -> Result<ToolValue, ToolError> {
                Ok(ToolValue::Str("ok".into()))
            }
        }

        let mut registry = ToolRegistry::new();
        registry.register(Box::new(Named("zeta")));
        registry.register(Box::new(Named("alpha")));
        assert_eq!(registry.names(), vec!["zeta", "alpha"]);
    }

    #[test]
    fn describe_all_block_format() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        let block = registry.describe_all();
        assert_eq!(
            block,
            "\necho:\nDescription: Echoes back the input\nParameters:\n\ttext: str\n\tReturn type: str\ne.g. echo: hello\n"
        );
    }

    #[tokio::test]
    async fn registry_execute_tool() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));

        let tool = registry.resolve("echo").unwrap();
        let result = tool
            .call(vec![ToolValue::Str("hello world".into())])
            .await
            .unwrap();
        assert_eq!(result, ToolValue::Str("hello world".into()));
    }

    #[test]
    fn validate_accepts_declared_params() {
        let d = EchoTool.descriptor();
        let params = serde_json::json!({"text": "hi"});
        let args = d.validate(params.as_object().unwrap()).unwrap();
        assert_eq!(args, vec![ToolValue::Str("hi".into())]);
    }

    #[test]
    fn validate_rejects_missing_param() {
        let d = EchoTool.descriptor();
        let params = serde_json::json!({});
        let err = d.validate(params.as_object().unwrap()).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
        assert!(err.to_string().contains("text"));
    }

    #[test]
    fn validate_rejects_wrong_type() {
        let d = EchoTool.descriptor();
        let params = serde_json::json!({"text": 42});
        let err = d.validate(params.as_object().unwrap()).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[test]
    fn validate_rejects_unknown_param() {
        let d = EchoTool.descriptor();
        let params = serde_json::json!({"text": "hi", "volume": 11});
        let err = d.validate(params.as_object().unwrap()).unwrap_err();
        assert!(err.to_string().contains("volume"));
    }

    #[test]
    fn tool_value_display_forms() {
        assert_eq!(ToolValue::Int(5).to_string(), "5");
        assert_eq!(ToolValue::Str("Fast".into()).to_string(), "Fast");
        assert_eq!(
            ToolValue::List(vec!["Sunny".into(), "+20°C".into()]).to_string(),
            r#"["Sunny","+20°C"]"#
        );
    }
}
