//! Tool registry: the set of remotely invocable tools.
//!
//! Tool definitions (name, description, input schema) are kept in
//! registration order for `tools/list`; handlers are looked up by name for
//! `tools/call`. The registry is built once at startup and shared immutably
//! across the transports, so concurrent calls need no locking.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

/// An MCP tool definition, serialized in `tools/list` responses.
#[derive(Serialize, Debug, Clone)]
pub struct McpTool {
    /// Unique tool identifier (e.g. "add", "random_number").
    pub name: String,
    /// Human-readable description of what the tool does.
    pub description: String,
    /// JSON Schema defining the tool's input parameters.
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// A tool handler: JSON arguments in, JSON result or failure message out.
///
/// `Err` means the call itself failed (malformed arguments); operation
/// errors defined by a tool's contract are returned in `Ok` as values.
/// Handlers must be `Send + Sync` so the HTTP workers can share them.
pub type ToolHandler = Box<dyn Fn(Value) -> Result<Value, String> + Send + Sync>;

/// Registry of available MCP tools.
pub struct ToolRegistry {
    tools: Vec<McpTool>,
    handlers: HashMap<String, ToolHandler>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            handlers: HashMap::new(),
        }
    }

    /// Add a tool and its handler. Tool names must be unique; registering a
    /// duplicate replaces the handler but keeps the first definition, so
    /// toolset modules are expected to avoid collisions.
    pub fn register(&mut self, tool: McpTool, handler: ToolHandler) {
        debug_assert!(
            !self.handlers.contains_key(&tool.name),
            "duplicate tool name: {}",
            tool.name
        );
        self.handlers.insert(tool.name.clone(), handler);
        self.tools.push(tool);
    }

    /// All registered tool definitions, in registration order.
    pub fn tools(&self) -> &[McpTool] {
        &self.tools
    }

    /// Invoke a tool by name. `None` means the tool is not registered.
    pub fn invoke(&self, name: &str, arguments: Value) -> Option<Result<Value, String>> {
        self.handlers.get(name).map(|handler| handler(arguments))
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
    use serde_json::json;

    fn sample_tool(name: &str) -> McpTool {
        McpTool {
            name: name.to_string(),
            description: format!("test tool {name}"),
            input_schema: json!({ "type": "object", "properties": {} }),
        }
    }

    #[test]
    fn registered_tools_are_listed_in_order() {
        let mut registry = ToolRegistry::new();
        registry.register(sample_tool("first"), Box::new(|_| Ok(json!(1))));
        registry.register(sample_tool("second"), Box::new(|_| Ok(json!(2))));

        let names: Vec<&str> = registry.tools().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["first", "second"]);
    }

    #[test]
    fn invoke_routes_by_name() {
        let mut registry = ToolRegistry::new();
        registry.register(
            sample_tool("double"),
            Box::new(|args| Ok(json!(args["n"].as_i64().unwrap_or(0) * 2))),
        );

        let result = registry.invoke("double", json!({ "n": 21 }));
        assert_eq!(result, Some(Ok(json!(42))));
    }

    #[test]
    fn invoke_unknown_tool_is_none() {
        let registry = ToolRegistry::new();
        assert!(registry.invoke("missing", json!({})).is_none());
    }

    #[test]
    fn tool_definition_serializes_camel_case_schema_field() {
        let serialized = serde_json::to_value(sample_tool("echoish")).expect("serializable");
        assert!(serialized.get("inputSchema").is_some());
        assert!(serialized.get("input_schema").is_none());
    }
}
