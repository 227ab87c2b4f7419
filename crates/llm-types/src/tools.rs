//! Tool definitions and tool-call records

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tool the model may call
///
/// The input schema is carried as opaque JSON; nothing in this workspace
/// validates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name
    pub name: String,

    /// Description of what the tool does
    pub description: String,

    /// JSON schema for the tool's input parameters
    pub input_schema: Value,
}

impl ToolDefinition {
    /// Create a new tool definition
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

/// A tool invocation requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Provider-assigned call id, echoed back with the result
    pub id: String,

    /// Name of the tool to call
    pub name: String,

    /// Arguments as the model produced them
    #[serde(default)]
    pub arguments: Value,
}

impl ToolCall {
    /// Create a tool-call record
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }

    /// Look up a single named argument
    pub fn argument(&self, key: &str) -> Option<&Value> {
        self.arguments.get(key)
    }
}
