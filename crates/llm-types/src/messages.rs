//! Message types for LLM communication
//!
//! A message is a role plus optional content. Content is either a single
//! string or an ordered list of strings; providers decide how to join or
//! split the parts for their wire format.

use serde::{Deserialize, Serialize};

/// Message role in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions
    System,
    /// Developer instructions (used instead of `system` by some model families)
    Developer,
    /// User message
    User,
    /// Assistant message
    Assistant,
    /// Tool output fed back to the model
    Tool,
}

impl Role {
    /// Wire name of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::Developer => "developer",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Message content: a single string or an ordered sequence of strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Simple text content
    Text(String),
    /// Ordered text parts
    Parts(Vec<String>),
}

impl From<String> for MessageContent {
    fn from(text: String) -> Self {
        MessageContent::Text(text)
    }
}

impl From<&str> for MessageContent {
    fn from(text: &str) -> Self {
        MessageContent::Text(text.to_string())
    }
}

impl From<Vec<String>> for MessageContent {
    fn from(parts: Vec<String>) -> Self {
        MessageContent::Parts(parts)
    }
}

/// A message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message role
    pub role: Role,

    /// Message content; `null` on the wire when absent
    pub content: Option<MessageContent>,

    /// Optional participant name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Message {
    /// Create a message with any role
    pub fn new(role: Role, content: impl Into<MessageContent>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            name: None,
        }
    }

    /// Create a user message with text
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, MessageContent::Text(text.into()))
    }

    /// Create an assistant message with text
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, MessageContent::Text(text.into()))
    }

    /// Create a system message with text
    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Role::System, MessageContent::Text(text.into()))
    }

    /// Create a developer message with text
    pub fn developer(text: impl Into<String>) -> Self {
        Self::new(Role::Developer, MessageContent::Text(text.into()))
    }

    /// Create a tool-output message
    pub fn tool(text: impl Into<String>) -> Self {
        Self::new(Role::Tool, MessageContent::Text(text.into()))
    }

    /// Create a message with no content (e.g. an assistant turn that only
    /// carried tool calls)
    pub fn empty(role: Role) -> Self {
        Self {
            role,
            content: None,
            name: None,
        }
    }

    /// Attach a participant name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Text of the message, with parts joined by newlines
    pub fn text(&self) -> Option<String> {
        match &self.content {
            Some(MessageContent::Text(s)) => Some(s.clone()),
            Some(MessageContent::Parts(parts)) => Some(parts.join("\n")),
            None => None,
        }
    }

    /// Check whether the message carries any content
    pub fn has_content(&self) -> bool {
        match &self.content {
            Some(MessageContent::Text(_)) => true,
            Some(MessageContent::Parts(parts)) => !parts.is_empty(),
            None => false,
        }
    }
}
