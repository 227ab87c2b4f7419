//! Provider-agnostic LLM contracts for llm-contracts
//!
//! This crate holds the plain data shapes exchanged with LLM backends. It
//! includes:
//!
//! - Message types for conversations
//! - Request/response types passed across the provider boundary
//! - Tool definitions and tool-call records
//! - Execution options and streaming chunks
//! - The [`Provider`] trait implemented by concrete backends elsewhere
//!
//! Nothing here performs network I/O.

pub mod error;
pub mod messages;
pub mod options;
pub mod provider;
pub mod request;
pub mod response;
pub mod stream;
pub mod tools;

// Re-export main types
pub use error::{LLMError, Result};
pub use messages::{Message, MessageContent, Role};
pub use options::ExecutionOptions;
pub use provider::Provider;
pub use request::LLMRequest;
pub use response::{ProviderResponse, TokenUsage};
pub use stream::StreamChunk;
pub use tools::{ToolCall, ToolDefinition};
