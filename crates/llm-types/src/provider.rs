//! Provider trait definition

use crate::{ExecutionOptions, LLMRequest, ProviderResponse, Result};
use async_trait::async_trait;

/// Trait for LLM providers
///
/// Implementations live outside this workspace and wrap a specific vendor
/// backend (OpenAI, Anthropic, Gemini, ...). Downstream code only sees this
/// contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Provider: Send + Sync {
    /// Execute a request against the backend
    ///
    /// # Arguments
    ///
    /// * `request` - The conversation and target model
    /// * `options` - Per-call overrides (credentials, sampling, timeout)
    async fn execute(
        &self,
        request: LLMRequest,
        options: ExecutionOptions,
    ) -> Result<ProviderResponse>;

    /// Get the provider name (e.g., "anthropic", "openai")
    fn name(&self) -> &str;
}
