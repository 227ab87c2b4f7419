//! Model configuration registry for llm-contracts
//!
//! Maps model identifiers to the behavioral metadata providers need:
//! which role carries system instructions, which tokenizer encoding applies,
//! whether tool calls are supported, and which family a model belongs to.
//!
//! # Quick Start
//!
//! ```
//! use llm_models::{Encoding, ModelRegistry, PersonaRole};
//!
//! let registry = ModelRegistry::new();
//!
//! assert_eq!(registry.get_persona_role("o1-preview")?, PersonaRole::Developer);
//! assert_eq!(registry.get_encoding("claude-3-opus-20240229")?, Encoding::Cl100kBase);
//! assert_eq!(registry.get_family("unknown-model-xyz")?.as_deref(), Some("unknown"));
//! # Ok::<(), llm_models::ModelConfigError>(())
//! ```
//!
//! # Custom rules
//!
//! Rules registered later take precedence over earlier ones, including the
//! built-ins:
//!
//! ```
//! use llm_models::{Encoding, ModelConfigRule, ModelRegistry, PersonaRole};
//!
//! let registry = ModelRegistry::new();
//! registry.register(
//!     ModelConfigRule::exact("my-model", PersonaRole::Developer, Encoding::Cl100kBase)
//!         .with_family("custom"),
//! )?;
//!
//! assert_eq!(registry.get_family("my-model")?.as_deref(), Some("custom"));
//! assert_eq!(registry.get_family("gpt-4o")?.as_deref(), Some("gpt-4"));
//! # Ok::<(), llm_models::ModelConfigError>(())
//! ```

pub mod config;
mod defaults;
mod error;
mod global;
mod registry;
mod rule;

pub use config::{ModelRuleConfig, RegistryConfig};
pub use defaults::{UNKNOWN_FAMILY, default_rules};
pub use error::{ModelConfigError, Result};
pub use global::{
    configure_model, default_registry, get_config, get_encoding, get_family, get_persona_role,
    reset_default_registry, supports_tool_calls,
};
pub use registry::ModelRegistry;
pub use rule::{Encoding, ModelConfigRule, Pattern, PersonaRole};
