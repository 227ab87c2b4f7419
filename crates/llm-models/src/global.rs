//! Process-wide default registry
//!
//! Prefer passing a [`ModelRegistry`] explicitly. The functions here are a
//! convenience for code that has no registry at hand; they all operate on
//! one lazily created instance.

use crate::{Encoding, ModelConfigRule, ModelRegistry, PersonaRole, Result};
use std::sync::{Arc, Mutex, PoisonError};

static DEFAULT_REGISTRY: Mutex<Option<Arc<ModelRegistry>>> = Mutex::new(None);

/// The process-wide registry, created on first access
///
/// Concurrent first calls observe the same instance.
pub fn default_registry() -> Arc<ModelRegistry> {
    let mut slot = DEFAULT_REGISTRY
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    Arc::clone(slot.get_or_insert_with(|| Arc::new(ModelRegistry::new())))
}

/// Discard the process-wide registry
///
/// The next [`default_registry`] call builds a fresh instance with only the
/// built-in rules and an empty cache. Handles obtained earlier keep working
/// but are no longer the default.
pub fn reset_default_registry() {
    DEFAULT_REGISTRY
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .take();
}

/// Resolve a model on the default registry
pub fn get_config(model_id: &str) -> Result<Arc<ModelConfigRule>> {
    default_registry().get_config(model_id)
}

/// Persona role of a model on the default registry
pub fn get_persona_role(model_id: &str) -> Result<PersonaRole> {
    default_registry().get_persona_role(model_id)
}

/// Tokenizer encoding of a model on the default registry
pub fn get_encoding(model_id: &str) -> Result<Encoding> {
    default_registry().get_encoding(model_id)
}

/// Tool-call support of a model on the default registry
pub fn supports_tool_calls(model_id: &str) -> Result<bool> {
    default_registry().supports_tool_calls(model_id)
}

/// Family of a model on the default registry
pub fn get_family(model_id: &str) -> Result<Option<String>> {
    default_registry().get_family(model_id)
}

/// Register a rule on the default registry
pub fn configure_model(rule: ModelConfigRule) -> Result<()> {
    default_registry().register(rule)
}
