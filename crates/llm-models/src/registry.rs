//! Model configuration registry
//!
//! This module provides [`ModelRegistry`], a thread-safe, ordered rule list
//! that resolves model identifiers to [`ModelConfigRule`]s.

use crate::defaults::default_rules;
use crate::{Encoding, ModelConfigError, ModelConfigRule, PersonaRole, Result};
use llm_types::{Message, MessageContent};
use llm_utils::{Logger, PrefixedLogger, TracingLogger, wrap_logger};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Module tag used in the registry's log lines
const LOG_MODULE: &str = "model-config";

#[derive(Default)]
struct RegistryState {
    /// Most recently registered first
    rules: Vec<Arc<ModelConfigRule>>,
    /// Memoized resolutions; cleared on every rule change
    cache: HashMap<String, Arc<ModelConfigRule>>,
}

impl RegistryState {
    fn prepend(&mut self, rule: Arc<ModelConfigRule>) {
        self.rules.insert(0, rule);
        self.cache.clear();
    }

    fn load_defaults(&mut self) {
        self.rules.clear();
        self.cache.clear();
        for rule in default_rules() {
            self.prepend(Arc::new(rule));
        }
    }
}

/// A thread-safe registry mapping model identifiers to configuration
///
/// Rules are checked most-recently-registered first and the first match
/// wins. A fresh registry holds five built-in rules (Gemini, GPT-4,
/// O-series, Claude, then a catch-all), so every identifier resolves.
///
/// Resolutions are cached per identifier; a cached lookup returns the very
/// same `Arc`, so `Arc::ptr_eq` holds across repeated calls until the rule
/// set changes.
///
/// # Examples
///
/// ```
/// use llm_models::{Encoding, ModelConfigRule, ModelRegistry, Pattern, PersonaRole};
///
/// let registry = ModelRegistry::new();
/// assert_eq!(registry.get_family("claude-3-opus-20240229")?.as_deref(), Some("claude"));
///
/// registry.register(
///     ModelConfigRule::pattern(Pattern::new("^llama")?, PersonaRole::System, Encoding::Cl100kBase)
///         .with_family("llama"),
/// )?;
/// assert_eq!(registry.get_family("LLAMA-2")?.as_deref(), Some("llama"));
/// # Ok::<(), llm_models::ModelConfigError>(())
/// ```
pub struct ModelRegistry {
    state: Mutex<RegistryState>,
    logger: PrefixedLogger,
}

impl ModelRegistry {
    /// Create a registry with the built-in rules, logging through `tracing`
    pub fn new() -> Self {
        Self::with_logger(Arc::new(TracingLogger::new("llm-models")))
    }

    /// Create a registry with the built-in rules and a custom logger
    pub fn with_logger(logger: Arc<dyn Logger>) -> Self {
        let registry = Self::empty_with_logger(logger);
        registry.state().load_defaults();
        registry
    }

    /// Create a registry without any rules
    ///
    /// Without a catch-all, lookups of unmatched identifiers fail with
    /// [`ModelConfigError::NoConfiguration`].
    pub fn empty() -> Self {
        Self::empty_with_logger(Arc::new(TracingLogger::new("llm-models")))
    }

    /// Create a registry without any rules and with a custom logger
    pub fn empty_with_logger(logger: Arc<dyn Logger>) -> Self {
        Self {
            state: Mutex::new(RegistryState::default()),
            logger: wrap_logger(logger, Some(LOG_MODULE)),
        }
    }

    // Every critical section leaves the state consistent, so a poisoned
    // lock is safe to keep using.
    fn state(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a rule with the highest match priority
    ///
    /// Clears the whole resolution cache: the new rule may change the outcome
    /// for any previously resolved identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ModelConfigError::MissingMatcher`] or
    /// [`ModelConfigError::MatcherConflict`] if the rule does not carry
    /// exactly one matcher. The registry is left unchanged.
    pub fn register(&self, rule: ModelConfigRule) -> Result<()> {
        rule.validate()?;
        let rule = Arc::new(rule);

        self.state().prepend(Arc::clone(&rule));
        self.log_registered(&rule);
        Ok(())
    }

    /// Register several rules in order; the last one ends up with the
    /// highest priority
    ///
    /// All rules are validated before any is registered, and they are
    /// installed under a single lock.
    pub fn register_all(&self, rules: Vec<ModelConfigRule>) -> Result<()> {
        for rule in &rules {
            rule.validate()?;
        }
        let rules: Vec<_> = rules.into_iter().map(Arc::new).collect();

        {
            let mut state = self.state();
            for rule in &rules {
                state.prepend(Arc::clone(rule));
            }
        }

        for rule in &rules {
            self.log_registered(rule);
        }
        Ok(())
    }

    fn log_registered(&self, rule: &ModelConfigRule) {
        let family = rule.family.as_deref().unwrap_or("-");
        self.logger.debug(
            &format!(
                "Registered model config for family {family}: {}",
                rule.matcher_description()
            ),
            &[json!({
                "family": rule.family,
                "pattern": rule.pattern.as_ref().map(|p| p.as_str()),
                "exact_match": rule.exact_match,
            })],
        );
    }

    /// Resolve the configuration for a model identifier
    ///
    /// The identifier is used as given; case handling is up to each rule.
    ///
    /// # Errors
    ///
    /// Returns [`ModelConfigError::NoConfiguration`] when no rule matches,
    /// which only happens if the registry has no catch-all.
    pub fn get_config(&self, model_id: &str) -> Result<Arc<ModelConfigRule>> {
        let mut state = self.state();

        if let Some(rule) = state.cache.get(model_id) {
            return Ok(Arc::clone(rule));
        }

        let rule = state
            .rules
            .iter()
            .find(|rule| rule.matches(model_id))
            .cloned()
            .ok_or_else(|| ModelConfigError::NoConfiguration(model_id.to_string()))?;

        state
            .cache
            .insert(model_id.to_string(), Arc::clone(&rule));
        Ok(rule)
    }

    /// Role that carries system-level instructions for the model
    pub fn get_persona_role(&self, model_id: &str) -> Result<PersonaRole> {
        Ok(self.get_config(model_id)?.persona_role)
    }

    /// Tokenizer encoding for the model
    pub fn get_encoding(&self, model_id: &str) -> Result<Encoding> {
        Ok(self.get_config(model_id)?.encoding)
    }

    /// Whether the model supports tool calls (defaults to `true`)
    pub fn supports_tool_calls(&self, model_id: &str) -> Result<bool> {
        Ok(self.get_config(model_id)?.tool_calls_supported())
    }

    /// Family label of the model, if the matching rule sets one
    pub fn get_family(&self, model_id: &str) -> Result<Option<String>> {
        Ok(self.get_config(model_id)?.family.clone())
    }

    /// Token limit of the model, if the matching rule sets one
    pub fn get_max_tokens(&self, model_id: &str) -> Result<Option<u32>> {
        Ok(self.get_config(model_id)?.max_tokens)
    }

    /// Build the instruction message for a model, using its persona role
    ///
    /// # Examples
    ///
    /// ```
    /// use llm_models::ModelRegistry;
    /// use llm_types::Role;
    ///
    /// let registry = ModelRegistry::new();
    /// let msg = registry.persona_message("o1-preview", "Answer briefly.")?;
    /// assert_eq!(msg.role, Role::Developer);
    /// # Ok::<(), llm_models::ModelConfigError>(())
    /// ```
    pub fn persona_message(
        &self,
        model_id: &str,
        instructions: impl Into<String>,
    ) -> Result<Message> {
        let role = self.get_persona_role(model_id)?;
        Ok(Message::new(
            role.into(),
            MessageContent::Text(instructions.into()),
        ))
    }

    /// Drop every rule and cached resolution, then reinstall the built-in rules
    pub fn reset(&self) {
        self.state().load_defaults();
        self.logger.debug("Reset model registry to default configs", &[]);
    }

    /// Empty the resolution cache; rules are untouched
    pub fn clear_cache(&self) {
        let cleared = {
            let mut state = self.state();
            let cleared = state.cache.len();
            state.cache.clear();
            cleared
        };
        self.logger.debug(
            "Cleared model config cache",
            &[json!({ "entries": cleared })],
        );
    }

    /// Snapshot of the rules in match-priority order
    pub fn get_all_configs(&self) -> Vec<Arc<ModelConfigRule>> {
        self.state().rules.clone()
    }

    /// Number of registered rules
    pub fn len(&self) -> usize {
        self.state().rules.len()
    }

    /// Check if no rules are registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of cached resolutions
    pub fn cached_len(&self) -> usize {
        self.state().cache.len()
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        let families: Vec<_> = state
            .rules
            .iter()
            .map(|rule| rule.family.as_deref().unwrap_or("-"))
            .collect();

        f.debug_struct("ModelRegistry")
            .field("rule_count", &state.rules.len())
            .field("cached", &state.cache.len())
            .field("families", &families)
            .field("logger", &self.logger)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Pattern;
    use crate::defaults::UNKNOWN_FAMILY;
    use llm_types::Role;
    use llm_utils::NoopLogger;
    use serde_json::Value;

    fn registry() -> ModelRegistry {
        ModelRegistry::with_logger(Arc::new(NoopLogger))
    }

    fn family(registry: &ModelRegistry, model_id: &str) -> Option<String> {
        registry.get_family(model_id).unwrap()
    }

    #[test]
    fn test_new_registry_has_defaults_in_check_order() {
        let registry = registry();
        let families: Vec<_> = registry
            .get_all_configs()
            .iter()
            .map(|rule| rule.family.clone().unwrap())
            .collect();

        assert_eq!(
            families,
            vec!["gemini", "gpt-4", "o-series", "claude", UNKNOWN_FAMILY]
        );
        assert_eq!(registry.len(), 5);
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_gpt_4o() {
        let config = registry().get_config("gpt-4o").unwrap();
        assert_eq!(config.family.as_deref(), Some("gpt-4"));
        assert_eq!(config.persona_role, PersonaRole::System);
        assert_eq!(config.encoding, Encoding::Gpt4o);
    }

    #[test]
    fn test_claude() {
        let config = registry().get_config("claude-3-opus-20240229").unwrap();
        assert_eq!(config.family.as_deref(), Some("claude"));
        assert_eq!(config.persona_role, PersonaRole::System);
        assert_eq!(config.encoding, Encoding::Cl100kBase);
    }

    #[test]
    fn test_o_series() {
        let registry = registry();
        let config = registry.get_config("o1-preview").unwrap();
        assert_eq!(config.family.as_deref(), Some("o-series"));
        assert_eq!(config.persona_role, PersonaRole::Developer);
        assert_eq!(
            registry.get_persona_role("o3-mini").unwrap(),
            PersonaRole::Developer
        );
    }

    #[test]
    fn test_gemini() {
        let registry = registry();
        assert_eq!(family(&registry, "gemini-1.5-pro").as_deref(), Some("gemini"));
        assert_eq!(
            registry.get_encoding("Gemini-Ultra").unwrap(),
            Encoding::Cl100kBase
        );
    }

    #[test]
    fn test_unknown_model_falls_back() {
        let config = registry().get_config("unknown-model-xyz").unwrap();
        assert_eq!(config.family.as_deref(), Some(UNKNOWN_FAMILY));
        assert_eq!(config.persona_role, PersonaRole::System);
        assert_eq!(config.encoding, Encoding::Gpt4o);
    }

    #[test]
    fn test_prefix_patterns_are_anchored() {
        let registry = registry();
        assert_eq!(family(&registry, "my-claude").as_deref(), Some(UNKNOWN_FAMILY));
        assert_eq!(family(&registry, "gpt-3.5-turbo").as_deref(), Some(UNKNOWN_FAMILY));
        assert_eq!(family(&registry, "omni").as_deref(), Some(UNKNOWN_FAMILY));
    }

    #[test]
    fn test_case_insensitive_defaults() {
        let registry = registry();
        assert_eq!(family(&registry, "CLAUDE-3-HAIKU").as_deref(), Some("claude"));
        assert_eq!(family(&registry, "GPT-4-turbo").as_deref(), Some("gpt-4"));
        assert_eq!(family(&registry, "O1").as_deref(), Some("o-series"));
    }

    #[test]
    fn test_cache_returns_same_reference() {
        let registry = registry();
        let first = registry.get_config("gpt-4o").unwrap();
        let second = registry.get_config("gpt-4o").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.cached_len(), 1);
    }

    #[test]
    fn test_register_exact_match() {
        let registry = registry();
        registry
            .register(
                ModelConfigRule::exact("my-model", PersonaRole::Developer, Encoding::Cl100kBase)
                    .with_family("custom"),
            )
            .unwrap();

        assert_eq!(family(&registry, "my-model").as_deref(), Some("custom"));
        assert_eq!(
            registry.get_persona_role("my-model").unwrap(),
            PersonaRole::Developer
        );
        assert_eq!(family(&registry, "gpt-4o").as_deref(), Some("gpt-4"));
        assert_eq!(registry.len(), 6);
    }

    #[test]
    fn test_register_pattern_case_insensitive() {
        let registry = registry();
        registry
            .register(
                ModelConfigRule::pattern(
                    Pattern::new("^llama").unwrap(),
                    PersonaRole::System,
                    Encoding::Cl100kBase,
                )
                .with_family("llama"),
            )
            .unwrap();

        assert_eq!(family(&registry, "llama-3-70b").as_deref(), Some("llama"));
        assert_eq!(family(&registry, "LLAMA-2").as_deref(), Some("llama"));
    }

    #[test]
    fn test_register_invalidates_cache() {
        let registry = registry();
        let before = registry.get_config("gpt-4o-mini").unwrap();
        assert_eq!(before.family.as_deref(), Some("gpt-4"));

        let cached_fallback = registry.get_config("mistral-large").unwrap();
        assert_eq!(cached_fallback.family.as_deref(), Some(UNKNOWN_FAMILY));

        registry
            .register(
                ModelConfigRule::pattern(
                    Pattern::new("^gpt-4o").unwrap(),
                    PersonaRole::System,
                    Encoding::O200kBase,
                )
                .with_family("gpt-4o"),
            )
            .unwrap();
        registry
            .register(
                ModelConfigRule::exact("mistral-large", PersonaRole::System, Encoding::Cl100kBase)
                    .with_family("mistral"),
            )
            .unwrap();

        assert_eq!(registry.cached_len(), 0);
        let after = registry.get_config("gpt-4o-mini").unwrap();
        assert_eq!(after.family.as_deref(), Some("gpt-4o"));
        assert_eq!(after.encoding, Encoding::O200kBase);
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(family(&registry, "mistral-large").as_deref(), Some("mistral"));
    }

    #[test]
    fn test_last_registered_wins() {
        let registry = registry();
        for name in ["first", "second"] {
            registry
                .register(
                    ModelConfigRule::pattern(
                        Pattern::new("^shared").unwrap(),
                        PersonaRole::System,
                        Encoding::Gpt4o,
                    )
                    .with_family(name),
                )
                .unwrap();
        }

        assert_eq!(family(&registry, "shared-model").as_deref(), Some("second"));
    }

    #[test]
    fn test_register_without_matcher_fails() {
        let registry = registry();
        let before = registry.len();

        let result = registry.register(
            ModelConfigRule::new(PersonaRole::System, Encoding::Gpt4o).with_family("broken"),
        );

        let err = result.unwrap_err();
        assert!(matches!(err, ModelConfigError::MissingMatcher));
        assert_eq!(
            err.to_string(),
            "Model config must have either pattern or exactMatch"
        );
        assert_eq!(registry.len(), before);
    }

    #[test]
    fn test_register_with_both_matchers_fails() {
        let registry = registry();
        let rule = ModelConfigRule::exact("x", PersonaRole::System, Encoding::Gpt4o)
            .with_pattern(Pattern::new("^x").unwrap());

        assert!(matches!(
            registry.register(rule),
            Err(ModelConfigError::MatcherConflict { .. })
        ));
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn test_failed_register_keeps_cache() {
        let registry = registry();
        registry.get_config("claude-3").unwrap();

        let _ = registry.register(ModelConfigRule::default());
        assert_eq!(registry.cached_len(), 1);
    }

    #[test]
    fn test_reset_removes_custom_rules() {
        let registry = registry();
        registry
            .register(
                ModelConfigRule::exact("my-model", PersonaRole::Developer, Encoding::Cl100kBase)
                    .with_family("custom"),
            )
            .unwrap();
        assert_eq!(family(&registry, "my-model").as_deref(), Some("custom"));

        registry.reset();

        assert_eq!(registry.len(), 5);
        assert_eq!(registry.cached_len(), 0);
        assert_eq!(family(&registry, "my-model").as_deref(), Some(UNKNOWN_FAMILY));
        assert_eq!(family(&registry, "gemini-pro").as_deref(), Some("gemini"));
    }

    #[test]
    fn test_clear_cache_keeps_results() {
        let registry = registry();
        let ids = ["gpt-4o", "claude-3", "o1", "gemini-pro", "whatever"];
        let before: Vec<_> = ids.iter().map(|id| registry.get_config(id).unwrap()).collect();
        assert_eq!(registry.cached_len(), ids.len());

        registry.clear_cache();
        assert_eq!(registry.cached_len(), 0);
        assert_eq!(registry.len(), 5);

        for (id, old) in ids.iter().zip(&before) {
            let new = registry.get_config(id).unwrap();
            assert_eq!(*new, **old);
            // same rule object, just recomputed
            assert!(Arc::ptr_eq(&new, old));
        }
    }

    #[test]
    fn test_get_all_configs_is_snapshot() {
        let registry = registry();
        let mut snapshot = registry.get_all_configs();
        snapshot.clear();

        assert_eq!(registry.len(), 5);
        assert_eq!(registry.get_all_configs().len(), 5);
    }

    #[test]
    fn test_empty_registry_reports_missing_config() {
        let registry = ModelRegistry::empty_with_logger(Arc::new(NoopLogger));
        assert!(registry.is_empty());

        let err = registry.get_config("gpt-4o").unwrap_err();
        assert!(matches!(err, ModelConfigError::NoConfiguration(ref id) if id == "gpt-4o"));
        assert_eq!(err.to_string(), "No configuration found for model: gpt-4o");
        assert!(registry.get_family("gpt-4o").is_err());
        assert!(registry.supports_tool_calls("gpt-4o").is_err());
        assert_eq!(registry.cached_len(), 0);
    }

    #[test]
    fn test_supports_tool_calls_and_max_tokens() {
        let registry = registry();
        assert!(registry.supports_tool_calls("gpt-4o").unwrap());

        registry
            .register(
                ModelConfigRule::exact("tiny", PersonaRole::System, Encoding::Gpt4o)
                    .with_tool_calls(false)
                    .with_max_tokens(2048),
            )
            .unwrap();
        registry
            .register(ModelConfigRule::exact("plain", PersonaRole::System, Encoding::Gpt4o))
            .unwrap();

        assert!(!registry.supports_tool_calls("tiny").unwrap());
        assert_eq!(registry.get_max_tokens("tiny").unwrap(), Some(2048));
        assert!(registry.supports_tool_calls("plain").unwrap());
        assert_eq!(registry.get_family("plain").unwrap(), None);
        assert_eq!(registry.get_max_tokens("gpt-4o").unwrap(), None);
    }

    #[test]
    fn test_register_all_orders_and_validates() {
        let registry = registry();
        let good = |family: &str| {
            ModelConfigRule::pattern(
                Pattern::new("^mixtral").unwrap(),
                PersonaRole::System,
                Encoding::Cl100kBase,
            )
            .with_family(family)
        };

        let result = registry.register_all(vec![good("a"), ModelConfigRule::default()]);
        assert!(result.is_err());
        assert_eq!(registry.len(), 5);

        registry.register_all(vec![good("a"), good("b")]).unwrap();
        assert_eq!(registry.len(), 7);
        assert_eq!(family(&registry, "mixtral-8x7b").as_deref(), Some("b"));
    }

    #[test]
    fn test_persona_message() {
        let registry = registry();
        let dev = registry.persona_message("o1", "Think step by step").unwrap();
        assert_eq!(dev.role, Role::Developer);
        assert_eq!(dev.text().as_deref(), Some("Think step by step"));

        let sys = registry.persona_message("claude-3", "Be kind").unwrap();
        assert_eq!(sys.role, Role::System);
    }

    #[test]
    fn test_debug_events_emitted() {
        use std::sync::Mutex;

        #[derive(Default)]
        struct Capture(Mutex<Vec<String>>);

        impl Logger for Capture {
            fn name(&self) -> &str {
                "capture"
            }
            fn debug(&self, message: &str, _meta: &[Value]) {
                self.0.lock().unwrap().push(message.to_string());
            }
            fn info(&self, _: &str, _: &[Value]) {}
            fn warn(&self, _: &str, _: &[Value]) {}
            fn error(&self, _: &str, _: &[Value]) {}
            fn verbose(&self, _: &str, _: &[Value]) {}
            fn silly(&self, _: &str, _: &[Value]) {}
        }

        let capture = Arc::new(Capture::default());
        let registry = ModelRegistry::with_logger(capture.clone());
        // defaults are installed without per-rule events
        assert!(capture.0.lock().unwrap().is_empty());

        registry
            .register(
                ModelConfigRule::exact("m", PersonaRole::System, Encoding::Gpt4o).with_family("f"),
            )
            .unwrap();
        registry.clear_cache();
        registry.reset();
        let _ = registry.register(ModelConfigRule::default());

        let lines = capture.0.lock().unwrap().clone();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "[llm-contracts][model-config] Registered model config for family f: exact 'm'"
        );
        assert!(lines[1].ends_with("Cleared model config cache"));
        assert!(lines[2].ends_with("Reset model registry to default configs"));
    }

    #[test]
    fn test_concurrent_access() {
        let registry = Arc::new(registry());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        if i % 2 == 0 {
                            registry
                                .register(
                                    ModelConfigRule::exact(
                                        format!("model-{i}"),
                                        PersonaRole::System,
                                        Encoding::Gpt4o,
                                    )
                                    .with_family("threaded"),
                                )
                                .unwrap();
                        } else {
                            let config = registry.get_config("claude-3").unwrap();
                            assert_eq!(config.family.as_deref(), Some("claude"));
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.len(), 5 + 4 * 50);
        assert_eq!(family(&registry, "model-0").as_deref(), Some("threaded"));
    }

    #[test]
    fn test_debug() {
        let debug = format!("{:?}", registry());
        assert!(debug.contains("ModelRegistry"));
        assert!(debug.contains("gemini"));
    }
}
