//! File-based model rules
//!
//! Custom rules can be kept in a JSON file and applied on top of the
//! built-ins:
//!
//! ```json
//! {
//!   "models": [
//!     {
//!       "pattern": "^llama",
//!       "persona_role": "system",
//!       "encoding": "cl100k_base",
//!       "family": "llama"
//!     },
//!     {
//!       "exact_match": "my-finetune",
//!       "persona_role": "developer",
//!       "encoding": "o200k_base",
//!       "supports_tool_calls": false,
//!       "max_tokens": 8192
//!     }
//!   ]
//! }
//! ```
//!
//! Entries are registered in file order, so later entries take precedence.

use crate::{Encoding, ModelConfigRule, ModelRegistry, Pattern, PersonaRole, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Root of a model rules file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    /// Rules in registration order
    #[serde(default)]
    pub models: Vec<ModelRuleConfig>,
}

/// One rule as written in a rules file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelRuleConfig {
    /// Regex source; matched case-insensitively unless `case_sensitive`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Exact model id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exact_match: Option<String>,

    #[serde(default)]
    pub case_sensitive: bool,

    pub persona_role: PersonaRole,

    pub encoding: Encoding,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supports_tool_calls: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ModelRuleConfig {
    /// Compile into a rule
    ///
    /// Matcher presence is checked by the registry on registration, not here.
    pub fn to_rule(&self) -> Result<ModelConfigRule> {
        let pattern = self
            .pattern
            .as_deref()
            .map(|source| Pattern::with_case(source, !self.case_sensitive))
            .transpose()?;

        Ok(ModelConfigRule {
            pattern,
            exact_match: self.exact_match.clone(),
            persona_role: self.persona_role,
            encoding: self.encoding,
            supports_tool_calls: self.supports_tool_calls,
            max_tokens: self.max_tokens,
            family: self.family.clone(),
            description: self.description.clone(),
        })
    }
}

impl RegistryConfig {
    /// Load a rules file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: Self = llm_utils::config::load_json(path)?;
        debug!(path = %path.display(), rules = config.models.len(), "Loaded model rules file");
        Ok(config)
    }

    /// Compile every entry, failing on the first bad pattern
    pub fn to_rules(&self) -> Result<Vec<ModelConfigRule>> {
        self.models.iter().map(ModelRuleConfig::to_rule).collect()
    }
}

impl ModelRegistry {
    /// Register every rule from a config, in order
    ///
    /// Nothing is registered unless every entry compiles and carries exactly
    /// one matcher. Returns the number of rules registered.
    pub fn apply_config(&self, config: &RegistryConfig) -> Result<usize> {
        let rules = config.to_rules()?;
        let count = rules.len();
        self.register_all(rules)?;
        Ok(count)
    }
}
