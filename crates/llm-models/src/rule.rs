//! Model configuration rules
//!
//! A [`ModelConfigRule`] pairs a matcher (regex pattern or exact model id)
//! with the behavioral metadata applied to every model it matches.

use crate::{ModelConfigError, Result};
use llm_types::Role;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Conversational role that carries system-level instructions for a model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonaRole {
    /// Instructions go in a `system` message
    #[default]
    System,
    /// Instructions go in a `developer` message (o-series models)
    Developer,
}

impl PersonaRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonaRole::System => "system",
            PersonaRole::Developer => "developer",
        }
    }
}

impl fmt::Display for PersonaRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<PersonaRole> for Role {
    fn from(role: PersonaRole) -> Self {
        match role {
            PersonaRole::System => Role::System,
            PersonaRole::Developer => Role::Developer,
        }
    }
}

/// Symbolic tokenizer encoding identifier
///
/// Only names the scheme; no tokenization happens in this workspace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Encoding {
    #[default]
    #[serde(rename = "gpt-4o")]
    Gpt4o,
    #[serde(rename = "cl100k_base")]
    Cl100kBase,
    #[serde(rename = "o200k_base")]
    O200kBase,
}

impl Encoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Encoding::Gpt4o => "gpt-4o",
            Encoding::Cl100kBase => "cl100k_base",
            Encoding::O200kBase => "o200k_base",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compiled model-id pattern
///
/// Case-insensitive unless built with [`Pattern::case_sensitive`]. Matching
/// is a search, not a full match: anchor with `^`/`$` where needed.
#[derive(Clone)]
pub struct Pattern {
    regex: Regex,
    case_insensitive: bool,
}

impl Pattern {
    /// Compile a case-insensitive pattern
    pub fn new(source: &str) -> Result<Self> {
        Self::with_case(source, true)
    }

    /// Compile a pattern that respects case
    pub fn case_sensitive(source: &str) -> Result<Self> {
        Self::with_case(source, false)
    }

    /// Compile a pattern with explicit case handling
    pub fn with_case(source: &str, case_insensitive: bool) -> Result<Self> {
        let regex = RegexBuilder::new(source)
            .case_insensitive(case_insensitive)
            .build()
            .map_err(|source_err| ModelConfigError::InvalidPattern {
                pattern: source.to_string(),
                source: source_err,
            })?;

        Ok(Self {
            regex,
            case_insensitive,
        })
    }

    /// Pattern source text
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    /// Test a model identifier against the pattern
    pub fn is_match(&self, model_id: &str) -> bool {
        self.regex.is_match(model_id)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.case_insensitive {
            write!(f, "/{}/i", self.as_str())
        } else {
            write!(f, "/{}/", self.as_str())
        }
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pattern({self})")
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str() && self.case_insensitive == other.case_insensitive
    }
}

impl Eq for Pattern {}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One matching rule plus the configuration it resolves to
///
/// Exactly one of `pattern` / `exact_match` must be set; the registry
/// rejects anything else at registration time.
///
/// # Example
///
/// ```
/// use llm_models::{Encoding, ModelConfigRule, Pattern, PersonaRole};
///
/// let rule = ModelConfigRule::pattern(
///     Pattern::new("^llama").unwrap(),
///     PersonaRole::System,
///     Encoding::Cl100kBase,
/// )
/// .with_family("llama");
///
/// assert!(rule.matches("Llama-3-70b"));
/// assert!(rule.tool_calls_supported());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModelConfigRule {
    /// Regex matcher
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<Pattern>,

    /// Exact model-id matcher
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exact_match: Option<String>,

    /// Role that carries system-level instructions
    pub persona_role: PersonaRole,

    /// Tokenizer encoding
    pub encoding: Encoding,

    /// Tool-calling support; `None` means supported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supports_tool_calls: Option<bool>,

    /// Context/output token limit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Family label (e.g. "claude", "gpt-4")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,

    /// Human-readable description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ModelConfigRule {
    /// Rule with no matcher yet; attach one with [`with_pattern`](Self::with_pattern)
    /// or [`with_exact_match`](Self::with_exact_match)
    pub fn new(persona_role: PersonaRole, encoding: Encoding) -> Self {
        Self {
            persona_role,
            encoding,
            ..Self::default()
        }
    }

    /// Rule matching a pattern
    pub fn pattern(pattern: Pattern, persona_role: PersonaRole, encoding: Encoding) -> Self {
        Self::new(persona_role, encoding).with_pattern(pattern)
    }

    /// Rule matching one exact model id
    pub fn exact(
        model_id: impl Into<String>,
        persona_role: PersonaRole,
        encoding: Encoding,
    ) -> Self {
        Self::new(persona_role, encoding).with_exact_match(model_id)
    }

    pub fn with_pattern(mut self, pattern: Pattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn with_exact_match(mut self, model_id: impl Into<String>) -> Self {
        self.exact_match = Some(model_id.into());
        self
    }

    pub fn with_tool_calls(mut self, supported: bool) -> Self {
        self.supports_tool_calls = Some(supported);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = Some(family.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Check that exactly one matcher is set
    pub fn validate(&self) -> Result<()> {
        match (&self.pattern, &self.exact_match) {
            (Some(_), None) | (None, Some(_)) => Ok(()),
            (None, None) => Err(ModelConfigError::MissingMatcher),
            (Some(pattern), Some(exact)) => Err(ModelConfigError::MatcherConflict {
                pattern: pattern.to_string(),
                exact_match: exact.clone(),
            }),
        }
    }

    /// Test a model identifier against this rule
    ///
    /// An exact matcher compares the raw identifier; otherwise the pattern is
    /// tested. A rule without a matcher matches nothing.
    pub fn matches(&self, model_id: &str) -> bool {
        if let Some(exact) = &self.exact_match {
            exact == model_id
        } else if let Some(pattern) = &self.pattern {
            pattern.is_match(model_id)
        } else {
            false
        }
    }

    /// Whether tool calls are supported (absent means yes)
    pub fn tool_calls_supported(&self) -> bool {
        self.supports_tool_calls.unwrap_or(true)
    }

    /// Short text describing the matcher, for diagnostics
    pub fn matcher_description(&self) -> String {
        match (&self.exact_match, &self.pattern) {
            (Some(exact), _) => format!("exact '{exact}'"),
            (None, Some(pattern)) => format!("pattern {pattern}"),
            (None, None) => "no matcher".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pattern_case_insensitive_by_default() {
        let pattern = Pattern::new("^claude").unwrap();
        assert!(pattern.is_match("claude-3-opus"));
        assert!(pattern.is_match("Claude-3-Opus"));
        assert!(!pattern.is_match("my-claude"));
        assert_eq!(pattern.to_string(), "/^claude/i");
    }

    #[test]
    fn test_pattern_case_sensitive() {
        let pattern = Pattern::case_sensitive("^gpt").unwrap();
        assert!(pattern.is_match("gpt-4"));
        assert!(!pattern.is_match("GPT-4"));
        assert_eq!(pattern.to_string(), "/^gpt/");
    }

    #[test]
    fn test_invalid_pattern() {
        let err = Pattern::new("^(unclosed").unwrap_err();
        assert!(matches!(err, ModelConfigError::InvalidPattern { ref pattern, .. } if pattern == "^(unclosed"));
    }

    #[test]
    fn test_validate_matchers() {
        let rule = ModelConfigRule::default();
        assert!(matches!(
            rule.validate(),
            Err(ModelConfigError::MissingMatcher)
        ));

        let both = ModelConfigRule::exact("x", PersonaRole::System, Encoding::Gpt4o)
            .with_pattern(Pattern::new("x").unwrap());
        assert!(matches!(
            both.validate(),
            Err(ModelConfigError::MatcherConflict { .. })
        ));

        let ok = ModelConfigRule::exact("x", PersonaRole::System, Encoding::Gpt4o);
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_exact_match_is_case_sensitive() {
        let rule = ModelConfigRule::exact("my-model", PersonaRole::Developer, Encoding::Cl100kBase);
        assert!(rule.matches("my-model"));
        assert!(!rule.matches("MY-MODEL"));
        assert!(!rule.matches("my-model-2"));
    }

    #[test]
    fn test_rule_without_matcher_matches_nothing() {
        assert!(!ModelConfigRule::default().matches("anything"));
        assert_eq!(ModelConfigRule::default().matcher_description(), "no matcher");
    }

    #[test]
    fn test_tool_calls_default_true() {
        let rule = ModelConfigRule::exact("a", PersonaRole::System, Encoding::Gpt4o);
        assert!(rule.tool_calls_supported());
        assert!(!rule.with_tool_calls(false).tool_calls_supported());
    }

    #[test]
    fn test_persona_role_into_message_role() {
        assert_eq!(Role::from(PersonaRole::System), Role::System);
        assert_eq!(Role::from(PersonaRole::Developer), Role::Developer);
    }

    #[test]
    fn test_serialize_rule() {
        let rule = ModelConfigRule::pattern(
            Pattern::new("^o\\d+").unwrap(),
            PersonaRole::Developer,
            Encoding::Gpt4o,
        )
        .with_family("o-series");

        assert_eq!(
            serde_json::to_value(&rule).unwrap(),
            json!({
                "pattern": "^o\\d+",
                "persona_role": "developer",
                "encoding": "gpt-4o",
                "family": "o-series",
            })
        );
    }

    #[test]
    fn test_encoding_names() {
        assert_eq!(Encoding::Cl100kBase.to_string(), "cl100k_base");
        assert_eq!(
            serde_json::from_value::<Encoding>(json!("o200k_base")).unwrap(),
            Encoding::O200kBase
        );
    }
}
