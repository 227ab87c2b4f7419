//! Built-in model rules
//!
//! Rules are listed in registration order. The registry prepends on every
//! registration, so the catch-all registered first ends up checked last and
//! never shadows a family rule.

use crate::{Encoding, ModelConfigRule, Pattern, PersonaRole};
use std::sync::LazyLock;

/// Family label of the catch-all rule
pub const UNKNOWN_FAMILY: &str = "unknown";

static DEFAULT_RULES: LazyLock<Vec<ModelConfigRule>> = LazyLock::new(|| {
    vec![
        family_rule(".*", PersonaRole::System, Encoding::Gpt4o, UNKNOWN_FAMILY)
            .with_description("Fallback for unrecognized models"),
        family_rule("^claude", PersonaRole::System, Encoding::Cl100kBase, "claude")
            .with_description("Anthropic Claude models"),
        family_rule(r"^o\d+", PersonaRole::Developer, Encoding::Gpt4o, "o-series")
            .with_description("OpenAI o-series reasoning models"),
        family_rule("^gpt-4", PersonaRole::System, Encoding::Gpt4o, "gpt-4")
            .with_description("OpenAI GPT-4 family"),
        family_rule("^gemini", PersonaRole::System, Encoding::Cl100kBase, "gemini")
            .with_description("Google Gemini models"),
    ]
});

fn family_rule(
    source: &str,
    persona_role: PersonaRole,
    encoding: Encoding,
    family: &str,
) -> ModelConfigRule {
    let pattern = Pattern::new(source).expect("built-in model pattern compiles");
    ModelConfigRule::pattern(pattern, persona_role, encoding)
        .with_tool_calls(true)
        .with_family(family)
}

/// The five built-in rules, in registration order
pub fn default_rules() -> Vec<ModelConfigRule> {
    DEFAULT_RULES.clone()
}
