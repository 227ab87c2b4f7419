//! Example demonstrating custom model rules
//!
//! This example shows how to:
//! - Resolve models against the built-in rules
//! - Register a rule that overrides a built-in family
//! - Build the instruction message with the right persona role

use llm_models::{Encoding, ModelConfigRule, ModelRegistry, Pattern, PersonaRole};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    llm_utils::init_tracing_with_filter("debug");

    let registry = ModelRegistry::new();

    println!("=== Built-in rules ===");
    for model in ["gpt-4o", "claude-3-opus-20240229", "o1-preview", "mistral-large"] {
        let config = registry.get_config(model)?;
        println!(
            "{model:<28} family={:<10} persona={:<10} encoding={}",
            config.family.as_deref().unwrap_or("-"),
            config.persona_role,
            config.encoding,
        );
    }
    println!();

    // A later registration wins over the built-in gpt-4 rule
    registry.register(
        ModelConfigRule::pattern(
            Pattern::new("^gpt-4o")?,
            PersonaRole::System,
            Encoding::O200kBase,
        )
        .with_family("gpt-4o")
        .with_max_tokens(128_000),
    )?;

    println!("=== After registering a gpt-4o rule ===");
    let config = registry.get_config("gpt-4o-mini")?;
    println!(
        "gpt-4o-mini family={} encoding={} max_tokens={:?}",
        config.family.as_deref().unwrap_or("-"),
        config.encoding,
        config.max_tokens,
    );
    println!();

    let message = registry.persona_message("o3-mini", "Answer in one sentence.")?;
    println!("Instruction message for o3-mini uses role: {}", message.role);

    Ok(())
}
