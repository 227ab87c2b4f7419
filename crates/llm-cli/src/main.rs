//! Command-line interface for llm-contracts model configuration

mod output;

use anyhow::Context;
use clap::{Parser, Subcommand};
use llm_models::{RegistryConfig, default_registry};
use output::{Resolution, RuleRow};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "llm-models", version)]
#[command(about = "Inspect how model identifiers resolve to configuration", long_about = None)]
struct Args {
    /// JSON file with extra model rules, applied on top of the built-ins
    #[arg(short, long, env = "LLM_MODELS_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Tracing filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    /// Print JSON instead of a table
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve model identifiers to their configuration
    Resolve {
        /// Model identifiers, e.g. gpt-4o claude-3-opus-20240229
        #[arg(required = true)]
        models: Vec<String>,
    },
    /// List registered rules in match-priority order
    List,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    llm_utils::init_tracing_with_filter(&args.log_level);

    let registry = default_registry();

    if let Some(path) = &args.config {
        let config = RegistryConfig::from_file(path)?;
        let count = registry
            .apply_config(&config)
            .with_context(|| format!("Failed to apply model rules from {}", path.display()))?;
        info!(count, path = %path.display(), "Applied custom model rules");
    }

    let rendered = match args.command {
        Command::Resolve { models } => {
            let rows = models
                .iter()
                .map(|id| {
                    registry
                        .get_config(id)
                        .map(|rule| Resolution::new(id, &rule))
                })
                .collect::<Result<Vec<_>, _>>()?;
            output::render(&rows, args.json)?
        }
        Command::List => {
            let rows: Vec<_> = registry
                .get_all_configs()
                .iter()
                .enumerate()
                .map(|(index, rule)| RuleRow::new(index + 1, rule))
                .collect();
            output::render(&rows, args.json)?
        }
    };

    println!("{rendered}");
    Ok(())
}
