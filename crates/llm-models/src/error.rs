//! Error types for model configuration

use thiserror::Error;

/// Result type for model configuration operations
pub type Result<T> = std::result::Result<T, ModelConfigError>;

/// Configuration errors raised by the model registry
///
/// None of these are transient: the caller has to fix the rule or the
/// registry contents, retrying changes nothing.
#[derive(Error, Debug)]
pub enum ModelConfigError {
    /// A rule was registered without any matcher
    #[error("Model config must have either pattern or exactMatch")]
    MissingMatcher,

    /// A rule was registered with both matchers set
    #[error("Model config must have either pattern or exactMatch, not both (pattern: {pattern}, exactMatch: {exact_match})")]
    MatcherConflict { pattern: String, exact_match: String },

    /// No registered rule matches the identifier
    #[error("No configuration found for model: {0}")]
    NoConfiguration(String),

    /// A pattern failed to compile
    #[error("Invalid model pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Loading a rules file failed
    #[error(transparent)]
    Config(#[from] llm_utils::Error),
}
