//! Table and JSON rendering for CLI output

use comfy_table::Table;
use llm_models::ModelConfigRule;
use serde::Serialize;

/// A row printable either as a table line or as a JSON object
pub trait TableRow: Serialize {
    fn header() -> Vec<&'static str>;
    fn cells(&self) -> Vec<String>;
}

/// Render rows as a table, or as a pretty JSON array
pub fn render<T: TableRow>(rows: &[T], json: bool) -> anyhow::Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(rows)?);
    }

    let mut table = Table::new();
    table.set_header(T::header());
    for row in rows {
        table.add_row(row.cells());
    }
    Ok(table.to_string())
}

fn or_dash(value: Option<impl ToString>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// How one model identifier resolved
#[derive(Debug, Serialize)]
pub struct Resolution {
    pub model: String,
    pub family: Option<String>,
    pub persona_role: String,
    pub encoding: String,
    pub supports_tool_calls: bool,
    pub max_tokens: Option<u32>,
    pub matched_by: String,
}

impl Resolution {
    pub fn new(model: &str, rule: &ModelConfigRule) -> Self {
        Self {
            model: model.to_string(),
            family: rule.family.clone(),
            persona_role: rule.persona_role.to_string(),
            encoding: rule.encoding.to_string(),
            supports_tool_calls: rule.tool_calls_supported(),
            max_tokens: rule.max_tokens,
            matched_by: rule.matcher_description(),
        }
    }
}

impl TableRow for Resolution {
    fn header() -> Vec<&'static str> {
        vec![
            "MODEL",
            "FAMILY",
            "PERSONA",
            "ENCODING",
            "TOOLS",
            "MAX TOKENS",
            "MATCHED BY",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.model.clone(),
            or_dash(self.family.as_deref()),
            self.persona_role.clone(),
            self.encoding.clone(),
            self.supports_tool_calls.to_string(),
            or_dash(self.max_tokens),
            self.matched_by.clone(),
        ]
    }
}

/// One registered rule, with its match priority (1 = checked first)
#[derive(Debug, Serialize)]
pub struct RuleRow {
    pub priority: usize,
    #[serde(flatten)]
    pub rule: ModelConfigRule,
}

impl RuleRow {
    pub fn new(priority: usize, rule: &ModelConfigRule) -> Self {
        Self {
            priority,
            rule: rule.clone(),
        }
    }
}

impl TableRow for RuleRow {
    fn header() -> Vec<&'static str> {
        vec![
            "#",
            "MATCHER",
            "FAMILY",
            "PERSONA",
            "ENCODING",
            "TOOLS",
            "DESCRIPTION",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.priority.to_string(),
            self.rule.matcher_description(),
            or_dash(self.rule.family.as_deref()),
            self.rule.persona_role.to_string(),
            self.rule.encoding.to_string(),
            self.rule.tool_calls_supported().to_string(),
            or_dash(self.rule.description.as_deref()),
        ]
    }
}
