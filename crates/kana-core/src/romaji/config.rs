use std::fs;
use std::io;
use std::path::Path;

use super::rule::{ConvertRule, RuleTable};

#[derive(Debug, thiserror::Error)]
pub enum RuleTableError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("line {line} has {fields} fields, expected 2 or 3: {content:?}")]
    FieldCount {
        line: usize,
        fields: usize,
        content: String,
    },
    #[error("rule trie already initialized")]
    AlreadyInitialized,
}

/// Parse a tab-separated rule table.
///
/// Each non-blank line is `input<TAB>output` or `input<TAB>output<TAB>next_input`.
/// Line numbers in errors are 1-based.
pub fn parse_rule_table(text: &str) -> Result<RuleTable, RuleTableError> {
    let mut table = RuleTable::new();
    for (i, raw) in text.lines().enumerate() {
        let line = raw.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        let rule = match fields.as_slice() {
            [input, output] => ConvertRule::new(*input, *output, ""),
            [input, output, next_input] => ConvertRule::new(*input, *output, *next_input),
            _ => {
                return Err(RuleTableError::FieldCount {
                    line: i + 1,
                    fields: fields.len(),
                    content: line.to_string(),
                })
            }
        };
        table.add(rule);
    }
    Ok(table)
}

impl RuleTable {
    pub fn parse(text: &str) -> Result<Self, RuleTableError> {
        parse_rule_table(text)
    }

    pub fn from_file(path: &Path) -> Result<Self, RuleTableError> {
        let text = fs::read_to_string(path)?;
        parse_rule_table(&text)
    }
}
