//! Embedded default romaji table.

use super::config::parse_rule_table;
use super::rule::RuleTable;

/// Hepburn/kunrei romaji table with sokuon (`kk → っ`, next `k`), hatsuon
/// (`n`, `nn`, `n'`, `xn`), small kana (`x`/`l`), and Japanese punctuation.
pub const DEFAULT_TABLE: &str = include_str!("default_roman_table.tsv");

impl RuleTable {
    /// The embedded default table, without identity rules.
    pub fn default_roman() -> Self {
        parse_rule_table(DEFAULT_TABLE).expect("embedded romaji table must be valid")
    }
}
