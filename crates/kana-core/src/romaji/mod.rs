//! Customizable romaji tables and the prefix trie built from them.
//!
//! A table is an ordered list of [`ConvertRule`]s (`input`, `output`,
//! `next_input`), loaded from tab-separated text or taken from the embedded
//! default. [`RuleTrie`] indexes rule inputs one character per node and is
//! shared read-only by every conversion engine.

mod config;
mod rule;
mod table;
mod trie;

pub use config::{parse_rule_table, RuleTableError};
pub use rule::{ConvertRule, RuleTable};
pub use table::DEFAULT_TABLE;
pub use trie::{NodeId, RuleId, RuleTrie, TrieLookupResult, TrieNode, ROOT};
