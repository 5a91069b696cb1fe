use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, OnceLock};

use tracing::{debug, debug_span, warn};

use super::config::{parse_rule_table, RuleTableError};
use super::rule::{ConvertRule, RuleTable};
use crate::settings::settings;

static CUSTOM_TABLE: OnceLock<String> = OnceLock::new();

pub type NodeId = usize;
pub type RuleId = usize;

pub const ROOT: NodeId = 0;

#[derive(Debug, PartialEq, Eq)]
pub enum TrieLookupResult<'a> {
    None,
    Prefix,
    Exact(&'a ConvertRule),
    ExactAndPrefix(&'a ConvertRule),
}

#[derive(Debug, Clone, Default)]
pub struct TrieNode {
    children: BTreeMap<char, NodeId>,
    terminal_rule: Option<RuleId>,
    /// Characters consumed from the root to reach this node.
    prefix: String,
}

impl TrieNode {
    pub fn child(&self, key: char) -> Option<NodeId> {
        self.children.get(&key).copied()
    }

    pub fn children(&self) -> &BTreeMap<char, NodeId> {
        &self.children
    }

    pub fn terminal_rule(&self) -> Option<RuleId> {
        self.terminal_rule
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Prefix trie over rule inputs, one node per character.
///
/// Nodes live in an arena addressed by [`NodeId`]; [`ROOT`] is always 0.
/// The trie is never mutated once shared, so engines hold it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct RuleTrie {
    nodes: Vec<TrieNode>,
    rules: Vec<ConvertRule>,
    shadowed: usize,
}

impl RuleTrie {
    /// Set a custom tab-separated table before the first `global()` call.
    pub fn init_custom(table_text: String) -> Result<(), RuleTableError> {
        // Validate eagerly
        parse_rule_table(&table_text)?;
        CUSTOM_TABLE
            .set(table_text)
            .map_err(|_| RuleTableError::AlreadyInitialized)
    }

    /// Get or initialize the shared trie built from the custom table, or
    /// from the embedded default table.
    pub fn global() -> Arc<RuleTrie> {
        static INSTANCE: OnceLock<Arc<RuleTrie>> = OnceLock::new();
        Arc::clone(INSTANCE.get_or_init(|| {
            let mut table = match CUSTOM_TABLE.get() {
                Some(text) => parse_rule_table(text).expect("custom rule table must be valid"),
                None => RuleTable::default_roman(),
            };
            if settings().table.half_width_identity {
                table.add_half_width_rules(false);
            }
            Arc::new(RuleTrie::build(table))
        }))
    }

    /// Build the trie from rules in order. A later rule with the same input
    /// replaces the earlier one at its terminal node.
    pub fn build<I>(rules: I) -> Self
    where
        I: IntoIterator<Item = ConvertRule>,
    {
        let _span = debug_span!("build_rule_trie").entered();
        let mut trie = RuleTrie {
            nodes: vec![TrieNode::default()],
            rules: Vec::new(),
            shadowed: 0,
        };
        for rule in rules {
            trie.insert(rule);
        }
        debug!(
            nodes = trie.nodes.len(),
            rules = trie.rules.len(),
            shadowed = trie.shadowed
        );
        trie
    }

    fn insert(&mut self, rule: ConvertRule) {
        if rule.input.is_empty() {
            warn!(output = %rule.output, "skipping rule with empty input");
            return;
        }
        let mut node = ROOT;
        for (offset, c) in rule.input.char_indices() {
            node = match self.nodes[node].child(c) {
                Some(child) => child,
                None => {
                    let id = self.nodes.len();
                    self.nodes.push(TrieNode {
                        prefix: rule.input[..offset + c.len_utf8()].to_string(),
                        ..TrieNode::default()
                    });
                    self.nodes[node].children.insert(c, id);
                    id
                }
            };
        }
        let id = self.rules.len();
        self.rules.push(rule);
        if let Some(previous) = self.nodes[node].terminal_rule.replace(id) {
            self.shadowed += 1;
            debug!(
                input = %self.rules[previous].input,
                "rule shadowed by a later rule with the same input"
            );
        }
    }

    /// Replace every ambiguous terminal (a rule that is also a strict prefix
    /// of a longer rule) with explicit leaf transitions for each key in
    /// `keys`. The synthesised rule for key `k` is
    /// `(input + k, output, next_input + k)`.
    ///
    /// For keys inside `keys` the text produced by the engine is unchanged;
    /// keys outside it no longer commit the shorter rule.
    pub fn complement<I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = char>,
    {
        let keys: BTreeSet<char> = keys.into_iter().collect();
        let original = self.nodes.len();
        let mut added = 0usize;
        for id in 0..original {
            if self.nodes[id].is_leaf() {
                continue;
            }
            let Some(rule_id) = self.nodes[id].terminal_rule.take() else {
                continue;
            };
            let base = self.rules[rule_id].clone();
            for &k in &keys {
                if self.nodes[id].children.contains_key(&k) {
                    continue;
                }
                let mut prefix = self.nodes[id].prefix.clone();
                prefix.push(k);
                let mut next_input = base.next_input.clone();
                next_input.push(k);

                let rule = self.rules.len();
                self.rules
                    .push(ConvertRule::new(prefix.clone(), base.output.clone(), next_input));
                let child = self.nodes.len();
                self.nodes.push(TrieNode {
                    children: BTreeMap::new(),
                    terminal_rule: Some(rule),
                    prefix,
                });
                self.nodes[id].children.insert(k, child);
                added += 1;
            }
        }
        debug!(added, "complemented ambiguous terminals");
    }

    pub fn root(&self) -> &TrieNode {
        &self.nodes[ROOT]
    }

    pub fn node(&self, id: NodeId) -> &TrieNode {
        &self.nodes[id]
    }

    pub fn rule(&self, id: RuleId) -> &ConvertRule {
        &self.rules[id]
    }

    /// All registered rules, shadowed ones included.
    pub fn rules(&self) -> &[ConvertRule] {
        &self.rules
    }

    /// Number of rules hidden by a later rule with the same input.
    pub fn shadowed_rules(&self) -> usize {
        self.shadowed
    }

    /// Node count, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root().is_leaf()
    }

    /// Walk `input` from the root.
    pub fn find(&self, input: &str) -> Option<NodeId> {
        input
            .chars()
            .try_fold(ROOT, |node, c| self.nodes[node].child(c))
    }

    pub fn lookup(&self, input: &str) -> TrieLookupResult<'_> {
        let Some(id) = self.find(input) else {
            return TrieLookupResult::None;
        };
        let node = &self.nodes[id];
        match (node.terminal_rule, node.is_leaf()) {
            (None, true) => TrieLookupResult::None,
            (None, false) => TrieLookupResult::Prefix,
            (Some(rule), true) => TrieLookupResult::Exact(&self.rules[rule]),
            (Some(rule), false) => TrieLookupResult::ExactAndPrefix(&self.rules[rule]),
        }
    }
}
