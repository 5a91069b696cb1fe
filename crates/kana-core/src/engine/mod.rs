//! Sequential key-to-text conversion over a shared [`RuleTrie`].
//!
//! A [`ConversionEngine`] is a single cursor into the trie. Each key either
//! advances the cursor, commits a rule, or flushes the pending prefix as
//! literal text. Rules commit as soon as no longer rule can extend them; a
//! rule that is a strict prefix of another is held until the next key
//! decides between the two.


use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::trace;

use crate::romaji::{ConvertRule, NodeId, RuleTrie, ROOT};
use crate::settings::settings;

/// Outcome of feeding one character through the trie.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct StepResult {
    /// The key advanced the cursor along at least one edge.
    pub moved: bool,
    /// Rule committed by this step.
    pub matched_rule: Option<ConvertRule>,
    /// Text to emit now: a committed rule's output or abandoned input.
    pub output: String,
    /// Text to feed back immediately, as if freshly typed.
    pub next_input: String,
    /// Pending prefix while the cursor waits on a non-root node.
    pub buffer: String,
}

impl StepResult {
    fn commit(rule: &ConvertRule, next_input: String, moved: bool) -> Self {
        StepResult {
            moved,
            matched_rule: Some(rule.clone()),
            output: rule.output.clone(),
            next_input,
            buffer: String::new(),
        }
    }

    fn literal(output: String, next_input: String) -> Self {
        StepResult {
            moved: false,
            matched_rule: None,
            output,
            next_input,
            buffer: String::new(),
        }
    }

    fn pending(buffer: &str) -> Self {
        StepResult {
            moved: true,
            buffer: buffer.to_string(),
            ..StepResult::default()
        }
    }
}

/// Text produced by a run of keys: what has been committed, and what is
/// still waiting in the buffer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Typed {
    pub committed: String,
    pub pending: String,
}

impl Typed {
    /// Committed text followed by the pending buffer, as an IME would
    /// display it.
    pub fn text(&self) -> String {
        format!("{}{}", self.committed, self.pending)
    }
}

/// Cursor over a shared, immutable [`RuleTrie`].
///
/// `Clone` is the cheap snapshot used to branch conversions: only the
/// cursor is duplicated, the trie stays shared.
#[derive(Clone)]
pub struct ConversionEngine {
    trie: Arc<RuleTrie>,
    cursor: NodeId,
    max_chain_depth: usize,
}

impl ConversionEngine {
    pub fn new(trie: Arc<RuleTrie>) -> Self {
        Self {
            trie,
            cursor: ROOT,
            max_chain_depth: settings().engine.max_chain_depth,
        }
    }

    /// Engine over the global rule trie.
    pub fn global() -> Self {
        Self::new(RuleTrie::global())
    }

    pub fn with_max_chain_depth(mut self, depth: usize) -> Self {
        self.max_chain_depth = depth;
        self
    }

    pub fn trie(&self) -> &Arc<RuleTrie> {
        &self.trie
    }

    /// The engine is idle (cursor on the root).
    pub fn finished(&self) -> bool {
        self.cursor == ROOT
    }

    /// Input consumed but not yet resolved.
    pub fn buffer(&self) -> &str {
        self.trie.node(self.cursor).prefix()
    }

    pub fn reset(&mut self) {
        self.cursor = ROOT;
    }

    /// Keys that can continue the current match, plus keys that start a new
    /// one (an ambiguous match can always be abandoned).
    pub fn possible_input(&self) -> BTreeSet<char> {
        let mut keys: BTreeSet<char> = self
            .trie
            .node(self.cursor)
            .children()
            .keys()
            .copied()
            .collect();
        keys.extend(self.trie.root().children().keys().copied());
        keys
    }

    /// Consume one character without following `next_input`.
    pub fn step(&mut self, key: char) -> StepResult {
        let (cursor, result) = transition(&self.trie, self.cursor, key);
        self.cursor = cursor;
        result
    }

    /// Consume one key and follow every `next_input` it produces.
    ///
    /// Forwarded text must be consumed whole: if the engine returns to the
    /// root before the last forwarded character, the whole forwarded string
    /// is emitted literally instead. At most `max_chain_depth` rounds are
    /// followed, so rules whose `next_input` cycles terminate.
    pub fn input(&mut self, key: char) -> Vec<StepResult> {
        let mut results = vec![self.step(key)];
        let mut depth = 0;
        loop {
            let pending = match results.last() {
                Some(last) if !last.next_input.is_empty() => last.next_input.clone(),
                _ => break,
            };
            if depth >= self.max_chain_depth {
                trace!(depth, pending = %pending, "next_input chain truncated");
                break;
            }
            depth += 1;
            self.forward(&pending, &mut results);
        }
        results
    }

    /// Run a string of keys through `input`.
    pub fn feed(&mut self, keys: &str) -> Typed {
        let mut committed = String::new();
        for key in keys.chars() {
            for result in self.input(key) {
                committed.push_str(&result.output);
            }
        }
        Typed {
            committed,
            pending: self.buffer().to_string(),
        }
    }

    fn forward(&mut self, pending: &str, results: &mut Vec<StepResult>) {
        let start = results.len();
        let mut chars = pending.chars().peekable();
        while let Some(c) = chars.next() {
            results.push(self.step(c));
            if chars.peek().is_some() && self.finished() {
                results.truncate(start);
                self.cursor = ROOT;
                results.push(StepResult::literal(pending.to_string(), String::new()));
                return;
            }
        }
    }
}

/// Single-key transition from `cursor`. Returns the new cursor and what
/// the step produced.
fn transition(trie: &RuleTrie, cursor: NodeId, key: char) -> (NodeId, StepResult) {
    let current = trie.node(cursor);
    let Some(next_id) = current.child(key) else {
        // No rule continues with `key`: resolve whatever was pending.
        let result = if let Some(rule_id) = current.terminal_rule() {
            let rule = trie.rule(rule_id);
            let mut next_input = rule.next_input.clone();
            next_input.push(key);
            StepResult::commit(rule, next_input, false)
        } else if !current.prefix().is_empty() {
            StepResult::literal(current.prefix().to_string(), key.to_string())
        } else {
            StepResult::literal(key.to_string(), String::new())
        };
        return (ROOT, result);
    };

    let next = trie.node(next_id);
    match next.terminal_rule() {
        Some(rule_id) if next.is_leaf() => {
            let rule = trie.rule(rule_id);
            (ROOT, StepResult::commit(rule, rule.next_input.clone(), true))
        }
        _ => (next_id, StepResult::pending(next.prefix())),
    }
}

impl PartialEq for ConversionEngine {
    /// Same trie allocation and same cursor.
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.trie, &other.trie) && self.cursor == other.cursor
    }
}

impl Eq for ConversionEngine {}

impl fmt::Debug for ConversionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionEngine")
            .field("cursor", &self.cursor)
            .field("buffer", &self.buffer())
            .field("max_chain_depth", &self.max_chain_depth)
            .finish()
    }
}
