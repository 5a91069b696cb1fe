//! Reverse search: every key sequence that types a given target string.
//!
//! The builder runs [`ConversionEngine`] copies forward from each state,
//! trying every key the engine can use. States that have produced the same
//! prefix of the target (with an idle engine) are merged, so the result is
//! a compact DAG rather than a list of sequences. Once the goal is known,
//! every edge that cannot reach it is removed.

mod paths;
mod prune;
mod search;

#[cfg(test)]
mod tests;

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::engine::ConversionEngine;
use crate::settings::settings;

pub use paths::KeySequences;
pub use search::AutomatonBuilder;

pub type StateId = usize;

#[derive(Debug, thiserror::Error)]
pub enum AutomatonError {
    #[error("search truncated after {steps} steps")]
    SearchTruncated { steps: usize },
    #[error("no key sequence produces {target:?}")]
    Unreachable { target: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutomatonConfig {
    /// State expansions plus key trials allowed before giving up.
    pub max_steps: usize,
}

impl Default for AutomatonConfig {
    fn default() -> Self {
        Self {
            max_steps: settings().automaton.max_steps,
        }
    }
}

/// Search counters, reported with the finished automaton.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    /// States whose outgoing keys were enumerated.
    pub explored: usize,
    /// Keys fed through a cloned engine.
    pub key_trials: usize,
}

impl BuildStats {
    pub fn steps(&self) -> usize {
        self.explored + self.key_trials
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    children: BTreeMap<char, StateId>,
    parents: Vec<(char, StateId)>,
}

impl State {
    pub fn children(&self) -> &BTreeMap<char, StateId> {
        &self.children
    }

    /// Incoming edges as `(key, parent)`.
    pub fn parents(&self) -> &[(char, StateId)] {
        &self.parents
    }

    pub fn transition(&self, key: char) -> Option<StateId> {
        self.children.get(&key).copied()
    }
}

/// Pruned key-sequence graph for one target string.
///
/// The graph is acyclic. Keys that leave the engine exactly where it was
/// without producing output (a rule `q → ""` typed while idle) would need a
/// self-loop, so sequences containing such zero-progress runs are not
/// represented: with `q → ""` and `a → あ`, `qa` types `あ` but only `a` is
/// accepted.
#[derive(Debug, Clone)]
pub struct TypingAutomaton {
    target: String,
    states: Vec<State>,
    start: StateId,
    goal: StateId,
    by_output: BTreeMap<String, StateId>,
    stats: BuildStats,
}

impl TypingAutomaton {
    /// Build with the default [`AutomatonConfig`].
    pub fn build(
        engine: &ConversionEngine,
        target: &str,
        inputtable_keys: &BTreeSet<char>,
    ) -> Result<Self, AutomatonError> {
        AutomatonBuilder::new(engine.clone(), inputtable_keys.clone()).build(target)
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn start(&self) -> StateId {
        self.start
    }

    /// The state reached once the whole target is displayed.
    pub fn goal(&self) -> StateId {
        self.goal
    }

    pub fn state(&self, id: StateId) -> &State {
        &self.states[id]
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Merged states keyed by the prefix of the target produced so far.
    pub fn states_by_output(&self) -> &BTreeMap<String, StateId> {
        &self.by_output
    }

    /// Output prefix of a merged state; `None` for states reached mid-rule.
    pub fn output_of(&self, id: StateId) -> Option<&str> {
        self.by_output
            .iter()
            .find(|(_, &state)| state == id)
            .map(|(output, _)| output.as_str())
    }

    pub fn transition(&self, from: StateId, key: char) -> Option<StateId> {
        self.states[from].transition(key)
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn edge_count(&self) -> usize {
        self.states.iter().map(|s| s.children.len()).sum()
    }

    /// `keys` leads from the start state exactly to the goal.
    pub fn accepts(&self, keys: &str) -> bool {
        keys.chars()
            .try_fold(self.start, |state, key| self.transition(state, key))
            == Some(self.goal)
    }

    /// Every start-to-goal key sequence, smallest keys first.
    pub fn key_sequences(&self) -> KeySequences<'_> {
        KeySequences::new(self)
    }

    pub fn stats(&self) -> BuildStats {
        self.stats
    }

    pub fn export(&self) -> AutomatonExport {
        let mut outputs: Vec<Option<String>> = vec![None; self.states.len()];
        for (output, &id) in &self.by_output {
            outputs[id] = Some(output.clone());
        }
        AutomatonExport {
            target: self.target.clone(),
            start: self.start,
            goal: self.goal,
            stats: self.stats,
            states: self
                .states
                .iter()
                .zip(outputs)
                .enumerate()
                .map(|(id, (state, output))| StateExport {
                    id,
                    output,
                    edges: state.children.clone(),
                })
                .collect(),
        }
    }
}

/// Serializable snapshot of a [`TypingAutomaton`].
#[derive(Debug, Clone, Serialize)]
pub struct AutomatonExport {
    pub target: String,
    pub start: StateId,
    pub goal: StateId,
    pub stats: BuildStats,
    pub states: Vec<StateExport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StateExport {
    pub id: StateId,
    pub output: Option<String>,
    pub edges: BTreeMap<char, StateId>,
}
