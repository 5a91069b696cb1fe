use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, debug_span, trace};

use super::{prune, AutomatonConfig, AutomatonError, BuildStats, State, StateId, TypingAutomaton};
use crate::engine::ConversionEngine;

const START: StateId = 0;

/// Builds [`TypingAutomaton`]s for one engine and key set.
#[derive(Debug, Clone)]
pub struct AutomatonBuilder {
    engine: ConversionEngine,
    keys: BTreeSet<char>,
    config: AutomatonConfig,
}

impl AutomatonBuilder {
    /// The engine is reset; its trie and chain depth are what the
    /// automaton will model.
    pub fn new(mut engine: ConversionEngine, inputtable_keys: BTreeSet<char>) -> Self {
        engine.reset();
        Self {
            engine,
            keys: inputtable_keys,
            config: AutomatonConfig::default(),
        }
    }

    pub fn with_config(mut self, config: AutomatonConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &AutomatonConfig {
        &self.config
    }

    pub fn build(&self, target: &str) -> Result<TypingAutomaton, AutomatonError> {
        let _span = debug_span!("build_automaton", target, keys = self.keys.len()).entered();

        let mut search = Search::new(
            target,
            &self.keys,
            self.config.max_steps,
            self.engine.clone(),
        );
        if let Err(err) = search.run() {
            debug!(
                explored = search.stats.explored,
                key_trials = search.stats.key_trials,
                %err,
                "search aborted"
            );
            return Err(err);
        }

        let Some(&goal) = search.by_output.get(target) else {
            debug!(states = search.states.len(), "goal never reached");
            return Err(AutomatonError::Unreachable {
                target: target.to_string(),
            });
        };

        let raw_states = search.states.len();
        let stats = search.stats;
        let pruned = prune::prune(&search.states, START, goal, &search.by_output);

        let automaton = TypingAutomaton {
            target: target.to_string(),
            states: pruned.states,
            start: pruned.start,
            goal: pruned.goal,
            by_output: pruned.by_output,
            stats,
        };
        debug!(
            raw_states,
            states = automaton.state_count(),
            edges = automaton.edge_count(),
            explored = stats.explored,
            key_trials = stats.key_trials,
            "automaton built"
        );
        Ok(automaton)
    }
}

/// Working state of one build. States are kept in an arena; `engines` runs
/// parallel to `states` and is dropped with the search.
struct Search<'a> {
    target: &'a str,
    keys: &'a BTreeSet<char>,
    max_steps: usize,
    states: Vec<State>,
    engines: Vec<ConversionEngine>,
    by_output: BTreeMap<String, StateId>,
    /// Merged states created since the last round, with their output length.
    created: Vec<(StateId, usize)>,
    /// Engines on the current depth-first path, with their output length.
    path: Vec<(ConversionEngine, usize)>,
    stats: BuildStats,
}

impl<'a> Search<'a> {
    fn new(
        target: &'a str,
        keys: &'a BTreeSet<char>,
        max_steps: usize,
        engine: ConversionEngine,
    ) -> Self {
        let mut search = Search {
            target,
            keys,
            max_steps,
            states: Vec::new(),
            engines: Vec::new(),
            by_output: BTreeMap::new(),
            created: Vec::new(),
            path: Vec::new(),
            stats: BuildStats::default(),
        };
        let start = search.add_state(engine);
        search.by_output.insert(String::new(), start);
        search
    }

    /// Breadth-first over merged states, depth-first within a rule.
    fn run(&mut self) -> Result<(), AutomatonError> {
        let mut frontier = vec![(START, 0)];
        let mut round = 0;
        while !frontier.is_empty() {
            trace!(round, frontier = frontier.len(), "search round");
            for (state, produced) in frontier {
                self.path.push((self.engines[state].clone(), produced));
                let explored = self.explore(state, produced);
                self.path.pop();
                explored?;
            }
            frontier = std::mem::take(&mut self.created);
            round += 1;
        }
        Ok(())
    }

    fn explore(&mut self, state: StateId, produced: usize) -> Result<(), AutomatonError> {
        self.stats.explored += 1;
        self.check_budget()?;

        let target = self.target;
        let Some(next_char) = target[produced..].chars().next() else {
            return Ok(());
        };

        let engine = self.engines[state].clone();
        let mut candidates: BTreeSet<char> = engine
            .possible_input()
            .intersection(self.keys)
            .copied()
            .collect();
        // The next target character is tried like any other key, so it only
        // becomes an edge when the engine really displays it.
        if self.keys.contains(&next_char) {
            candidates.insert(next_char);
        }

        for key in candidates {
            self.try_key(state, &engine, key, produced)?;
        }
        Ok(())
    }

    fn try_key(
        &mut self,
        state: StateId,
        engine: &ConversionEngine,
        key: char,
        produced: usize,
    ) -> Result<(), AutomatonError> {
        self.stats.key_trials += 1;
        self.check_budget()?;

        let target = self.target;
        let rest = &target[produced..];
        let mut next = engine.clone();
        let results = next.input(key);
        let Some(last) = results.last() else {
            return Ok(());
        };
        let output: String = results.iter().map(|r| r.output.as_str()).collect();

        // Committed text plus the pending buffer finish the target.
        if rest.strip_prefix(output.as_str()) == Some(last.buffer.as_str()) {
            let goal = self.merged_state(target.len(), next);
            self.connect(state, key, goal);
            return Ok(());
        }

        if !output.is_empty() {
            let Some(remaining) = rest.strip_prefix(output.as_str()) else {
                return Ok(());
            };
            let produced = produced + output.len();
            if next.finished() {
                let merged = self.merged_state(produced, next);
                self.connect(state, key, merged);
            } else if !remaining.is_empty() {
                self.descend(state, key, next, produced)?;
            }
            return Ok(());
        }

        if last.moved {
            self.descend(state, key, next, produced)?;
        }
        Ok(())
    }

    /// Continue mid-rule through a fresh state. Engines already on the
    /// current path at the same output length are skipped, which keeps the
    /// graph acyclic.
    fn descend(
        &mut self,
        parent: StateId,
        key: char,
        engine: ConversionEngine,
        produced: usize,
    ) -> Result<(), AutomatonError> {
        if self
            .path
            .iter()
            .any(|(seen, len)| *len == produced && *seen == engine)
        {
            return Ok(());
        }
        let child = self.add_state(engine.clone());
        self.connect(parent, key, child);

        self.path.push((engine, produced));
        let explored = self.explore(child, produced);
        self.path.pop();
        explored
    }

    /// State for `target[..produced]` with an idle engine, created on first
    /// use and queued for the next round.
    fn merged_state(&mut self, produced: usize, engine: ConversionEngine) -> StateId {
        let output = &self.target[..produced];
        if let Some(&id) = self.by_output.get(output) {
            return id;
        }
        let id = self.add_state(engine);
        self.by_output.insert(output.to_string(), id);
        if produced < self.target.len() {
            self.created.push((id, produced));
        }
        id
    }

    fn add_state(&mut self, engine: ConversionEngine) -> StateId {
        let id = self.states.len();
        self.states.push(State::default());
        self.engines.push(engine);
        id
    }

    fn connect(&mut self, from: StateId, key: char, to: StateId) {
        let previous = self.states[from].children.insert(key, to);
        debug_assert!(previous.is_none(), "edge {from} --{key:?}--> added twice");
        self.states[to].parents.push((key, from));
    }

    fn check_budget(&self) -> Result<(), AutomatonError> {
        let steps = self.stats.steps();
        if steps > self.max_steps {
            return Err(AutomatonError::SearchTruncated { steps });
        }
        Ok(())
    }
}
