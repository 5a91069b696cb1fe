mod basic;

use std::collections::{BTreeSet, VecDeque};
use std::sync::Arc;

use super::*;
use crate::romaji::{ConvertRule, RuleTable, RuleTrie};
use crate::unicode::printable_ascii_keys;

fn rule(input: &str, output: &str, next_input: &str) -> ConvertRule {
    ConvertRule::new(input, output, next_input)
}

fn engine(rules: &[ConvertRule]) -> ConversionEngine {
    ConversionEngine::new(Arc::new(RuleTrie::build(rules.iter().cloned())))
}

fn roman() -> ConversionEngine {
    ConversionEngine::new(Arc::new(RuleTrie::build(RuleTable::default_roman())))
}

fn build(engine: &ConversionEngine, target: &str) -> TypingAutomaton {
    TypingAutomaton::build(engine, target, &printable_ascii_keys()).unwrap()
}

fn sequences(automaton: &TypingAutomaton) -> BTreeSet<String> {
    automaton.key_sequences().collect()
}

fn typed(engine: &ConversionEngine, keys: &str) -> String {
    let mut fresh = engine.clone();
    fresh.reset();
    fresh.feed(keys).text()
}

/// Every state lies on some start-to-goal path.
fn assert_trim(automaton: &TypingAutomaton) {
    let n = automaton.state_count();

    let mut forward = vec![false; n];
    let mut queue = VecDeque::from([automaton.start()]);
    while let Some(id) = queue.pop_front() {
        if std::mem::replace(&mut forward[id], true) {
            continue;
        }
        queue.extend(automaton.state(id).children().values().copied());
    }

    let mut backward = vec![false; n];
    let mut queue = VecDeque::from([automaton.goal()]);
    while let Some(id) = queue.pop_front() {
        if std::mem::replace(&mut backward[id], true) {
            continue;
        }
        queue.extend(automaton.state(id).parents().iter().map(|&(_, p)| p));
    }

    for id in 0..n {
        assert!(forward[id], "state {id} unreachable from start");
        assert!(backward[id], "state {id} cannot reach goal");
    }
}
