//! Romaji conversion engine and typing-automaton builder.
//!
//! Thin facade over `kana_core`, plus tracing setup for embedding hosts.

pub use kana_core::{automaton, engine, romaji, settings, unicode};

pub use kana_core::automaton::{AutomatonBuilder, AutomatonError, TypingAutomaton};
pub use kana_core::engine::{ConversionEngine, StepResult, Typed};
pub use kana_core::romaji::{ConvertRule, RuleTable, RuleTrie};

mod trace_init;

pub use trace_init::init_tracing;

/// Automaton for `target` over the global rule trie, typed with printable
/// ASCII keys.
pub fn typing_automaton(target: &str) -> Result<TypingAutomaton, AutomatonError> {
    let keys = unicode::printable_ascii_keys();
    TypingAutomaton::build(&ConversionEngine::global(), target, &keys)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_automaton_round_trip() {
        let automaton = typing_automaton("にほんご").unwrap();
        assert!(automaton.accepts("nihonngo"));
        for keys in automaton.key_sequences() {
            let mut engine = ConversionEngine::global();
            assert_eq!(engine.feed(&keys).text(), "にほんご");
        }
    }
}
