use super::{StateId, TypingAutomaton};

/// Lazy depth-first walk over start-to-goal paths.
///
/// The automaton is acyclic, so the walk terminates, but the number of
/// paths can grow exponentially with the target length.
pub struct KeySequences<'a> {
    automaton: &'a TypingAutomaton,
    stack: Vec<(StateId, String)>,
}

impl<'a> KeySequences<'a> {
    pub(super) fn new(automaton: &'a TypingAutomaton) -> Self {
        Self {
            automaton,
            stack: vec![(automaton.start(), String::new())],
        }
    }
}

impl Iterator for KeySequences<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        while let Some((state, keys)) = self.stack.pop() {
            for (&key, &child) in self.automaton.state(state).children().iter().rev() {
                let mut next = keys.clone();
                next.push(key);
                self.stack.push((child, next));
            }
            if state == self.automaton.goal() {
                return Some(keys);
            }
        }
        None
    }
}
