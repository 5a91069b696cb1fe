use serde::{Deserialize, Serialize};

use crate::unicode::printable_ascii;

/// One line of a romaji customization table.
///
/// Typing `input` produces `output`, then behaves as though `next_input`
/// had been typed right afterwards. None of the fields are restricted to
/// ASCII, so `next_input` can name an intermediate symbol that only other
/// rules consume (`x → "" + ☆`, `☆y → ほし`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConvertRule {
    pub input: String,
    pub output: String,
    pub next_input: String,
}

impl ConvertRule {
    pub fn new(
        input: impl Into<String>,
        output: impl Into<String>,
        next_input: impl Into<String>,
    ) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            next_input: next_input.into(),
        }
    }
}

/// Ordered rule list. Order matters: when two rules share an input the
/// later one wins inside the trie.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleTable {
    rules: Vec<ConvertRule>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, rule: ConvertRule) {
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ConvertRule> {
        self.rules.iter()
    }

    pub fn rules(&self) -> &[ConvertRule] {
        &self.rules
    }

    /// Append `c → c` for every character not already claimed as a whole
    /// rule input. A rule that merely starts with `c` (e.g. `!w`) does not
    /// block the identity rule for `!`.
    pub fn add_identity_rules<I>(&mut self, chars: I, overwrite: bool)
    where
        I: IntoIterator<Item = char>,
    {
        let mut claimed: std::collections::HashSet<String> =
            self.rules.iter().map(|r| r.input.clone()).collect();
        for c in chars {
            let key = c.to_string();
            if overwrite || !claimed.contains(&key) {
                self.rules.push(ConvertRule::new(key.clone(), key.clone(), ""));
                claimed.insert(key);
            }
        }
    }

    /// Identity rules for every printable ASCII character.
    pub fn add_half_width_rules(&mut self, overwrite: bool) {
        self.add_identity_rules(printable_ascii(), overwrite);
    }
}

impl FromIterator<ConvertRule> for RuleTable {
    fn from_iter<T: IntoIterator<Item = ConvertRule>>(iter: T) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for RuleTable {
    type Item = ConvertRule;
    type IntoIter = std::vec::IntoIter<ConvertRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.into_iter()
    }
}

impl<'a> IntoIterator for &'a RuleTable {
    type Item = &'a ConvertRule;
    type IntoIter = std::slice::Iter<'a, ConvertRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
