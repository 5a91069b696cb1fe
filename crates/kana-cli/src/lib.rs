//! Command implementations behind the `kanatool` binary.

pub mod commands;

use std::path::Path;
use std::sync::Arc;

use kana_engine::romaji::{RuleTable, RuleTableError, RuleTrie};
use kana_engine::unicode::printable_ascii_keys;
use kana_engine::ConversionEngine;

/// How to turn a rule table into an engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineOptions {
    /// Add `c → c` rules for unclaimed printable ASCII.
    pub half_width: bool,
    /// Expand ambiguous terminals over printable ASCII.
    pub complement: bool,
}

/// Rule table from `path`, or the embedded default.
pub fn load_table(path: Option<&Path>) -> Result<RuleTable, RuleTableError> {
    match path {
        Some(path) => RuleTable::from_file(path),
        None => Ok(RuleTable::default_roman()),
    }
}

pub fn load_engine(
    path: Option<&Path>,
    options: EngineOptions,
) -> Result<ConversionEngine, RuleTableError> {
    let mut table = load_table(path)?;
    if options.half_width {
        table.add_half_width_rules(false);
    }
    let mut trie = RuleTrie::build(table);
    if options.complement {
        trie.complement(printable_ascii_keys());
    }
    Ok(ConversionEngine::new(Arc::new(trie)))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use kana_engine::romaji::TrieLookupResult;

    use super::*;

    #[test]
    fn default_table_when_no_path() {
        let mut engine = load_engine(None, EngineOptions::default()).unwrap();
        assert_eq!(engine.feed("kana").text(), "かな");
    }

    #[test]
    fn table_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "a\tあ").unwrap();
        writeln!(file, "x\t\t☆").unwrap();
        writeln!(file, "☆y\tほし").unwrap();

        let mut engine = load_engine(Some(file.path()), EngineOptions::default()).unwrap();
        assert_eq!(engine.feed("axy").text(), "あほし");
    }

    #[test]
    fn half_width_option() {
        let options = EngineOptions {
            half_width: true,
            ..EngineOptions::default()
        };
        let mut engine = load_engine(None, options).unwrap();
        assert_eq!(engine.feed("ka3").text(), "か3");
        assert!(matches!(engine.trie().lookup("3"), TrieLookupResult::Exact(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_engine(
            Some(Path::new("/nonexistent/table.tsv")),
            EngineOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, RuleTableError::Io(_)));
    }
}
