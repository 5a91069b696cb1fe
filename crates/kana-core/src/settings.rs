//! Global settings loaded from TOML, following the same OnceLock pattern as the rule trie.
//!
//! - `init_custom(toml_content)` sets a custom TOML before first `settings()` call
//! - `settings()` returns `&'static Settings` (lazy-init singleton)
//! - Default values are embedded via `include_str!("default_settings.toml")`

use std::sync::OnceLock;

use serde::Deserialize;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

/// Set custom TOML before first `settings()` call.
pub fn init_custom(toml_content: String) -> Result<(), SettingsError> {
    parse_settings_toml(&toml_content)?;
    CUSTOM_TOML
        .set(toml_content)
        .map_err(|_| SettingsError::AlreadyInitialized)
}

/// Get or initialize the global settings singleton.
pub fn settings() -> &'static Settings {
    static INSTANCE: OnceLock<Settings> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        let toml_str = CUSTOM_TOML
            .get()
            .map(|s| s.as_str())
            .unwrap_or(DEFAULT_SETTINGS_TOML);
        parse_settings_toml(toml_str).expect("settings TOML must be valid")
    })
}

/// Returns the embedded default settings TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("settings already initialized")]
    AlreadyInitialized,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub engine: EngineSettings,
    pub automaton: AutomatonSettings,
    #[serde(default)]
    pub table: TableSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineSettings {
    /// How many times a rule's `next_input` may be fed back per keystroke.
    pub max_chain_depth: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AutomatonSettings {
    /// Search steps (state expansions plus key trials) before a build gives up.
    pub max_steps: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableSettings {
    /// Add `c → c` rules for unclaimed printable ASCII to the global table.
    #[serde(default)]
    pub half_width_identity: bool,
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let s: Settings = toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    Ok(s)
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    macro_rules! check_positive_usize {
        ($section:ident . $field:ident) => {
            if s.$section.$field == 0 {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must be positive".to_string(),
                });
            }
        };
    }

    check_positive_usize!(engine.max_chain_depth);
    check_positive_usize!(automaton.max_steps);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_default_toml() {
        let s = parse_settings_toml(DEFAULT_SETTINGS_TOML).unwrap();
        assert_eq!(s.engine.max_chain_depth, 10);
        assert_eq!(s.automaton.max_steps, 1_000_000);
        assert!(!s.table.half_width_identity);
    }

    #[test]
    fn default_toml_accessor() {
        assert_eq!(default_toml(), DEFAULT_SETTINGS_TOML);
    }

    #[test]
    fn parse_valid_custom_toml() {
        let toml = r#"
[engine]
max_chain_depth = 4

[automaton]
max_steps = 500

[table]
half_width_identity = true
"#;
        let s = parse_settings_toml(toml).unwrap();
        assert_eq!(s.engine.max_chain_depth, 4);
        assert_eq!(s.automaton.max_steps, 500);
        assert!(s.table.half_width_identity);
    }

    #[test]
    fn table_section_optional() {
        let toml = r#"
[engine]
max_chain_depth = 10

[automaton]
max_steps = 100
"#;
        let s = parse_settings_toml(toml).unwrap();
        assert!(!s.table.half_width_identity);
    }

    #[test]
    fn error_zero_chain_depth() {
        let toml = r#"
[engine]
max_chain_depth = 0

[automaton]
max_steps = 100
"#;
        let err = parse_settings_toml(toml).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidValue { .. }));
        assert!(err.to_string().contains("engine.max_chain_depth"));
    }

    #[test]
    fn error_zero_max_steps() {
        let toml = r#"
[engine]
max_chain_depth = 10

[automaton]
max_steps = 0
"#;
        let err = parse_settings_toml(toml).unwrap_err();
        assert!(err.to_string().contains("automaton.max_steps"));
    }

    #[test]
    fn error_invalid_toml() {
        let err = parse_settings_toml("not valid toml {{{").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn error_missing_section() {
        let toml = r#"
[engine]
max_chain_depth = 10
"#;
        let err = parse_settings_toml(toml).unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }
}
