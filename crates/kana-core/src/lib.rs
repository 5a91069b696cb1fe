//! Romaji-to-kana conversion and typing-automaton construction.
//!
//! [`romaji`] holds rule tables and the rule trie, [`engine`] converts key
//! sequences one character at a time, and [`automaton`] runs the engine in
//! reverse to enumerate every key sequence that types a given string.

pub mod automaton;
pub mod engine;
pub mod romaji;
pub mod settings;
pub mod unicode;
