use std::fs;
use std::path::Path;
use std::process;

use kana_engine::romaji::RuleTrie;
use kana_engine::settings;

use crate::load_table;

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

pub fn table_export() {
    print!("{}", kana_engine::romaji::DEFAULT_TABLE);
}

pub fn table_check(file: &str) {
    let table = die!(load_table(Some(Path::new(file))), "Error in {file}: {}");
    let trie = RuleTrie::build(table.iter().cloned());
    println!(
        "OK: {} rules, {} trie nodes, {} shadowed",
        table.len(),
        trie.len(),
        trie.shadowed_rules()
    );
}

pub fn settings_export() {
    print!("{}", settings::default_toml());
}

pub fn settings_check(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let s = die!(settings::parse_settings_toml(&content), "Error: {}");
    println!(
        "OK: engine.max_chain_depth={}, automaton.max_steps={}, table.half_width_identity={}",
        s.engine.max_chain_depth, s.automaton.max_steps, s.table.half_width_identity
    );
}
