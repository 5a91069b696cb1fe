fn main() {
    // Validate embedded data files at compile time.
    validate_toml(
        "src/default_settings.toml",
        include_str!("src/default_settings.toml"),
    );
    validate_rule_table(
        "src/romaji/default_roman_table.tsv",
        include_str!("src/romaji/default_roman_table.tsv"),
    );
}

fn validate_toml(path: &str, content: &str) {
    if content.parse::<toml::Value>().is_err() {
        panic!("{path} contains invalid TOML");
    }
}

fn validate_rule_table(path: &str, content: &str) {
    for (i, line) in content.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        let fields = line.split('\t').count();
        if !(2..=3).contains(&fields) {
            panic!("{path}:{}: expected 2 or 3 tab-separated fields, got {fields}", i + 1);
        }
    }
}
