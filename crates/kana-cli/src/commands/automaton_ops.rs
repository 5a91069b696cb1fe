use std::process;

use serde::Serialize;

use kana_engine::automaton::{AutomatonConfig, AutomatonExport};
use kana_engine::unicode::printable_ascii_keys;
use kana_engine::{AutomatonBuilder, AutomatonError, ConversionEngine, TypingAutomaton};

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

#[derive(Debug, Serialize)]
struct AutomatonReport {
    automaton: AutomatonExport,
    sequences: Vec<String>,
    truncated: bool,
}

fn build(
    engine: ConversionEngine,
    target: &str,
    max_steps: Option<usize>,
) -> Result<TypingAutomaton, AutomatonError> {
    let mut builder = AutomatonBuilder::new(engine, printable_ascii_keys());
    if let Some(max_steps) = max_steps {
        builder = builder.with_config(AutomatonConfig { max_steps });
    }
    builder.build(target)
}

/// First `limit` key sequences, and whether more exist.
fn sequences(automaton: &TypingAutomaton, limit: usize) -> (Vec<String>, bool) {
    let mut iter = automaton.key_sequences();
    let sequences: Vec<String> = iter.by_ref().take(limit).collect();
    let truncated = iter.next().is_some();
    (sequences, truncated)
}

pub fn automaton_cmd(
    engine: ConversionEngine,
    target: &str,
    limit: usize,
    max_steps: Option<usize>,
    json: bool,
) {
    let automaton = die!(build(engine, target, max_steps), "Error: {}");
    let (sequences, truncated) = sequences(&automaton, limit);

    if json {
        let report = AutomatonReport {
            automaton: automaton.export(),
            sequences,
            truncated,
        };
        let s = die!(
            serde_json::to_string_pretty(&report),
            "Error serializing automaton: {}"
        );
        println!("{s}");
        return;
    }

    let stats = automaton.stats();
    println!(
        "{}: {} states, {} edges (explored {}, key trials {})",
        automaton.target(),
        automaton.state_count(),
        automaton.edge_count(),
        stats.explored,
        stats.key_trials
    );
    for keys in &sequences {
        println!("  {keys}");
    }
    if truncated {
        println!("  ... (more than {limit})");
    }
}
