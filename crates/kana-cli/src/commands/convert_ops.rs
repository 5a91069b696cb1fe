use std::process;

use serde::Serialize;

use kana_engine::{ConversionEngine, StepResult};

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

#[derive(Debug, Serialize)]
struct KeySteps {
    key: char,
    results: Vec<StepResult>,
}

#[derive(Debug, Serialize)]
struct ConvertReport {
    keys: String,
    committed: String,
    pending: String,
    text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    steps: Vec<KeySteps>,
}

fn run(mut engine: ConversionEngine, keys: &str, trace_steps: bool) -> ConvertReport {
    engine.reset();
    let mut committed = String::new();
    let mut steps = Vec::new();
    for key in keys.chars() {
        let results = engine.input(key);
        for r in &results {
            committed.push_str(&r.output);
        }
        if trace_steps {
            steps.push(KeySteps { key, results });
        }
    }
    let pending = engine.buffer().to_string();
    ConvertReport {
        keys: keys.to_string(),
        text: format!("{committed}{pending}"),
        committed,
        pending,
        steps,
    }
}

fn report_json(report: &ConvertReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

fn format_step(r: &StepResult) -> String {
    let rule = match &r.matched_rule {
        Some(rule) => format!("{}→{}", rule.input, rule.output),
        None => "-".to_string(),
    };
    format!(
        "moved={} rule={} output={:?} next={:?} buffer={:?}",
        r.moved, rule, r.output, r.next_input, r.buffer
    )
}

pub fn convert_cmd(engine: ConversionEngine, keys: &str, trace_steps: bool, json: bool) {
    let report = run(engine, keys, trace_steps);

    if json {
        let s = die!(report_json(&report), "Error serializing report: {}");
        println!("{s}");
        return;
    }

    for step in &report.steps {
        println!("{:?}", step.key);
        for r in &step.results {
            println!("  {}", format_step(r));
        }
    }
    if report.pending.is_empty() {
        println!("{}", report.text);
    } else {
        println!("{}  (pending: {})", report.text, report.pending);
    }
}
