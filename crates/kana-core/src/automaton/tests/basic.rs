use super::*;

fn hatsuon_rules() -> Vec<ConvertRule> {
    vec![
        rule("n", "ん", ""),
        rule("nn", "ん", ""),
        rule("na", "な", ""),
        rule("ni", "に", ""),
        rule("ka", "か", ""),
        rule("kk", "っ", "k"),
        rule("ltu", "っ", ""),
    ]
}

fn sokuon_rules() -> Vec<ConvertRule> {
    vec![
        rule("tt", "っ", "t"),
        rule("ta", "た", ""),
        rule("ltu", "っ", ""),
        rule("xtu", "っ", ""),
    ]
}

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn hatsuon_both_spellings() {
    let e = engine(&hatsuon_rules());
    let a = build(&e, "なんか");

    assert_eq!(sequences(&a), set(&["nanka", "nannka"]));
    assert_eq!(a.state_count(), 8);
    assert_eq!(a.edge_count(), 8);
    assert_trim(&a);
}

#[test]
fn merged_states_keyed_by_output() {
    let e = engine(&hatsuon_rules());
    let a = build(&e, "なんか");

    let outputs: Vec<&str> = a.states_by_output().keys().map(String::as_str).collect();
    assert_eq!(outputs, vec!["", "な", "なん", "なんか"]);
    assert_eq!(a.states_by_output()[""], a.start());
    assert_eq!(a.states_by_output()["なんか"], a.goal());
    assert_eq!(a.output_of(a.goal()), Some("なんか"));

    // "nk" commits ん with k still pending, so that state is not merged.
    let after_na = a.states_by_output()["な"];
    let n = a.transition(after_na, 'n').unwrap();
    let nk = a.transition(n, 'k').unwrap();
    assert_eq!(a.output_of(n), None);
    assert_eq!(a.output_of(nk), None);
    assert_eq!(a.transition(n, 'n'), Some(a.states_by_output()["なん"]));
}

#[test]
fn accepts_only_complete_sequences() {
    let e = engine(&hatsuon_rules());
    let a = build(&e, "なんか");

    assert!(a.accepts("nanka"));
    assert!(a.accepts("nannka"));
    assert!(!a.accepts("nank"));
    assert!(!a.accepts("nankaa"));
    assert!(!a.accepts("xyz"));
    assert!(!a.accepts(""));
}

#[test]
fn sokuon_doubling_and_small_tsu() {
    let e = engine(&sokuon_rules());
    let a = build(&e, "った");

    assert_eq!(sequences(&a), set(&["ltuta", "tta", "xtuta"]));
    let outputs: Vec<&str> = a.states_by_output().keys().map(String::as_str).collect();
    assert_eq!(outputs, vec!["", "っ", "った"]);
    assert_trim(&a);
}

#[test]
fn goal_may_end_with_pending_buffer() {
    let e = engine(&[
        rule("n", "ん", ""),
        rule("nn", "ん", ""),
        rule("na", "な", ""),
        rule("ka", "か", ""),
    ]);
    let a = build(&e, "んk");

    assert_eq!(sequences(&a), set(&["nk", "nnk"]));
    for keys in a.key_sequences() {
        assert_eq!(typed(&e, &keys), "んk");
    }
}

#[test]
fn characters_without_rules_are_typed_literally() {
    let e = engine(&[rule("ka", "か", "")]);
    let a = build(&e, "3か!");
    assert_eq!(sequences(&a), set(&["3ka!"]));
}

#[test]
fn empty_rule_set_types_target_verbatim() {
    let a = build(&engine(&[]), "abc");
    assert_eq!(sequences(&a), set(&["abc"]));
    assert_eq!(a.state_count(), 4);
}

#[test]
fn empty_target_is_start() {
    let a = build(&engine(&[rule("a", "A", "")]), "");
    assert_eq!(a.state_count(), 1);
    assert_eq!(a.start(), a.goal());
    assert_eq!(a.key_sequences().collect::<Vec<_>>(), vec![String::new()]);
    assert!(a.accepts(""));
}

#[test]
fn unreachable_target() {
    let e = engine(&[rule("ka", "か", "")]);
    let keys: BTreeSet<char> = "ka".chars().collect();
    let err = TypingAutomaton::build(&e, "き", &keys).unwrap_err();
    assert!(matches!(err, AutomatonError::Unreachable { ref target } if target == "き"));
}

#[test]
fn keys_outside_set_never_used() {
    let e = engine(&sokuon_rules());
    let keys: BTreeSet<char> = "ta".chars().collect();
    let a = TypingAutomaton::build(&e, "った", &keys).unwrap();
    assert_eq!(sequences(&a), set(&["tta"]));
}

#[test]
fn search_budget_exhausted() {
    let builder = AutomatonBuilder::new(engine(&hatsuon_rules()), printable_ascii_keys())
        .with_config(AutomatonConfig { max_steps: 5 });
    let err = builder.build("なんか").unwrap_err();
    assert!(matches!(err, AutomatonError::SearchTruncated { steps: 6 }));
}

#[test]
fn builder_resets_engine() {
    let mut e = engine(&hatsuon_rules());
    e.input('n');
    assert!(!e.finished());

    let a = AutomatonBuilder::new(e, printable_ascii_keys())
        .build("な")
        .unwrap();
    assert_eq!(sequences(&a), set(&["na"]));
}

#[test]
fn empty_output_rule_cycle_is_cut() {
    // "q" does nothing, so typing it loops back to the same state.
    let e = engine(&[rule("q", "", ""), rule("ka", "か", "")]);
    let a = build(&e, "か");

    assert_eq!(sequences(&a), set(&["ka"]));
    assert_trim(&a);

    // The engine still types "か" through "qka"; the automaton leaves it out.
    assert_eq!(typed(&e, "qka"), "か");
    assert!(!a.accepts("qka"));
}

#[test]
fn forwarded_input_paths() {
    // "x" hands "☆" to the next round; "☆y" completes.
    let e = engine(&[rule("x", "", "☆"), rule("☆y", "星", "")]);
    let keys: BTreeSet<char> = "xy".chars().collect();
    let a = TypingAutomaton::build(&e, "星", &keys).unwrap();

    assert_eq!(sequences(&a), set(&["xy"]));
    assert_eq!(typed(&e, "xy"), "星");
}

#[test]
fn stats_count_search_work() {
    let a = build(&engine(&hatsuon_rules()), "なんか");
    let stats = a.stats();
    assert!(stats.explored >= a.state_count() - 1);
    assert!(stats.key_trials >= a.edge_count());
    assert_eq!(stats.steps(), stats.explored + stats.key_trials);
}

#[test]
fn export_serializes_graph() {
    let a = build(&engine(&sokuon_rules()), "った");
    let value = serde_json::to_value(a.export()).unwrap();

    assert_eq!(value["target"], "った");
    assert_eq!(value["goal"], a.goal());
    let states = value["states"].as_array().unwrap();
    assert_eq!(states.len(), a.state_count());
    assert_eq!(states[a.start()]["output"], "");
    assert!(states[a.goal()]["edges"].as_object().unwrap().is_empty());
    assert!(states[a.start()]["edges"].get("t").is_some());
}
