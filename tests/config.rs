//! Runner configuration from key lookups.

use pod_tournament::config::RunnerConfig;
use std::collections::HashMap;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn unset_keys_keep_defaults() {
    assert_eq!(RunnerConfig::from_lookup(lookup(&[])), RunnerConfig::default());
}

#[test]
fn values_are_parsed_and_bad_ones_ignored() {
    let config = RunnerConfig::from_lookup(lookup(&[
        ("ROUNDS", " 5 "),
        ("AUTO_FINAL", "2"),
        ("SEMI_FINAL", "eight"),
        ("RESULT_SEED", "42"),
    ]));
    assert_eq!(config.swiss_rounds, 5);
    assert_eq!(config.auto_final, 2);
    assert_eq!(config.semi_final, 4);
    assert_eq!(config.result_seed, 42);
    assert_eq!(config.notify_capacity, 64);
}
