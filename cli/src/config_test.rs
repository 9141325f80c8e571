use std::collections::HashMap;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_when_nothing_set() {
    let cfg = ClientConfig::from_lookup(|_| None);
    assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    assert_eq!(
        cfg.timeouts,
        Timeouts { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    );
    assert_eq!(cfg.poll, PollConfig { interval_ms: 2000, max_polls: 300 });
    assert_eq!(cfg, ClientConfig::default());
}

#[test]
fn overrides_are_parsed() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[
        ("DOPPLER_BASE_URL", "http://localhost:8000/"),
        ("DOPPLER_REQUEST_TIMEOUT_SECS", "42"),
        ("DOPPLER_CONNECT_TIMEOUT_SECS", " 7 "),
        ("DOPPLER_POLL_INTERVAL_MS", "250"),
        ("DOPPLER_MAX_POLLS", "12"),
    ]));
    assert_eq!(cfg.base_url, "http://localhost:8000");
    assert_eq!(cfg.timeouts, Timeouts { request_secs: 42, connect_secs: 7 });
    assert_eq!(cfg.poll, PollConfig { interval_ms: 250, max_polls: 12 });
}

#[test]
fn invalid_numbers_fall_back_to_defaults() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[
        ("DOPPLER_REQUEST_TIMEOUT_SECS", "soon"),
        ("DOPPLER_POLL_INTERVAL_MS", "-5"),
    ]));
    assert_eq!(cfg.timeouts.request_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
    assert_eq!(cfg.poll.interval_ms, DEFAULT_POLL_INTERVAL_MS);
}

#[test]
fn blank_base_url_uses_default() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[("DOPPLER_BASE_URL", "   ")]));
    assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
}

#[test]
fn zero_max_polls_is_raised_to_one() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[("DOPPLER_MAX_POLLS", "0")]));
    assert_eq!(cfg.poll.max_polls, 1);
}

#[test]
fn with_base_url_trims_trailing_slash() {
    let cfg = ClientConfig::default().with_base_url("https://example.test//");
    assert_eq!(cfg.base_url, "https://example.test");
}

#[test]
fn poll_interval_duration() {
    let poll = PollConfig { interval_ms: 1500, max_polls: 3 };
    assert_eq!(poll.interval(), Duration::from_millis(1500));
}
