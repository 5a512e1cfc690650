//! Unit tests for configuration parsing, defaults, and validation.

use taskscout::GlobalConfig;

const MINIMAL: &str = r#"
[owner]
saved_channel_id = "me"
"#;

#[test]
fn minimal_config_parses_with_defaults() {
    let config = GlobalConfig::from_toml_str(MINIMAL).expect("minimal config");
    assert_eq!(config.triage.priority_threshold, 4);
    assert_eq!(config.triage.context_window, 10);
    assert_eq!(config.triage.memory_examples, 5);
    assert_eq!(config.briefing.interval_hours, 24);
    assert_eq!(config.audit_max_entries, 500);
    assert_eq!(config.http_port, 8000);
    assert!(config.keywords.is_empty());
}

#[test]
fn derived_paths_live_under_data_dir() {
    let config = GlobalConfig::from_toml_str(
        r#"
data_dir = "/tmp/scout-data"

[owner]
saved_channel_id = "me"
"#,
    )
    .expect("config");
    assert_eq!(config.db_path().to_string_lossy(), "/tmp/scout-data/tasks.db");
    assert!(config
        .audit_log_path()
        .to_string_lossy()
        .ends_with("audit_log.json"));
    assert!(config
        .discussion_archive_path()
        .to_string_lossy()
        .ends_with("discussion_archive.json"));
}

#[test]
fn full_config_overrides_defaults() {
    let config = GlobalConfig::from_toml_str(
        r#"
keywords = ["invoice", "contract"]
http_port = 9100
audit_max_entries = 50

[owner]
first_name = "Alex"
last_name = "Carter"
handle = "alexc"
saved_channel_id = "self-chat"

[triage]
priority_threshold = 6
context_window = 20
memory_examples = 3

[briefing]
interval_hours = 12
"#,
    )
    .expect("full config");
    assert_eq!(config.triage.priority_threshold, 6);
    assert_eq!(config.briefing.interval_hours, 12);
    assert_eq!(config.keywords.len(), 2);
    assert_eq!(config.owner.handle, "alexc");
}

// ── Validation failures ──────────────────────────────────────

#[test]
fn empty_saved_channel_is_rejected() {
    let err = GlobalConfig::from_toml_str(
        r#"
[owner]
saved_channel_id = ""
"#,
    )
    .expect_err("must fail");
    assert!(err.to_string().contains("saved_channel_id"));
}

#[test]
fn threshold_above_scale_is_rejected() {
    let err = GlobalConfig::from_toml_str(
        r#"
[owner]
saved_channel_id = "me"

[triage]
priority_threshold = 11
"#,
    )
    .expect_err("must fail");
    assert!(err.to_string().contains("priority_threshold"));
}

#[test]
fn zero_context_window_is_rejected() {
    assert!(GlobalConfig::from_toml_str(
        r#"
[owner]
saved_channel_id = "me"

[triage]
context_window = 0
"#,
    )
    .is_err());
}

#[test]
fn zero_briefing_interval_is_rejected() {
    assert!(GlobalConfig::from_toml_str(
        r#"
[owner]
saved_channel_id = "me"

[briefing]
interval_hours = 0
"#,
    )
    .is_err());
}

#[test]
fn invalid_toml_reports_config_error() {
    let err = GlobalConfig::from_toml_str("owner = [not toml").expect_err("must fail");
    assert!(err.to_string().starts_with("config:"));
}
