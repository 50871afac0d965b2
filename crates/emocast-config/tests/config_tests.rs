// SPDX-FileCopyrightText: 2026 Emocast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Emocast configuration system.

use emocast_config::diagnostic::ConfigError;
use emocast_config::model::EmocastConfig;
use emocast_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};

#[test]
fn full_toml_deserializes() {
    let toml = r#"
[service]
name = "emocast-test"
log_level = "debug"
bind_address = "0.0.0.0"
port = 9090
default_user = "ops"

[provider]
api_key = "sk-test"
base_url = "http://localhost:4000/v1/"
model = "gpt-4.1-mini"
temperature = 0.0
timeout_secs = 30

[prompts]
clean = "clean it"
emotion = "rate it"

[storage]
database_path = "/tmp/emocast-test.db"
wal_mode = false

[pipeline]
batch_concurrency = 4
prompt_token_baseline = 400
emotion_service_url = "http://emotion.internal:8080"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.service.name, "emocast-test");
    assert_eq!(config.service.port, 9090);
    assert_eq!(config.service.default_user, "ops");
    assert_eq!(config.provider.api_key.as_deref(), Some("sk-test"));
    assert_eq!(config.provider.model, "gpt-4.1-mini");
    assert_eq!(config.provider.timeout_secs, 30);
    assert_eq!(config.provider.pool_max_idle, 5);
    assert_eq!(config.prompts.clean, "clean it");
    assert!(!config.prompts.keyphrase.is_empty());
    assert!(!config.storage.wal_mode);
    assert_eq!(config.pipeline.batch_concurrency, 4);
    assert_eq!(config.pipeline.prompt_token_baseline, 400);
    assert_eq!(
        config.pipeline.emotion_service_url.as_deref(),
        Some("http://emotion.internal:8080")
    );
}

#[test]
fn empty_toml_yields_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");
    let defaults = EmocastConfig::default();
    assert_eq!(config.provider.model, defaults.provider.model);
    assert_eq!(config.provider.timeout_secs, 120);
    assert_eq!(config.pipeline.batch_concurrency, 16);
    assert_eq!(config.pipeline.prompt_token_baseline, 384);
    assert!(config.pipeline.emotion_service_url.is_none());
}

#[test]
fn unknown_key_gets_a_suggestion() {
    let toml = r#"
[pipeline]
batch_concurency = 4
"#;

    let errors = load_and_validate_str(toml).expect_err("typo should be rejected");
    let suggestion = errors.iter().find_map(|e| match e {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } if key == "batch_concurency" => suggestion.clone(),
        _ => None,
    });
    assert_eq!(suggestion.as_deref(), Some("batch_concurrency"));
}

#[test]
fn unknown_section_is_rejected() {
    let errors = load_and_validate_str("[telemetry]\nenabled = true\n").unwrap_err();
    assert!(!errors.is_empty());
}

#[test]
fn wrong_type_is_reported() {
    let errors = load_and_validate_str("[service]\nport = \"eighty\"\n").unwrap_err();
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key.contains("port"))),
        "got {errors:?}"
    );
}

#[test]
fn semantic_validation_runs_after_parse() {
    let toml = r#"
[provider]
base_url = "api.openai.com"

[pipeline]
batch_concurrency = 0
"#;

    let errors = load_and_validate_str(toml).unwrap_err();
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|e| matches!(e, ConfigError::Validation { .. })));
}

#[test]
fn api_key_is_redacted_in_debug() {
    let config = load_config_from_str("[provider]\napi_key = \"sk-very-secret\"\n").unwrap();
    let debug = format!("{:?}", config.provider);
    assert!(!debug.contains("sk-very-secret"));
    assert!(debug.contains("[redacted]"));
}

#[test]
fn explicit_path_is_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.toml");
    std::fs::write(&path, "[service]\nport = 7070\n").unwrap();

    let config = load_and_validate_path(&path).unwrap();
    assert_eq!(config.service.port, 7070);
}
