// SPDX-FileCopyrightText: 2026 Emocast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for constraints serde cannot express.

use crate::diagnostic::ConfigError;
use crate::model::EmocastConfig;

/// Validate a deserialized configuration.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &EmocastConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let addr = config.service.bind_address.trim();
    if addr.is_empty() {
        errors.push(ConfigError::validation(
            "service.bind_address must not be empty",
        ));
    } else {
        let is_valid_ip = addr.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = addr
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::validation(format!(
                "service.bind_address `{addr}` is not a valid IP address or hostname"
            )));
        }
    }

    if config.service.default_user.trim().is_empty() {
        errors.push(ConfigError::validation(
            "service.default_user must not be empty",
        ));
    }

    if !is_http_url(&config.provider.base_url) {
        errors.push(ConfigError::validation(format!(
            "provider.base_url `{}` must be an http(s) URL",
            config.provider.base_url
        )));
    }

    if config.provider.model.trim().is_empty() {
        errors.push(ConfigError::validation("provider.model must not be empty"));
    }

    let temperature = config.provider.temperature;
    if !(0.0..=2.0).contains(&temperature) {
        errors.push(ConfigError::validation(format!(
            "provider.temperature must be between 0 and 2, got {temperature}"
        )));
    }

    if config.provider.timeout_secs == 0 {
        errors.push(ConfigError::validation(
            "provider.timeout_secs must be at least 1",
        ));
    }

    for (name, prompt) in [
        ("clean", &config.prompts.clean),
        ("emotion", &config.prompts.emotion),
        ("emotion_unique", &config.prompts.emotion_unique),
        ("keyphrase", &config.prompts.keyphrase),
        ("campaign", &config.prompts.campaign),
    ] {
        if prompt.trim().is_empty() {
            errors.push(ConfigError::validation(format!(
                "prompts.{name} must not be empty"
            )));
        }
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::validation(
            "storage.database_path must not be empty",
        ));
    }

    if config.pipeline.batch_concurrency == 0 {
        errors.push(ConfigError::validation(
            "pipeline.batch_concurrency must be at least 1",
        ));
    }

    if let Some(url) = &config.pipeline.emotion_service_url
        && !is_http_url(url)
    {
        errors.push(ConfigError::validation(format!(
            "pipeline.emotion_service_url `{url}` must be an http(s) URL"
        )));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_http_url(raw: &str) -> bool {
    let rest = raw
        .strip_prefix("https://")
        .or_else(|| raw.strip_prefix("http://"));
    match rest {
        Some(rest) => {
            let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
            !host.is_empty() && !host.contains(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(validate_config(&EmocastConfig::default()).is_ok());
    }

    #[test]
    fn collects_all_failures() {
        let mut config = EmocastConfig::default();
        config.provider.temperature = 3.5;
        config.pipeline.batch_concurrency = 0;
        config.prompts.campaign = "   ".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        let rendered: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        assert!(rendered.iter().any(|m| m.contains("provider.temperature")));
        assert!(rendered.iter().any(|m| m.contains("pipeline.batch_concurrency")));
        assert!(rendered.iter().any(|m| m.contains("prompts.campaign")));
    }

    #[test]
    fn url_shapes() {
        assert!(is_http_url("https://api.openai.com/v1/"));
        assert!(is_http_url("http://127.0.0.1:8081"));
        assert!(!is_http_url("ftp://example.com"));
        assert!(!is_http_url("https://"));
        assert!(!is_http_url("localhost:8080"));
    }
}
