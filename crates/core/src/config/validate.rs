use std::collections::HashSet;

use super::{types::Config, ConfigError};
use crate::namer::Template;

/// Validate configuration
/// Currently validates:
/// - Retry count and attempt timeout are positive
/// - At least one identifier kind has sources; names are non-blank
/// - Tag authority / watermarked cover source names are non-blank
/// - Naming templates only use known placeholders
/// - Path limit is positive
/// - HTTP sources have unique names and http(s) endpoints
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let sources = &config.sources;
    if sources.retry == 0 {
        return Err(ConfigError::ValidationError(
            "sources.retry must be at least 1".to_string(),
        ));
    }
    if sources.attempt_timeout_ms == 0 {
        return Err(ConfigError::ValidationError(
            "sources.attempt_timeout_ms cannot be 0".to_string(),
        ));
    }

    let lists = [
        ("standard", &sources.standard),
        ("content_id", &sources.content_id),
        ("alternate", &sources.alternate),
    ];
    if lists.iter().all(|(_, list)| list.is_empty()) {
        return Err(ConfigError::ValidationError(
            "at least one of sources.standard, sources.content_id, sources.alternate must list a source"
                .to_string(),
        ));
    }
    for (kind, list) in lists {
        if list.iter().any(|name| name.trim().is_empty()) {
            return Err(ConfigError::ValidationError(format!(
                "sources.{} contains a blank source name",
                kind
            )));
        }
    }

    let named = [
        ("merge.tag_authority", &config.merge.tag_authority),
        (
            "merge.watermarked_cover_source",
            &config.merge.watermarked_cover_source,
        ),
    ];
    for (key, value) in named {
        if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
            return Err(ConfigError::ValidationError(format!(
                "{} cannot be blank",
                key
            )));
        }
    }

    for (key, template) in config.naming.templates() {
        Template::parse(template)
            .map_err(|e| ConfigError::ValidationError(format!("naming.{}: {}", key, e)))?;
    }
    if config.naming.max_path_length == 0 {
        return Err(ConfigError::ValidationError(
            "naming.max_path_length cannot be 0".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for source in &config.http_sources {
        if source.name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "http_sources entry has a blank name".to_string(),
            ));
        }
        if !seen.insert(source.name.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "http_sources.{} is defined twice",
                source.name
            )));
        }
        if !(source.base_url.starts_with("http://") || source.base_url.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "http_sources.{}.base_url must be an http(s) URL",
                source.name
            )));
        }
        if source.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(format!(
                "http_sources.{}.timeout_secs cannot be 0",
                source.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from_str;

    fn valid() -> Config {
        load_config_from_str(
            r#"
[sources]
standard = ["alpha"]

[[http_sources]]
name = "alpha"
base_url = "http://localhost:9000/alpha"
"#,
        )
        .unwrap()
    }

    fn assert_invalid(config: &Config, needle: &str) {
        match validate_config(config) {
            Err(ConfigError::ValidationError(msg)) => {
                assert!(msg.contains(needle), "'{}' not in '{}'", needle, msg)
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&valid()).is_ok());
    }

    #[test]
    fn test_validate_retry_and_timeout() {
        let mut config = valid();
        config.sources.retry = 0;
        assert_invalid(&config, "retry");

        let mut config = valid();
        config.sources.attempt_timeout_ms = 0;
        assert_invalid(&config, "attempt_timeout_ms");
    }

    #[test]
    fn test_validate_requires_some_source() {
        let mut config = valid();
        config.sources.standard.clear();
        assert_invalid(&config, "must list a source");

        config.sources.alternate = vec!["  ".to_string()];
        assert_invalid(&config, "blank source name");
    }

    #[test]
    fn test_validate_blank_policy_names() {
        let mut config = valid();
        config.merge.tag_authority = Some(" ".to_string());
        assert_invalid(&config, "merge.tag_authority");
    }

    #[test]
    fn test_validate_unknown_template_key() {
        let mut config = valid();
        config.naming.basename = "{num}-{studio}".to_string();
        assert_invalid(&config, "naming.basename");
    }

    #[test]
    fn test_validate_path_limit() {
        let mut config = valid();
        config.naming.max_path_length = 0;
        assert_invalid(&config, "max_path_length");
    }

    #[test]
    fn test_validate_http_sources() {
        let mut config = valid();
        config.http_sources.push(config.http_sources[0].clone());
        assert_invalid(&config, "defined twice");

        let mut config = valid();
        config.http_sources[0].base_url = "ftp://example.com".to_string();
        assert_invalid(&config, "base_url");
    }
}
