use std::env;
use std::fs;
use std::path::Path;

use coupon_core::config::{resolve_config_path, AppConfig, LoadOptions};
use toml::Value;

use crate::commands::CommandResult;

const COMMAND: &str = "config";

struct Entry<'a> {
    key_path: &'a str,
    env_keys: &'a [&'a str],
    flag: Option<&'a str>,
    value: String,
}

/// Effective configuration, one line per key with the layer it came from.
pub fn run(options: &LoadOptions) -> CommandResult {
    let config = match AppConfig::load(options.clone()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                COMMAND,
                "config_validation",
                format!("config validation failed: {error}"),
                2,
            );
        }
    };

    let config_file_path = resolve_config_path(options.config_path.as_deref());
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let overrides = &options.overrides;

    let entries = [
        Entry {
            key_path: "api.base_url",
            env_keys: &["COUPON_API_BASE_URL"],
            flag: overrides.api_base_url.as_ref().map(|_| "--api-base-url"),
            value: config.api.base_url.clone(),
        },
        Entry {
            key_path: "api.create_path",
            env_keys: &["COUPON_API_CREATE_PATH"],
            flag: None,
            value: config.api.create_path.clone(),
        },
        Entry {
            key_path: "api.timeout_secs",
            env_keys: &["COUPON_API_TIMEOUT_SECS"],
            flag: overrides.api_timeout_secs.map(|_| "--api-timeout-secs"),
            value: config.api.timeout_secs.to_string(),
        },
        Entry {
            key_path: "logging.level",
            env_keys: &["COUPON_LOGGING_LEVEL", "COUPON_LOG_LEVEL"],
            flag: overrides.log_level.as_ref().map(|_| "--log-level"),
            value: config.logging.level.clone(),
        },
        Entry {
            key_path: "logging.format",
            env_keys: &["COUPON_LOGGING_FORMAT", "COUPON_LOG_FORMAT"],
            flag: overrides.log_format.map(|_| "--log-format"),
            value: format!("{:?}", config.logging.format),
        },
    ];

    let mut lines =
        vec!["effective config (source precedence: flag > env > file > default):".to_string()];
    for entry in entries {
        let source = match entry.flag {
            Some(flag) => format!("flag ({flag})"),
            None => field_source(
                entry.key_path,
                entry.env_keys,
                config_file_doc.as_ref(),
                config_file_path.as_deref(),
            ),
        };
        lines.push(render_line(entry.key_path, &entry.value, source));
    }
    lines.push(format!("- create_url = {}", config.api.create_url()));

    CommandResult { exit_code: 0, output: lines.join("\n") }
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) =
        env_keys.iter().find(|key| env::var(key).is_ok_and(|value| !value.trim().is_empty()))
    {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

#[cfg(test)]
mod tests {
    use toml::Value;

    use super::{contains_path, render_line};

    #[test]
    fn nested_key_paths_are_resolved_in_toml_documents() {
        let doc = "[api]\nbase_url = \"https://shop.example.com\"\n"
            .parse::<Value>()
            .expect("valid toml");
        assert!(contains_path(&doc, "api.base_url"));
        assert!(!contains_path(&doc, "api.timeout_secs"));
        assert!(!contains_path(&doc, "logging.level"));
    }

    #[test]
    fn lines_name_their_source() {
        assert_eq!(
            render_line("api.timeout_secs", "30", "default".to_string()),
            "- api.timeout_secs = 30 (source: default)"
        );
    }
}
