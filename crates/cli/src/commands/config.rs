use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use gemhook_core::config::{AppConfig, LoadOptions};
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let rows: Vec<(&str, String, &[&str])> = vec![
        (
            "server.bind_address",
            config.server.bind_address.clone(),
            &["GEMHOOK_SERVER_BIND_ADDRESS"],
        ),
        ("server.port", config.server.port.to_string(), &["GEMHOOK_SERVER_PORT", "PORT"]),
        (
            "catalog.path",
            config.catalog.path.display().to_string(),
            &["GEMHOOK_CATALOG_PATH"],
        ),
        ("webhook.expected_tag", config.webhook.expected_tag.clone(), &["GEMHOOK_WEBHOOK_TAG"]),
        ("webhook.display", format!("{:?}", config.webhook.display), &["GEMHOOK_WEBHOOK_DISPLAY"]),
        (
            "webhook.site_base_url",
            config.webhook.site_base_url.clone(),
            &["GEMHOOK_WEBHOOK_SITE_BASE_URL"],
        ),
        (
            "webhook.placeholder_image",
            config.webhook.placeholder_image.clone(),
            &["GEMHOOK_WEBHOOK_PLACEHOLDER_IMAGE"],
        ),
        (
            "logging.level",
            config.logging.level.clone(),
            &["GEMHOOK_LOGGING_LEVEL", "GEMHOOK_LOG_LEVEL"],
        ),
        (
            "logging.format",
            format!("{:?}", config.logging.format),
            &["GEMHOOK_LOGGING_FORMAT", "GEMHOOK_LOG_FORMAT"],
        ),
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for (key, value, env_keys) in rows {
        let source = field_source(
            key,
            env_keys,
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        );
        lines.push(format!("{key} = {value}  [{source}]"));
    }

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("gemhook.toml"), PathBuf::from("config/gemhook.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let raw = fs::read_to_string(path?).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key: &str,
    env_keys: &[&str],
    doc: Option<&Value>,
    path: Option<&Path>,
) -> String {
    for env_key in env_keys {
        if env::var(env_key).map(|value| !value.trim().is_empty()).unwrap_or(false) {
            return format!("env:{env_key}");
        }
    }

    if let (Some(doc), Some(path)) = (doc, path) {
        let mut cursor = Some(doc);
        for segment in key.split('.') {
            cursor = cursor.and_then(|value| value.get(segment));
        }
        if cursor.is_some() {
            return format!("file:{}", path.display());
        }
    }

    "default".to_string()
}
