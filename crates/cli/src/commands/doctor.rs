use chrono::Utc;
use gemhook_core::catalog::Catalog;
use gemhook_core::config::{AppConfig, LoadOptions};

use super::CommandResult;

/// Validate config and catalog readiness, the preflight an operator runs
/// before pointing the dialog platform at this process.
pub fn run(json: bool) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return CommandResult::failure("doctor", "config", error.to_string(), 1),
    };

    let catalog = match Catalog::load_from_path(&config.catalog.path) {
        Ok(catalog) => catalog,
        Err(error) => return CommandResult::failure("doctor", "catalog", error.to_string(), 1),
    };

    let stone_types = catalog.stone_types();
    let checked_at = Utc::now().to_rfc3339();

    if json {
        return CommandResult::success_with_detail(
            "doctor",
            "config and catalog are ready",
            Some(serde_json::json!({
                "catalog_path": config.catalog.path.display().to_string(),
                "total_products": catalog.len(),
                "stone_types": stone_types.len(),
                "display_strategy": format!("{:?}", config.webhook.display),
                "checked_at": checked_at,
            })),
        );
    }

    let output = [
        format!("doctor checks passed at {checked_at}"),
        format!("  catalog: {} ({} products)", config.catalog.path.display(), catalog.len()),
        format!("  stone types: {}", stone_types.len()),
        format!("  display strategy: {:?}", config.webhook.display),
        format!("  webhook tag: {}", config.webhook.expected_tag),
    ]
    .join("\n");

    CommandResult { exit_code: 0, output }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use crate::commands::test_support::env_lock;

    use super::run;

    #[test]
    fn doctor_fails_when_the_catalog_is_missing() {
        let _guard = env_lock().lock().expect("env lock");

        std::env::set_var("GEMHOOK_CATALOG_PATH", "no/such/catalog.json");
        let result = run(true);
        std::env::remove_var("GEMHOOK_CATALOG_PATH");

        assert_eq!(result.exit_code, 1);
        assert!(result.output.contains("\"error_class\":\"catalog\""));
    }

    #[test]
    fn doctor_reports_counts_when_ready() {
        let _guard = env_lock().lock().expect("env lock");

        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"[{{"stone_type": "agate"}}, {{"stone_type": "jade"}}, {{"stone_type": "agate"}}]"#
        )
        .expect("write catalog");

        std::env::set_var("GEMHOOK_CATALOG_PATH", file.path());
        let result = run(true);
        std::env::remove_var("GEMHOOK_CATALOG_PATH");

        assert_eq!(result.exit_code, 0);
        assert!(result.output.contains("\"total_products\":3"));
        assert!(result.output.contains("\"stone_types\":2"));
    }
}
