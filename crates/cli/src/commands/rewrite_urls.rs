use std::fs;

use gemhook_core::catalog::Catalog;
use gemhook_core::config::{AppConfig, LoadOptions};
use gemhook_core::rewrite::rewrite_product_urls;

use super::CommandResult;

/// Migrate `product_url` values off an old storefront host. Dry run by
/// default; `--write` persists the rewritten catalog file in place.
pub fn run(from_host: &str, to_base: &str, write: bool) -> CommandResult {
    if !to_base.starts_with("http://") && !to_base.starts_with("https://") {
        return CommandResult::failure(
            "rewrite-urls",
            "arguments",
            "--to-base must start with http:// or https://",
            2,
        );
    }

    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure("rewrite-urls", "config", error.to_string(), 1)
        }
    };

    let catalog = match Catalog::load_from_path(&config.catalog.path) {
        Ok(catalog) => catalog,
        Err(error) => {
            return CommandResult::failure("rewrite-urls", "catalog", error.to_string(), 1)
        }
    };

    let mut products = catalog.into_products();
    let report = rewrite_product_urls(&mut products, from_host, to_base);

    if write && report.changed > 0 {
        let serialized = match serde_json::to_string_pretty(&products) {
            Ok(serialized) => serialized,
            Err(error) => {
                return CommandResult::failure("rewrite-urls", "serialization", error.to_string(), 1)
            }
        };
        if let Err(error) = fs::write(&config.catalog.path, serialized) {
            return CommandResult::failure("rewrite-urls", "write", error.to_string(), 1);
        }
    }

    let mode = if write { "written" } else { "dry run" };
    CommandResult::success_with_detail(
        "rewrite-urls",
        format!("rewrote {} of {} product URLs ({mode})", report.changed, report.total),
        Some(serde_json::json!({
            "changed": report.changed,
            "total": report.total,
            "sample": report.sample,
            "written": write && report.changed > 0,
        })),
    )
}
