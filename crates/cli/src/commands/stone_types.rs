use gemhook_core::catalog::Catalog;
use gemhook_core::config::{AppConfig, LoadOptions};

use super::CommandResult;

/// Print the distinct category labels the matcher can hit, one per line.
pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return CommandResult::failure("stone-types", "config", error.to_string(), 1),
    };

    let catalog = match Catalog::load_from_path(&config.catalog.path) {
        Ok(catalog) => catalog,
        Err(error) => {
            return CommandResult::failure("stone-types", "catalog", error.to_string(), 1)
        }
    };

    let labels = catalog.stone_types();
    if labels.is_empty() {
        return CommandResult { exit_code: 0, output: "catalog contains no products".to_string() };
    }

    CommandResult { exit_code: 0, output: labels.join("\n") }
}
