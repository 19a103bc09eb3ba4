use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{ConfigOverrides, InputPaths, Settings};

/// File looked up in the working directory when no explicit config file is given.
pub const DEFAULT_CONFIG_FILE: &str = "supply-kpi";

const DEFAULTS: [(&str, &str); 6] = [
    ("inputs.demand", "src/configs/demand.csv"),
    ("inputs.inventory", "src/configs/inventory.csv"),
    ("inputs.product_master", "src/configs/product_master.csv"),
    ("inputs.sales", "src/configs/sales.csv"),
    ("output_dir", "target/"),
    ("log_dir", "logs/"),
];

/// Environment variables and the configuration key each one replaces.
pub const ENV_OVERRIDES: [(&str, &str); 6] = [
    ("inputs.demand", "DEMAND_FILE_PATH"),
    ("inputs.inventory", "INVENTORY_FILE_PATH"),
    ("inputs.product_master", "PRODUCT_MASTER_FILE_PATH"),
    ("inputs.sales", "SALES_FILE_PATH"),
    ("output_dir", "OUTPUT_FILE_PATH"),
    ("log_dir", "LOG_DIR"),
];

/// Loads the application configuration.
///
/// Sources are layered from lowest to highest precedence: built-in defaults,
/// the TOML file (`config_file`, or an optional `supply-kpi.toml`), environment
/// variables (a `.env` file is honored) and finally `overrides`. Empty
/// environment variables are treated as unset.
pub fn load_config(
    config_file: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<Settings, ConfigError> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            tracing::warn!("Ignoring unreadable .env file: {}", e);
        }
    }

    let mut builder = config::Config::builder();
    for (key, value) in DEFAULTS {
        builder = builder.set_default(key, value)?;
    }

    builder = match config_file {
        Some(path) => builder.add_source(config::File::from(path).required(true)),
        None => builder.add_source(config::File::with_name(DEFAULT_CONFIG_FILE).required(false)),
    };

    for (key, var) in ENV_OVERRIDES {
        let value = std::env::var(var).ok().filter(|v| !v.is_empty());
        builder = builder.set_override_option(key, value)?;
    }

    for (key, value) in overrides.entries() {
        builder = builder.set_override_option(key, value)?;
    }

    let settings = builder.build()?.try_deserialize::<Settings>()?;
    settings.validate()?;

    Ok(settings)
}
