use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub inputs: InputPaths,
    /// Directory the eight result files are written into. Created on demand.
    pub output_dir: PathBuf,
    /// Directory holding the daily full and error log files.
    pub log_dir: PathBuf,
}

/// Locations of the four source extracts.
#[derive(Debug, Clone, Deserialize)]
pub struct InputPaths {
    pub demand: PathBuf,
    pub inventory: PathBuf,
    pub product_master: PathBuf,
    pub sales: PathBuf,
}

impl Settings {
    /// Rejects settings that would only fail later with a less helpful error.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let paths: [(&str, &Path); 6] = [
            ("inputs.demand", &self.inputs.demand),
            ("inputs.inventory", &self.inputs.inventory),
            ("inputs.product_master", &self.inputs.product_master),
            ("inputs.sales", &self.inputs.sales),
            ("output_dir", &self.output_dir),
            ("log_dir", &self.log_dir),
        ];

        for (key, path) in paths {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::ValidationError(format!("'{key}' must not be empty")));
            }
        }

        Ok(())
    }
}

/// Per-invocation overrides, applied on top of every other configuration source.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct ConfigOverrides {
    /// Path to the demand CSV.
    #[cfg_attr(feature = "clap", arg(long))]
    pub demand: Option<PathBuf>,

    /// Path to the inventory CSV.
    #[cfg_attr(feature = "clap", arg(long))]
    pub inventory: Option<PathBuf>,

    /// Path to the product master CSV.
    #[cfg_attr(feature = "clap", arg(long))]
    pub product_master: Option<PathBuf>,

    /// Path to the sales CSV.
    #[cfg_attr(feature = "clap", arg(long))]
    pub sales: Option<PathBuf>,

    /// Directory the result files are written into.
    #[cfg_attr(feature = "clap", arg(long))]
    pub output_dir: Option<PathBuf>,

    /// Directory for the full and error log files.
    #[cfg_attr(feature = "clap", arg(long))]
    pub log_dir: Option<PathBuf>,
}

impl ConfigOverrides {
    /// Pairs every override with the configuration key it replaces.
    pub(crate) fn entries(&self) -> [(&'static str, Option<String>); 6] {
        let as_value = |path: &Option<PathBuf>| {
            path.as_ref()
                .map(|p| p.to_string_lossy().into_owned())
        };

        [
            ("inputs.demand", as_value(&self.demand)),
            ("inputs.inventory", as_value(&self.inventory)),
            ("inputs.product_master", as_value(&self.product_master)),
            ("inputs.sales", as_value(&self.sales)),
            ("output_dir", as_value(&self.output_dir)),
            ("log_dir", as_value(&self.log_dir)),
        ]
    }
}
