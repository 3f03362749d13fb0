//! Configuration for campus-desk
//!
//! Sources are layered: built-in defaults, then `<data-dir>/config.yaml`,
//! then `CAMPUS_DESK__*` environment variables
//! (e.g. `CAMPUS_DESK__ANOMALY__BRUTE_FORCE_THRESHOLD=5`).

use crate::audit::AnomalyThresholds;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default data directory, relative to the working directory
pub const DEFAULT_DATA_DIR: &str = ".campus-desk";

/// Name of the configuration file inside the data directory
pub const CONFIG_FILE: &str = "config.yaml";

/// Role id that marks a user as a student; every other role is staff
pub const DEFAULT_STUDENT_ROLE: &str = "student";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Role id identifying students
    pub student_role_id: String,
    /// Number of calendar days in the activity trend
    pub trend_days: u32,
    /// Anomaly detection thresholds
    pub anomaly: AnomalyThresholds,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            student_role_id: DEFAULT_STUDENT_ROLE.to_string(),
            trend_days: 7,
            anomaly: AnomalyThresholds::default(),
        }
    }
}

impl Config {
    /// Load configuration for the data directory `data_dir`
    pub fn load(data_dir: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(
                config::File::from(data_dir.join(CONFIG_FILE))
                    .format(config::FileFormat::Yaml)
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix("CAMPUS_DESK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        tracing::debug!(?config, dir = %data_dir.display(), "loaded configuration");
        Ok(config)
    }

    /// Write this configuration to `<data_dir>/config.yaml`
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        fs::create_dir_all(data_dir)?;
        fs::write(data_dir.join(CONFIG_FILE), serde_yaml::to_string(self)?)?;
        Ok(())
    }
}
