use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::datasets::NominalCapacityTable;
use crate::eol::EolConfig;
use crate::health::HealthConfig;
use crate::statistics::ProjectionConfig;

/// Main application configuration
///
/// Serialized as TOML in the platform config directory. Every threshold
/// defaults to the calibrated constants of the estimation pipeline, so a
/// missing config file is equivalent to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// EOL estimation thresholds
    pub eol: EolConfig,

    /// Health assessment warning thresholds
    pub health: HealthConfig,

    /// Cycle-life projection settings
    pub projection: ProjectionConfig,

    /// Legacy dataset prefixes for nominal-capacity resolution
    pub datasets: Vec<DatasetPrefix>,
}

/// One legacy-dataset entry: file-name prefix → rated capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetPrefix {
    pub prefix: String,

    #[serde(rename = "nominal_capacity_in_Ah")]
    pub nominal_capacity_in_ah: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            eol: EolConfig::default(),
            health: HealthConfig::default(),
            projection: ProjectionConfig::default(),
            datasets: vec![
                DatasetPrefix {
                    prefix: "RWTH".to_string(),
                    nominal_capacity_in_ah: 1.85,
                },
                DatasetPrefix {
                    prefix: "SNL_18650_NCA_25C_20-80".to_string(),
                    nominal_capacity_in_ah: 3.2,
                },
            ],
        }
    }
}

impl AppConfig {
    /// Default config file location: `<config_dir>/cellrs/config.toml`.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cellrs")
            .join("config.toml")
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: AppConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Load the config at `path` (or the default location), falling back to
    /// defaults when no file exists.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(Self::default_path);
        if path.exists() {
            let config = Self::load(&path)?;
            tracing::debug!(path = %path.display(), "loaded configuration");
            Ok(config)
        } else {
            tracing::debug!("no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration as pretty TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config dir: {}", parent.display()))?;
        }
        let content =
            toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Capacity lookup table built from the configured dataset prefixes.
    pub fn capacity_table(&self) -> NominalCapacityTable {
        self.datasets
            .iter()
            .fold(NominalCapacityTable::empty(), |table, entry| {
                table.with_entry(entry.prefix.clone(), entry.nominal_capacity_in_ah)
            })
    }
}
