// Runtime settings
//
// Precedence, lowest first: built-in defaults, TOML file, SMARTMON_* environment
// variables, command line flags (applied by the binary after loading).

use crate::{SmartmonError, SmartmonResult};
use ::config::{Config, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_SMARTCTL: &str = "smartctl";
pub const DEFAULT_PREFIX: &str = "smartmon_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// smartctl binary name or path
    pub smartctl_path: String,
    /// Prefix prepended to every exported metric name
    pub metric_prefix: String,
    /// Collect from drives in standby, spinning them up
    pub wakeup_disks: bool,
    /// Arguments for the device scan
    pub scan_args: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            smartctl_path: DEFAULT_SMARTCTL.to_string(),
            metric_prefix: DEFAULT_PREFIX.to_string(),
            wakeup_disks: false,
            scan_args: default_scan_args(),
        }
    }
}

fn default_scan_args() -> Vec<String> {
    ["-d", "by-id", "--scan-open"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Settings {
    /// Load settings from `path` (or the per-user default location) and the environment.
    ///
    /// A missing default file is fine; an explicitly given file must exist.
    pub fn load(path: Option<&Path>) -> SmartmonResult<Self> {
        let defaults = Settings::default();

        let mut builder = Config::builder()
            .set_default("smartctl_path", defaults.smartctl_path)?
            .set_default("metric_prefix", defaults.metric_prefix)?
            .set_default("wakeup_disks", defaults.wakeup_disks)?
            .set_default("scan_args", defaults.scan_args)?;

        match path {
            Some(path) => {
                builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
            }
            None => {
                if let Some(default_path) = Self::default_path() {
                    builder = builder.add_source(
                        File::from(default_path)
                            .format(FileFormat::Toml)
                            .required(false),
                    );
                }
            }
        }

        let settings: Settings = builder
            .add_source(Environment::with_prefix("SMARTMON").try_parsing(true))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// `<user config dir>/smartmon/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "smartmontools", "smartmon")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn validate(&self) -> SmartmonResult<()> {
        if self.metric_prefix.is_empty() {
            return Err(SmartmonError::InvalidValue(
                "metric_prefix must not be empty".to_string(),
            ));
        }
        if self.smartctl_path.trim().is_empty() {
            return Err(SmartmonError::InvalidValue(
                "smartctl_path must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
