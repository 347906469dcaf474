use anyhow::{Context, Result};
use backup_rotation::{Bucket, RetentionPolicy};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

fn default_directory() -> PathBuf {
    PathBuf::from(".")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory holding the backups
    #[serde(default = "default_directory")]
    pub directory: PathBuf,

    /// Which backups survive a rotation
    #[serde(default)]
    pub retention: RetentionPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            retention: RetentionPolicy::default(),
        }
    }
}

/// Values given on the command line. Anything set here wins over the file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub directory: Option<PathBuf>,
    pub keep_days: Option<i64>,
    pub keep_last_per: Vec<Bucket>,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse YAML config file: {}", path.display()))?;
        Ok(config)
    }

    /// Builds the effective configuration from an optional file and overrides.
    pub fn load(path: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_yaml_file(path)
                .with_context(|| format!("Loading config from {}", path.display()))?,
            None => Config::default(),
        };

        if let Some(directory) = overrides.directory {
            config.directory = directory;
        }
        if let Some(keep_days) = overrides.keep_days {
            config.retention.keep_days = keep_days;
        }
        if !overrides.keep_last_per.is_empty() {
            config.retention = config.retention.with_buckets(overrides.keep_last_per);
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.directory.as_os_str().is_empty() {
            anyhow::bail!("directory must not be empty");
        }

        if self.retention.keep_days < 0 {
            warn!(
                "retention.keep_days is {}; no backup will be kept for its age",
                self.retention.keep_days
            );
        }

        Ok(())
    }
}
