//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, Result, ResultExt};
use std::path::{Path, PathBuf};

/// Configuration wrapper
#[derive(Debug, Clone)]
pub struct Config {
    pub schema: ConfigSchema,
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file path or use defaults
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = match path {
            Some(p) => {
                let p = PathBuf::from(p);
                if !p.exists() {
                    return Err(Error::config_not_found(&p));
                }
                Some(p)
            }
            None => find_config_file(),
        };

        let schema = if let Some(ref p) = config_path {
            load_config_file(p)?
        } else {
            ConfigSchema::default()
        };

        let config = Self {
            schema,
            path: config_path,
        };
        config.validate()?;

        tracing::debug!(path = ?config.path, "Configuration loaded");
        Ok(config)
    }

    /// Load with defaults only (no file)
    pub fn default() -> Self {
        Self {
            schema: ConfigSchema::default(),
            path: None,
        }
    }

    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<()> {
        let search = &self.schema.search;

        if !(0.0..=1.0).contains(&search.threshold) {
            return Err(Error::config_invalid(format!(
                "search.threshold must be between 0 and 1, got {}",
                search.threshold
            )));
        }

        let w = &search.weights;
        if [w.position, w.company, w.location].iter().any(|v| *v < 0.0 || !v.is_finite()) {
            return Err(Error::config_invalid("search.weights must be non-negative numbers"));
        }
        if w.position + w.company + w.location <= 0.0 {
            return Err(Error::config_invalid("search.weights must not all be zero"));
        }

        if let Some(rule) = self.schema.metros.iter().find(|r| r.label.trim().is_empty()) {
            return Err(Error::config_invalid(format!(
                "metro rule with keywords {:?} has an empty label",
                rule.keywords
            )));
        }

        Ok(())
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<PathBuf> {
    let local = [".jobboard.toml", "jobboard.toml"]
        .into_iter()
        .map(PathBuf::from);
    let user = dirs::config_dir().map(|d| d.join("jobboard").join("config.toml"));

    local.chain(user).find(|candidate| candidate.exists())
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &Path) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::config(format!("Failed to read config file {}: {}", path.display(), e))
            .with_source(e)
    })?;

    toml::from_str(&content)
        .map_err(Error::from)
        .context(format!("Parsing config file {}", path.display()))
}
