//! Engine configuration file.
//!
//! ```toml
//! catalog = "catalog/travel.yaml"   # optional; built-in catalog otherwise
//!
//! [confidence]
//! min_samples = 5
//! high_confidence_samples = 20
//! score_variance_threshold = 15.0
//! trend_window = 10
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analyzer::Analyzer;
use crate::catalog::CriteriaCatalog;
use crate::confidence::ConfidenceConfig;
use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Catalog file; relative paths resolve against the config file.
    #[serde(default)]
    pub catalog: Option<PathBuf>,
    #[serde(default)]
    pub confidence: ConfidenceConfig,
}

impl EngineConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&contents)?;
        if let (Some(catalog), Some(dir)) = (&config.catalog, path.parent()) {
            if catalog.is_relative() {
                config.catalog = Some(dir.join(catalog));
            }
        }
        info!(path = %path.display(), "loaded engine configuration");
        Ok(config)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.confidence.validate()?;
        Ok(config)
    }

    pub fn catalog(&self) -> Result<CriteriaCatalog, ConfigError> {
        Ok(match &self.catalog {
            Some(path) => CriteriaCatalog::load(path)?,
            None => CriteriaCatalog::builtin()?,
        })
    }

    pub fn analyzer(&self) -> Result<Analyzer, ConfigError> {
        Ok(Analyzer::new(self.catalog()?)?)
    }
}
