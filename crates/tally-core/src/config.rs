//! Engine configuration
//!
//! Config is loaded with a two-layer resolution:
//! 1. An explicit path, or the override in the data dir
//!    (~/.local/share/tally/config/engine.toml), when the file exists
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Every section and key is optional; anything missing keeps its default.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::anomaly::AnomalyConfig;
use crate::classify::{CategoryKeywordMap, CategoryKeywords};
use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/engine.toml");

/// Default trailing window for spending analysis
pub const DEFAULT_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub window_days: i64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }
}

/// Resolved engine configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineConfig {
    pub analysis: AnalysisConfig,
    pub anomaly: AnomalyConfig,
    pub categories: CategoryKeywordMap,
}

impl EngineConfig {
    /// Load from `override_path` if given, else the default override location,
    /// falling back to the embedded defaults when no file exists
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let path = match override_path {
            Some(path) => Some(path.to_path_buf()),
            None => default_config_path(),
        };

        let content = match path {
            Some(ref path) if path.exists() => {
                debug!(path = %path.display(), "Loading engine config");
                fs::read_to_string(path).map_err(|e| {
                    Error::Config(format!("Failed to read {}: {}", path.display(), e))
                })?
            }
            Some(ref path) if override_path.is_some() => {
                warn!(path = %path.display(), "Config file not found, using defaults");
                DEFAULT_CONFIG.to_string()
            }
            _ => DEFAULT_CONFIG.to_string(),
        };

        Self::parse(&content)
    }

    /// The embedded defaults
    pub fn embedded() -> Result<Self> {
        Self::parse(DEFAULT_CONFIG)
    }

    /// Parse config from TOML content
    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

        let mut config = EngineConfig::default();

        if let Some(analysis) = raw.analysis {
            if let Some(window_days) = analysis.window_days {
                config.analysis.window_days = window_days;
            }
        }

        if let Some(anomaly) = raw.anomaly {
            if let Some(z) = anomaly.z_threshold {
                config.anomaly.z_threshold = z;
            }
            if let Some(min) = anomaly.min_transactions {
                config.anomaly.min_transactions = min;
            }
            if let Some(min) = anomaly.min_category_points {
                config.anomaly.min_category_points = min;
            }
            if let Some(count) = anomaly.recent_count {
                config.anomaly.recent_count = count;
            }
        }

        if let Some(categories) = raw.categories {
            config.categories = CategoryKeywordMap::new(
                categories
                    .into_iter()
                    .map(|c| CategoryKeywords::new(c.name, c.keywords)),
            );
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.analysis.window_days < 0 {
            return Err(Error::Config(format!(
                "analysis.window_days must not be negative, got {}",
                self.analysis.window_days
            )));
        }
        let z = self.anomaly.z_threshold;
        if !z.is_finite() || z <= 0.0 {
            return Err(Error::Config(format!(
                "anomaly.z_threshold must be a positive number, got {}",
                z
            )));
        }
        if self.anomaly.min_category_points < 2 {
            return Err(Error::Config(
                "anomaly.min_category_points must be at least 2".into(),
            ));
        }
        if self.anomaly.recent_count == 0 {
            return Err(Error::Config(
                "anomaly.recent_count must be at least 1".into(),
            ));
        }
        if self.categories.categories().any(|name| name.is_empty()) {
            return Err(Error::Config("category names must not be empty".into()));
        }
        Ok(())
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("tally").join("config").join("engine.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    analysis: Option<RawAnalysis>,
    anomaly: Option<RawAnomaly>,
    categories: Option<Vec<RawCategory>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAnalysis {
    window_days: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAnomaly {
    z_threshold: Option<f64>,
    min_transactions: Option<usize>,
    min_category_points: Option<usize>,
    recent_count: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCategory {
    name: String,
    #[serde(default)]
    keywords: Vec<String>,
}
