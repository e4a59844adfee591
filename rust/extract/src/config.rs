// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extraction configuration loaded from JSON files and environment variables.

use std::path::Path;

use formwork_geometry::ReconstructOptions;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::policy::LayerFilterConfig;

/// Extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Polygon reconstruction tuning.
    pub reconstruct: ReconstructOptions,
    /// Annotation filter rules.
    pub filter: LayerFilterConfig,
    /// Apply the annotation filter. When false every element contributes.
    pub apply_filter: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            reconstruct: ReconstructOptions::default(),
            filter: LayerFilterConfig::default(),
            apply_filter: true,
        }
    }
}

impl ExtractionConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparseable variables keep their default values.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Load a JSON configuration file. Missing keys keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Apply `FORMWORK_*` environment overrides on top of this configuration.
    pub fn with_env_overrides(mut self) -> Self {
        self.reconstruct.tolerance = env_or("FORMWORK_TOLERANCE", self.reconstruct.tolerance);
        self.reconstruct.min_area = env_or("FORMWORK_MIN_AREA", self.reconstruct.min_area);
        self.reconstruct.max_depth = env_or("FORMWORK_MAX_DEPTH", self.reconstruct.max_depth);
        if env_flag("FORMWORK_NO_FILTER") {
            self.apply_filter = false;
        }
        self
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

/// `1`, `true` or `yes` (any case) enable a flag
fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|value| {
            let value = value.trim().to_ascii_lowercase();
            matches!(value.as_str(), "1" | "true" | "yes")
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExtractionConfig::default();
        assert_eq!(config.reconstruct.tolerance, 0.5);
        assert_eq!(config.reconstruct.min_area, 100.0);
        assert_eq!(config.reconstruct.max_depth, 100);
        assert!(config.apply_filter);
    }

    #[test]
    fn test_partial_json() {
        let config: ExtractionConfig = serde_json::from_str(
            r#"{ "reconstruct": { "tolerance": 1.5 }, "apply_filter": false }"#,
        )
        .unwrap();
        assert_eq!(config.reconstruct.tolerance, 1.5);
        assert_eq!(config.reconstruct.min_area, 100.0);
        assert!(!config.apply_filter);
        assert_eq!(config.filter, LayerFilterConfig::default());
    }

    #[test]
    fn test_env_overrides() {
        // No other test reads these variables
        std::env::set_var("FORMWORK_MAX_DEPTH", "12");
        std::env::set_var("FORMWORK_MIN_AREA", "not-a-number");
        std::env::set_var("FORMWORK_NO_FILTER", "Yes");
        let config = ExtractionConfig::from_env();
        std::env::remove_var("FORMWORK_MAX_DEPTH");
        std::env::remove_var("FORMWORK_MIN_AREA");
        std::env::remove_var("FORMWORK_NO_FILTER");

        assert_eq!(config.reconstruct.max_depth, 12);
        assert_eq!(config.reconstruct.min_area, 100.0);
        assert!(!config.apply_filter);
    }

    #[test]
    fn test_missing_file() {
        assert!(ExtractionConfig::from_file("/nonexistent/formwork.json").is_err());
    }
}
