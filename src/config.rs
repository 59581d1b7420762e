//! Page-level configuration.
//!
//! The host page may embed `<script id="repo-graph-config" type="application/json">`
//! with any subset of [`AppConfig`]'s fields; missing fields take defaults.

use log::{info, warn};
use serde::Deserialize;
use thiserror::Error;

use crate::components::force_graph::ThemeName;
use crate::customization::LayoutMode;

/// Id of the script element carrying the configuration JSON.
pub const CONFIG_ELEMENT_ID: &str = "repo-graph-config";

/// Why an embedded configuration was rejected.
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("invalid repo-graph config: {0}")]
	Parse(#[from] serde_json::Error),
	#[error("max_tree_depth must be at least 1")]
	ZeroDepth,
}

/// Runtime settings read from the host page.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
	/// Endpoint queried as `GET {endpoint}?repo={locator}`.
	pub describer_endpoint: String,
	/// Layout mode selected before the user changes it.
	pub default_layout: LayoutMode,
	/// Deepest tree nesting accepted from the describer.
	pub max_tree_depth: usize,
	/// Canvas theme preset.
	pub theme: ThemeName,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			describer_endpoint: "/api/describe".to_string(),
			default_layout: LayoutMode::Force,
			max_tree_depth: 3,
			theme: ThemeName::Midnight,
		}
	}
}

impl AppConfig {
	/// Parses a configuration document; absent fields take their defaults.
	pub fn from_json(json: &str) -> Result<Self, ConfigError> {
		let config: AppConfig = serde_json::from_str(json)?;
		if config.max_tree_depth == 0 {
			return Err(ConfigError::ZeroDepth);
		}
		Ok(config)
	}
}

/// Loads the page configuration, falling back to defaults on absence or error.
pub fn load_config() -> AppConfig {
	let Some(text) = crate::dom::script_text(CONFIG_ELEMENT_ID) else {
		return AppConfig::default();
	};
	match AppConfig::from_json(&text) {
		Ok(config) => {
			info!("repo-graph: loaded config, describer at {}", config.describer_endpoint);
			config
		}
		Err(e) => {
			warn!("repo-graph: {e}; using defaults");
			AppConfig::default()
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_config_keeps_defaults() {
		let config = AppConfig::from_json(r#"{"default_layout": "radial"}"#).unwrap();
		assert_eq!(config.default_layout, LayoutMode::Radial);
		assert_eq!(config.describer_endpoint, "/api/describe");
		assert_eq!(config.max_tree_depth, 3);
		assert_eq!(config.theme, ThemeName::Midnight);
	}

	#[test]
	fn theme_and_endpoint_are_read() {
		let config =
			AppConfig::from_json(r#"{"theme": "flat", "describer_endpoint": "https://x/describe"}"#)
				.unwrap();
		assert_eq!(config.theme, ThemeName::Flat);
		assert_eq!(config.describer_endpoint, "https://x/describe");
	}

	#[test]
	fn unknown_layout_is_a_parse_error() {
		assert!(matches!(
			AppConfig::from_json(r#"{"default_layout": "grid"}"#),
			Err(ConfigError::Parse(_))
		));
	}

	#[test]
	fn zero_depth_is_rejected() {
		assert!(matches!(
			AppConfig::from_json(r#"{"max_tree_depth": 0}"#),
			Err(ConfigError::ZeroDepth)
		));
	}

	#[test]
	fn load_without_document_uses_defaults() {
		assert_eq!(load_config(), AppConfig::default());
	}
}
