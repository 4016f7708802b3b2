//! Engine configuration, loaded from TOML.

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
	/// Default `tracing` filter directive for hosts that install a subscriber.
	pub log_filter: Option<String>,
	pub gates: GateConfig,
	pub pipeline: PipelineConfig,
}

/// Feature gates consulted by unit availability checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GateConfig {
	pub enabled: Vec<String>,
	/// Always wins over `enabled`.
	pub disabled: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
	/// Run each extension's pipeline as its own task.
	pub concurrent_extensions: bool,
	/// Tick budget for hosts that drive loading with [`crate::TickDriver`].
	pub max_ticks: Option<u64>,
}

impl Default for PipelineConfig {
	fn default() -> Self {
		Self {
			concurrent_extensions: true,
			max_ticks: None,
		}
	}
}

impl EngineConfig {
	pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(input)?)
	}

	/// Reads and parses a config file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let input = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		let config = Self::from_toml_str(&input)?;
		tracing::debug!(path = %path.display(), "config.loaded");
		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn parses_full_config() {
		let config = EngineConfig::from_toml_str(
			r#"
			log_filter = "cairn=debug"

			[gates]
			enabled = ["expansion.void"]
			disabled = ["equipment.unstable"]

			[pipeline]
			concurrent_extensions = false
			max_ticks = 500
			"#,
		)
		.unwrap();

		assert_eq!(config.log_filter.as_deref(), Some("cairn=debug"));
		assert_eq!(config.gates.enabled, vec!["expansion.void".to_owned()]);
		assert_eq!(config.gates.disabled, vec!["equipment.unstable".to_owned()]);
		assert_eq!(
			config.pipeline,
			PipelineConfig {
				concurrent_extensions: false,
				max_ticks: Some(500),
			}
		);
	}

	#[test]
	fn empty_input_uses_defaults() {
		let config = EngineConfig::from_toml_str("").unwrap();
		assert_eq!(config, EngineConfig::default());
		assert!(config.pipeline.concurrent_extensions);
	}

	#[test]
	fn unknown_keys_are_rejected() {
		let err = EngineConfig::from_toml_str("[pipeline]\nworkers = 4\n").unwrap_err();
		assert!(matches!(err, ConfigError::Parse(_)));
	}

	#[test]
	fn missing_file_reports_path() {
		let err = EngineConfig::load("/nonexistent/cairn.toml").unwrap_err();
		assert!(err.to_string().contains("/nonexistent/cairn.toml"));
	}
}
