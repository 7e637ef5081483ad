//! Ingestion configuration.
//!
//! ```toml
//! initial-load = true
//!
//! [registry]
//! activity-merge = "keep-latest"
//! verify-invariants = false
//! ```

use std::path::Path;

use addrbook_registry::{ConfigError, RegistryConfig};
use addrbook_view::ViewAdapter;
use serde::Deserialize;

/// Configuration for the ingest service and the registry it feeds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct IngestConfig {
	/// Registry settings.
	pub registry: RegistryConfig,
	/// Whether the service loads all sources before handling events.
	pub initial_load: bool,
}

impl Default for IngestConfig {
	fn default() -> Self {
		Self {
			registry: RegistryConfig::default(),
			initial_load: true,
		}
	}
}

impl IngestConfig {
	/// Parses a TOML document. Missing keys take their defaults.
	pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
		toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
	}

	/// Reads and parses a TOML file.
	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_toml_str(&content)
	}

	/// Creates an empty view whose registry uses these settings.
	pub fn build_view(&self) -> ViewAdapter {
		ViewAdapter::with_config(self.registry.clone())
	}
}
