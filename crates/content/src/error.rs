use std::path::PathBuf;

/// Failure of a single content unit.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UnitError {
	/// A required backing resource could not be found.
	#[error("missing resource: {0}")]
	Missing(String),
	/// The unit reported a failure of its own.
	#[error("{0}")]
	Message(String),
	/// The unit panicked.
	#[error("panicked: {0}")]
	Panicked(String),
}

impl UnitError {
	pub fn msg(message: impl Into<String>) -> Self {
		Self::Message(message.into())
	}
}

/// A registered unit type that could not be instantiated.
#[derive(Debug, Clone, thiserror::Error)]
#[error("failed to instantiate unit {unit}: {source}")]
pub struct DiscoveryError {
	pub unit: &'static str,
	#[source]
	pub source: UnitError,
}

/// Configuration loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("failed to read {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("invalid config: {0}")]
	Parse(#[from] toml::de::Error),
}

/// Errors surfaced by [`crate::TickDriver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DriverError {
	/// The tick budget ran out before the future completed.
	#[error("future still pending after {ticks} ticks")]
	OutOfTicks { ticks: u64 },
	/// The future already completed and its output was taken.
	#[error("future already finished")]
	Finished,
}

/// Errors surfaced by [`crate::Engine`].
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
	#[error("extension {0:?} is already registered")]
	DuplicateExtension(String),
	#[error("content already loaded; extensions cannot be added after steady state")]
	AlreadyLoaded,
	#[error(transparent)]
	Driver(#[from] DriverError),
}
