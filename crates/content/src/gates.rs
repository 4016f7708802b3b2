use rustc_hash::FxHashSet;

use crate::config::GateConfig;

/// Set of enabled feature gates.
///
/// Units consult gates from [`ContentUnit::is_available`](crate::ContentUnit::is_available)
/// to opt out of loading.
#[derive(Debug, Clone, Default)]
pub struct FeatureGates {
	enabled: FxHashSet<String>,
}

impl FeatureGates {
	pub fn new() -> Self {
		Self::default()
	}

	/// Enabled gates are the configured `enabled` minus `disabled`.
	pub fn from_config(config: &GateConfig) -> Self {
		let mut gates = Self::new();
		for gate in &config.enabled {
			gates.enable(gate.clone());
		}
		for gate in &config.disabled {
			gates.disable(gate);
		}
		gates
	}

	pub fn enable(&mut self, gate: impl Into<String>) {
		self.enabled.insert(gate.into());
	}

	pub fn disable(&mut self, gate: &str) {
		self.enabled.remove(gate);
	}

	pub fn is_enabled(&self, gate: &str) -> bool {
		self.enabled.contains(gate)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn disabled_wins_over_enabled() {
		let gates = FeatureGates::from_config(&GateConfig {
			enabled: vec!["a".into(), "b".into()],
			disabled: vec!["b".into()],
		});
		assert!(gates.is_enabled("a"));
		assert!(!gates.is_enabled("b"));
		assert!(!gates.is_enabled("c"));
	}
}
