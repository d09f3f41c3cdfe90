//! Host-tunable engine knobs, deserialized from the host's own TOML config
//! the way the teacher's `xeno-keymap` crate loads its keybinding configuration.

use crate::mapping::MAX_MAPPING_DEPTH;

/// Configuration accepted by [`crate::engine::Engine::with_config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct EngineConfig {
	/// Upper bound on nested user-mapping expansion before `RecursionTooDeep`.
	pub max_mapping_depth: usize,
	/// Advisory timeout, in milliseconds, carried by `DispatchStatus::WaitShort`.
	pub timeout_ms: u64,
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			max_mapping_depth: MAX_MAPPING_DEPTH,
			timeout_ms: 1000,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_match_the_documented_values() {
		let config = EngineConfig::default();
		assert_eq!(config.max_mapping_depth, 256);
		assert_eq!(config.timeout_ms, 1000);
	}

	#[cfg(feature = "config")]
	#[test]
	fn deserializes_from_toml_with_partial_overrides() {
		let config: EngineConfig = toml::from_str("timeout_ms = 250\n").unwrap();
		assert_eq!(config.timeout_ms, 250);
		assert_eq!(config.max_mapping_depth, 256);
	}
}
