//! Engine configuration

use asp_grounding::GroundingOptions;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub grounding: GroundingOptions,
    /// Reject programs with unsafe rules before grounding
    pub check_safety: bool,
    /// Run model generation on a worker thread with a queue of this size
    pub queue_capacity: Option<usize>,
    /// Stop after this many answer sets
    pub max_models: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            grounding: GroundingOptions::default(),
            check_safety: true,
            queue_capacity: None,
            max_models: None,
        }
    }
}

impl EngineConfig {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asp_grounding::OptLevel;

    #[test]
    fn test_missing_fields_take_defaults() {
        let config = EngineConfig::from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert!(config.check_safety);
    }

    #[test]
    fn test_nested_options() {
        let config = EngineConfig::from_json(
            r#"{ "grounding": { "maxint": 5, "optimization": "builtin" }, "queue_capacity": 8 }"#,
        )
        .unwrap();
        assert_eq!(config.grounding.maxint, Some(5));
        assert_eq!(config.grounding.optimization, OptLevel::Builtin);
        assert_eq!(config.queue_capacity, Some(8));
        assert_eq!(config.max_models, None);
    }

    #[test]
    fn test_json_round_trip() {
        let config = EngineConfig {
            max_models: Some(3),
            check_safety: false,
            ..Default::default()
        };
        let text = config.to_json().unwrap();
        assert_eq!(EngineConfig::from_json(&text).unwrap(), config);
    }

    #[test]
    fn test_unknown_optimization_is_rejected() {
        assert!(EngineConfig::from_json(r#"{ "grounding": { "optimization": "max" } }"#).is_err());
    }
}
