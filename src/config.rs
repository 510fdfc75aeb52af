//! Runtime configuration of the patch ↔ mesh bridge.

use crate::bridge_error::BridgeError;
use crate::topology::point::NodeIdMap;

/// Options threaded into [`MultiPatchModelPart`](crate::MultiPatchModelPart).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BridgeOptions {
    /// Name of the generated mesh; kept across regeneration cycles.
    pub model_part_name: String,
    /// Node id of equation id `eq` is `eq + node_id_offset`.
    pub node_id_offset: u64,
    /// Integration method used when a property record sets none.
    pub default_integration_method: i32,
    /// Log per-phase timings at debug level.
    pub profile: bool,
}

impl Default for BridgeOptions {
    fn default() -> Self {
        Self {
            model_part_name: "MultiPatch".to_owned(),
            node_id_offset: 1,
            default_integration_method: 1,
            profile: false,
        }
    }
}

impl BridgeOptions {
    pub fn validate(&self) -> Result<(), BridgeError> {
        if self.model_part_name.is_empty() {
            return Err(BridgeError::InvalidOptions(
                "model_part_name must not be empty".into(),
            ));
        }
        if self.node_id_offset == 0 {
            return Err(BridgeError::InvalidOptions(
                "node_id_offset must be at least 1".into(),
            ));
        }
        if self.default_integration_method < 0 {
            return Err(BridgeError::InvalidOptions(format!(
                "default_integration_method must be non-negative, got {}",
                self.default_integration_method
            )));
        }
        Ok(())
    }

    /// Equation id ↔ node id transform described by these options.
    pub fn node_id_map(&self) -> Result<NodeIdMap, BridgeError> {
        NodeIdMap::new(self.node_id_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let o = BridgeOptions::default();
        o.validate().unwrap();
        assert_eq!(o.node_id_map().unwrap().offset(), 1);
    }

    #[test]
    fn rejects_zero_offset_and_empty_name() {
        let o = BridgeOptions {
            node_id_offset: 0,
            ..Default::default()
        };
        assert!(matches!(o.validate(), Err(BridgeError::InvalidOptions(_))));
        assert!(o.node_id_map().is_err());

        let o = BridgeOptions {
            model_part_name: String::new(),
            ..Default::default()
        };
        assert!(o.validate().is_err());
    }

    #[test]
    fn json_fills_missing_fields() {
        let o: BridgeOptions =
            serde_json::from_str(r#"{ "model_part_name": "IGA", "profile": true }"#).unwrap();
        assert_eq!(o.model_part_name, "IGA");
        assert!(o.profile);
        assert_eq!(o.node_id_offset, 1);
        assert_eq!(o.default_integration_method, 1);

        let back: BridgeOptions = serde_json::from_str(&serde_json::to_string(&o).unwrap()).unwrap();
        assert_eq!(back, o);
    }
}
