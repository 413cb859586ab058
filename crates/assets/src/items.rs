//! Item pack loading.
//!
//! Item packs are JSON lists of definitions carrying the authored craft
//! attributes under `spinningProps` / `weavingProps`. Loading finalizes
//! straight into an [`ItemRegistry`].

use std::fs;
use std::path::Path;

use crate::AssetError;
use fibercraft_core::{CraftAttrs, ItemCode, ItemDef, ItemRegistry, DEFAULT_STACK_SIZE};
use serde::Deserialize;

/// One item entry in a pack file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDefinition {
    /// Namespaced code; bare paths default to the `game` domain.
    pub code: String,
    /// Maximum stack size.
    #[serde(default = "default_max_stack")]
    pub max_stack: u32,
    /// Spinning attributes, when the item can be spun.
    #[serde(default, alias = "spinningProps")]
    pub spinning: Option<CraftAttrsDef>,
    /// Weaving attributes, when the item can be woven.
    #[serde(default, alias = "weavingProps")]
    pub weaving: Option<CraftAttrsDef>,
}

fn default_max_stack() -> u32 {
    DEFAULT_STACK_SIZE
}

/// Authored craft attributes as they appear in pack JSON.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CraftAttrsDef {
    /// Seconds per cycle; absent means the process default.
    #[serde(default, alias = "spinTime")]
    pub duration: Option<f32>,
    /// Units consumed per cycle.
    #[serde(default = "default_one")]
    pub input_quantity: u32,
    /// Produced item code.
    pub output: String,
    /// Units produced per cycle.
    #[serde(default = "default_one")]
    pub output_quantity: u32,
}

fn default_one() -> u32 {
    1
}

impl From<CraftAttrsDef> for CraftAttrs {
    fn from(def: CraftAttrsDef) -> Self {
        Self {
            duration: def.duration,
            input_quantity: def.input_quantity,
            output: ItemCode::parse(&def.output),
            output_quantity: def.output_quantity,
        }
    }
}

/// Load an item registry from a JSON pack file.
pub fn items_from_file(path: &Path) -> Result<ItemRegistry, AssetError> {
    let data = fs::read_to_string(path)?;
    items_from_str(&data)
}

/// Load an item registry from an in-memory JSON pack.
pub fn items_from_str(input: &str) -> Result<ItemRegistry, AssetError> {
    let defs: Vec<ItemDefinition> = serde_json::from_str(input)?;
    Ok(ItemRegistry::new(
        defs.into_iter()
            .map(|def| ItemDef {
                code: ItemCode::parse(&def.code),
                max_stack: def.max_stack,
                spinning: def.spinning.map(Into::into),
                weaving: def.weaving.map(Into::into),
            })
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_items_with_craft_attributes() {
        let registry = items_from_str(
            r#"[
                {
                    "code": "game:flaxfibers",
                    "spinningProps": { "spinTime": 4.0, "inputQuantity": 2, "output": "game:flaxtwine" }
                },
                { "code": "game:flaxtwine", "maxStack": 32 },
                { "code": "linen-normal-down" }
            ]"#,
        )
        .unwrap();

        assert_eq!(registry.len(), 3);
        let fibers = registry.def(0).unwrap();
        let spinning = fibers.spinning.as_ref().unwrap();
        assert_eq!(spinning.duration, Some(4.0));
        assert_eq!(spinning.input_quantity, 2);
        assert_eq!(spinning.output, ItemCode::parse("game:flaxtwine"));
        assert_eq!(spinning.output_quantity, 1);

        assert_eq!(registry.max_stack(1), 32);
        // Bare code lands in the game domain.
        assert_eq!(
            registry.id_by_code(&ItemCode::parse("game:linen-normal-down")),
            Some(2)
        );
    }

    #[test]
    fn malformed_pack_is_a_parse_error() {
        let err = items_from_str("{ not json ]").unwrap_err();
        assert!(matches!(err, AssetError::Parse(_)));
    }
}
