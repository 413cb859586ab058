//! Pattern-recipe loading.
//!
//! Pattern recipes are external JSON definitions naming the four grid
//! items positionally. Entries marked disabled are skipped, and entries
//! referencing items the registry does not know are dropped with a
//! warning, which is how optional content gates its patterns.

use std::fs;
use std::path::Path;

use crate::AssetError;
use fibercraft_core::{ItemCode, ItemId, ItemRegistry, PatternRecipe};
use serde::Deserialize;
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PatternRecipeDef {
    code: String,
    #[serde(default = "default_true")]
    enabled: bool,
    pattern: PatternSlotsDef,
    input: PatternInputDef,
    output: PatternOutputDef,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PatternSlotsDef {
    top_left: String,
    top_right: String,
    bottom_left: String,
    bottom_right: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PatternInputDef {
    #[serde(default = "default_one")]
    quantity_per_slot: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PatternOutputDef {
    #[serde(rename = "type")]
    item: String,
    #[serde(default = "default_one")]
    quantity: u32,
}

fn default_one() -> u32 {
    1
}

fn resolve(registry: &ItemRegistry, recipe_code: &str, code: &str) -> Option<ItemId> {
    let id = registry.id_by_code(&ItemCode::parse(code));
    if id.is_none() {
        warn!(recipe = recipe_code, item = code, "pattern item not registered, dropping recipe");
    }
    id
}

/// Load pattern recipes from a JSON file, resolved against the registry.
pub fn pattern_recipes_from_file(
    path: &Path,
    registry: &ItemRegistry,
) -> Result<Vec<PatternRecipe>, AssetError> {
    let data = fs::read_to_string(path)?;
    pattern_recipes_from_str(&data, registry)
}

/// Load pattern recipes from an in-memory JSON string.
///
/// Table order is preserved; resolution keeps first-match-wins stable.
pub fn pattern_recipes_from_str(
    input: &str,
    registry: &ItemRegistry,
) -> Result<Vec<PatternRecipe>, AssetError> {
    let defs: Vec<PatternRecipeDef> = serde_json::from_str(input)?;
    let total = defs.len();
    let mut recipes = Vec::with_capacity(total);

    for def in defs {
        if !def.enabled {
            debug!(recipe = def.code, "pattern recipe disabled, skipping");
            continue;
        }
        let slots = [
            resolve(registry, &def.code, &def.pattern.top_left),
            resolve(registry, &def.code, &def.pattern.top_right),
            resolve(registry, &def.code, &def.pattern.bottom_left),
            resolve(registry, &def.code, &def.pattern.bottom_right),
        ];
        let output = resolve(registry, &def.code, &def.output.item);
        let (Some(tl), Some(tr), Some(bl), Some(br), Some(output)) =
            (slots[0], slots[1], slots[2], slots[3], output)
        else {
            continue;
        };
        recipes.push(PatternRecipe {
            code: ItemCode::parse(&def.code),
            slots: [tl, tr, bl, br],
            quantity_per_slot: def.input.quantity_per_slot,
            output,
            output_quantity: def.output.quantity,
        });
    }

    info!(loaded = recipes.len(), total, "pattern recipes loaded");
    Ok(recipes)
}
