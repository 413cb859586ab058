#![warn(missing_docs)]
//! Content loading: item packs, pattern recipes, session config, and the
//! load-time config override pass.

mod config;
mod config_patch;
mod items;
mod pattern_recipes;

pub use config::{FibercraftConfig, SpinOverride, WeaveOverride};
pub use config_patch::{build_craft_params, disable_competing_recipes, GridRecipe};
pub use items::{items_from_file, items_from_str, CraftAttrsDef, ItemDefinition};
pub use pattern_recipes::{pattern_recipes_from_file, pattern_recipes_from_str};

use thiserror::Error;

/// Errors emitted during content loading.
#[derive(Debug, Error)]
pub enum AssetError {
    /// Wrap IO errors when reading content files.
    #[error("failed to read content file: {0}")]
    Io(#[from] std::io::Error),
    /// Wrap serde parsing issues.
    #[error("failed to parse content file: {0}")]
    Parse(#[from] serde_json::Error),
}
