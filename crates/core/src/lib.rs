#![warn(missing_docs)]
//! Core primitives shared across the workspace.

pub mod craft;
pub mod item;
pub mod registry;

// Re-export commonly used types
pub use craft::{
    CraftAttrs, CraftParams, PatternRecipe, Process, QuantityParams, DEFAULT_SPIN_SECONDS,
    WEAVE_CYCLE_SECONDS,
};
pub use item::{ItemCode, ItemId, ItemStack, DEFAULT_STACK_SIZE};
pub use registry::{ItemDef, ItemRegistry};
