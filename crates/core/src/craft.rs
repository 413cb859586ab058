//! Craft parameters and recipe records.
//!
//! Items that can be transformed at a station carry authored [`CraftAttrs`]
//! in the item pack. At load time those attributes are combined with the
//! session configuration into an immutable [`CraftParams`] table, which is
//! the only thing recipe resolution ever reads.

use crate::item::{ItemCode, ItemId, ItemStack};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default seconds for one spinning cycle when the item declares none.
pub const DEFAULT_SPIN_SECONDS: f32 = 4.0;

/// Seconds for one full loom shuttle cycle (the weave animation length).
pub const WEAVE_CYCLE_SECONDS: f32 = 8.53;

/// The two transformation processes a station can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Process {
    /// Fiber -> thread at the spinning wheel.
    Spinning,
    /// Thread -> cloth at the loom.
    Weaving,
}

/// Authored transformation metadata attached to an item definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CraftAttrs {
    /// Seconds per cycle; `None` falls back to the process default.
    #[serde(default)]
    pub duration: Option<f32>,
    /// Units consumed per cycle.
    #[serde(default = "default_one")]
    pub input_quantity: u32,
    /// Item produced per cycle.
    pub output: ItemCode,
    /// Units produced per cycle.
    #[serde(default = "default_one")]
    pub output_quantity: u32,
}

fn default_one() -> u32 {
    1
}

/// Finalized per-item quantity-recipe parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantityParams {
    /// Seconds of work required per cycle.
    pub duration: f32,
    /// Units consumed per cycle.
    pub input_quantity: u32,
    /// Item produced per cycle.
    pub output: ItemId,
    /// Units produced per cycle.
    pub output_quantity: u32,
}

/// Immutable table of craft parameters, built once per load.
///
/// Station instances receive this by shared reference; nothing mutates it
/// after the load-time override pass has produced it.
#[derive(Debug, Clone, Default)]
pub struct CraftParams {
    spinning: HashMap<ItemId, QuantityParams>,
    weaving: HashMap<ItemId, QuantityParams>,
}

impl CraftParams {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register parameters for an item under the given process.
    pub fn insert(&mut self, process: Process, item: ItemId, params: QuantityParams) {
        self.table_mut(process).insert(item, params);
    }

    /// Look up the parameters for an item under the given process.
    pub fn get(&self, process: Process, item: ItemId) -> Option<&QuantityParams> {
        self.table(process).get(&item)
    }

    /// Whether the item participates in the given process at all.
    pub fn accepts(&self, process: Process, item: ItemId) -> bool {
        self.table(process).contains_key(&item)
    }

    /// Number of items registered under the given process.
    pub fn len(&self, process: Process) -> usize {
        self.table(process).len()
    }

    /// Whether no items are registered under the given process.
    pub fn is_empty(&self, process: Process) -> bool {
        self.table(process).is_empty()
    }

    fn table(&self, process: Process) -> &HashMap<ItemId, QuantityParams> {
        match process {
            Process::Spinning => &self.spinning,
            Process::Weaving => &self.weaving,
        }
    }

    fn table_mut(&mut self, process: Process) -> &mut HashMap<ItemId, QuantityParams> {
        match process {
            Process::Spinning => &mut self.spinning,
            Process::Weaving => &mut self.weaving,
        }
    }
}

/// A 2x2 positional weaving recipe loaded from external definitions.
///
/// The four slot predicates are exact item matches; there is no wildcard
/// support. The first recipe in table order whose four slots all match wins.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternRecipe {
    /// Recipe identifier, for logging and diagnostics.
    pub code: ItemCode,
    /// Required items: top-left, top-right, bottom-left, bottom-right.
    pub slots: [ItemId; 4],
    /// Units consumed from every slot per cycle.
    pub quantity_per_slot: u32,
    /// Item produced per cycle.
    pub output: ItemId,
    /// Units produced per cycle.
    pub output_quantity: u32,
}

impl PatternRecipe {
    /// Check whether the four pattern slots match this recipe exactly.
    ///
    /// Any empty slot or any single mismatching slot fails the whole match.
    pub fn matches(&self, slots: &[Option<ItemStack>; 4]) -> bool {
        slots
            .iter()
            .zip(self.slots.iter())
            .all(|(held, required)| held.is_some_and(|stack| stack.item == *required))
    }

    /// Check whether every slot holds at least `quantity_per_slot` units.
    pub fn has_sufficient_input(&self, slots: &[Option<ItemStack>; 4]) -> bool {
        slots
            .iter()
            .all(|held| held.is_some_and(|stack| stack.count >= self.quantity_per_slot))
    }
}
