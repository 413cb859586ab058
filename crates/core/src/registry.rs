//! Finalized item registry.
//!
//! Interns authored item codes to dense [`ItemId`]s. The registry is built
//! once at load time and immutable afterwards; the config override pass
//! reads the authored craft attributes from here when producing the
//! [`crate::CraftParams`] table.

use crate::craft::CraftAttrs;
use crate::item::{ItemCode, ItemId, DEFAULT_STACK_SIZE};
use std::collections::HashMap;

/// Item metadata loaded from packs.
#[derive(Debug, Clone)]
pub struct ItemDef {
    /// Namespaced item code (e.g. `game:flaxfibers`).
    pub code: ItemCode,
    /// Maximum units a single stack of this item may hold.
    pub max_stack: u32,
    /// Spinning transformation metadata, if this item can be spun.
    pub spinning: Option<CraftAttrs>,
    /// Weaving transformation metadata, if this item can be woven.
    pub weaving: Option<CraftAttrs>,
}

impl ItemDef {
    /// Helper for tests/examples that need a plain, non-craftable item.
    pub fn simple(code: &str) -> Self {
        Self {
            code: ItemCode::parse(code),
            max_stack: DEFAULT_STACK_SIZE,
            spinning: None,
            weaving: None,
        }
    }
}

/// Registry storing item definitions keyed by id.
#[derive(Debug, Clone, Default)]
pub struct ItemRegistry {
    defs: Vec<ItemDef>,
    by_code: HashMap<ItemCode, ItemId>,
}

impl ItemRegistry {
    /// Build a registry from an ordered list of definitions.
    ///
    /// Ids are assigned in list order; duplicate codes keep the first entry.
    pub fn new(defs: Vec<ItemDef>) -> Self {
        let mut by_code = HashMap::with_capacity(defs.len());
        for (id, def) in defs.iter().enumerate() {
            by_code.entry(def.code.clone()).or_insert(id as ItemId);
        }
        Self { defs, by_code }
    }

    /// Look up an item id by its code.
    pub fn id_by_code(&self, code: &ItemCode) -> Option<ItemId> {
        self.by_code.get(code).copied()
    }

    /// Get the definition for an id.
    pub fn def(&self, id: ItemId) -> Option<&ItemDef> {
        self.defs.get(id as usize)
    }

    /// Get the code for an id.
    pub fn code(&self, id: ItemId) -> Option<&ItemCode> {
        self.def(id).map(|def| &def.code)
    }

    /// Maximum stack size for an id (default size for unknown ids).
    pub fn max_stack(&self, id: ItemId) -> u32 {
        self.def(id).map_or(DEFAULT_STACK_SIZE, |def| def.max_stack)
    }

    /// Iterate over all definitions with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (ItemId, &ItemDef)> {
        self.defs
            .iter()
            .enumerate()
            .map(|(id, def)| (id as ItemId, def))
    }

    /// Number of registered items.
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}
