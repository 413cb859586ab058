//! Item identity and stacks.
//!
//! Items are authored under string codes (`domain:path`) and interned to
//! dense [`ItemId`]s when the registry is finalized. Stacks reference items
//! by id only.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Item identifier referencing the finalized item registry.
pub type ItemId = u16;

/// Maximum stack size used when an item does not declare its own.
pub const DEFAULT_STACK_SIZE: u32 = 64;

/// The domain assumed for bare item codes without a `domain:` prefix.
pub const DEFAULT_DOMAIN: &str = "game";

/// Namespaced item code, e.g. `game:flaxfibers` or `wool:fibers-white`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ItemCode {
    /// Content domain the item belongs to.
    pub domain: String,
    /// Item path within the domain.
    pub path: String,
}

impl ItemCode {
    /// Create a code from explicit domain and path.
    pub fn new(domain: &str, path: &str) -> Self {
        Self {
            domain: domain.to_string(),
            path: path.to_string(),
        }
    }

    /// Parse a `domain:path` string; a bare path defaults to the `game` domain.
    pub fn parse(s: &str) -> Self {
        match s.split_once(':') {
            Some((domain, path)) => Self::new(domain, path),
            None => Self::new(DEFAULT_DOMAIN, s),
        }
    }
}

impl fmt::Display for ItemCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.domain, self.path)
    }
}

impl From<String> for ItemCode {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<ItemCode> for String {
    fn from(code: ItemCode) -> Self {
        code.to_string()
    }
}

/// A stack of items held in a station slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// Item type identifier.
    pub item: ItemId,
    /// Number of items in this stack.
    pub count: u32,
}

impl ItemStack {
    /// Create a new item stack.
    pub fn new(item: ItemId, count: u32) -> Self {
        Self { item, count }
    }

    /// Check if this stack can merge with a stack of the given item.
    pub fn can_merge(&self, item: ItemId) -> bool {
        self.item == item
    }

    /// Remove up to `amount` items, returning the amount actually removed.
    pub fn remove(&mut self, amount: u32) -> u32 {
        let removed = amount.min(self.count);
        self.count -= removed;
        removed
    }
}
