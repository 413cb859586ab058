//! Session configuration.
//!
//! One JSON file controls use restrictions, competing-recipe disabling,
//! and the per-category craft overrides applied by the load-time patch
//! pass. Unknown or unreadable files fall back to defaults with a warning
//! so a bad config never blocks a session.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

/// Per-category spinning override.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpinOverride {
    /// Seconds per spin cycle.
    pub spin_time: f32,
    /// Units consumed per cycle.
    pub input_quantity: u32,
    /// Units produced per cycle.
    pub output_quantity: u32,
}

impl Default for SpinOverride {
    fn default() -> Self {
        Self {
            spin_time: 4.0,
            input_quantity: 2,
            output_quantity: 1,
        }
    }
}

/// Per-category weaving override. Cycle time is fixed by the loom
/// animation, so only the quantities are configurable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WeaveOverride {
    /// Units consumed per cycle.
    pub input_quantity: u32,
    /// Units produced per cycle.
    pub output_quantity: u32,
}

impl Default for WeaveOverride {
    fn default() -> Self {
        Self {
            input_quantity: 9,
            output_quantity: 3,
        }
    }
}

/// Session configuration for the fibercraft stations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FibercraftConfig {
    /// When set, players need an allowed class or trait to use a station.
    pub require_class_or_trait: bool,
    /// Character classes allowed through the restriction.
    pub allowed_classes: Vec<String>,
    /// Character traits allowed through the restriction.
    pub allowed_traits: Vec<String>,
    /// Disable the hand-crafting recipes the stations supersede.
    pub disable_twine_grid_recipes: bool,
    /// Flax fibers (base game).
    pub flax: SpinOverride,
    /// Cotton fibers (regional flora content).
    pub cotton: SpinOverride,
    /// Wool fibers.
    pub wool_fibers: SpinOverride,
    /// Wool twine re-spinning.
    pub wool_twine: SpinOverride,
    /// Papyrus fiber.
    pub papyrus: SpinOverride,
    /// Algae fiber.
    pub algae: SpinOverride,
    /// Flax twine weaving (base game linen).
    pub flax_twine_weave: WeaveOverride,
    /// Wool twine weaving.
    pub wool_twine_weave: WeaveOverride,
    /// Tailoring thread weaving.
    pub tailors_thread_weave: WeaveOverride,
}

impl Default for FibercraftConfig {
    fn default() -> Self {
        Self {
            require_class_or_trait: false,
            allowed_classes: Vec::new(),
            allowed_traits: vec!["clothier".to_string()],
            disable_twine_grid_recipes: true,
            flax: SpinOverride::default(),
            cotton: SpinOverride::default(),
            wool_fibers: SpinOverride::default(),
            wool_twine: SpinOverride {
                output_quantity: 2,
                ..SpinOverride::default()
            },
            papyrus: SpinOverride::default(),
            algae: SpinOverride {
                spin_time: 6.5,
                input_quantity: 1,
                output_quantity: 1,
            },
            flax_twine_weave: WeaveOverride::default(),
            wool_twine_weave: WeaveOverride::default(),
            tailors_thread_weave: WeaveOverride::default(),
        }
    }
}

impl FibercraftConfig {
    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<FibercraftConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    FibercraftConfig::default()
                }
            },
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                } else {
                    warn!("Config not found at {}. Using defaults", path.display());
                }
                FibercraftConfig::default()
            }
        }
    }

    /// Save configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, json)?;
        Ok(())
    }
}
