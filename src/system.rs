//! Session load orchestration.
//!
//! The load order is a hard precondition: config first, then the item
//! registry, then pattern recipes (they resolve against the registry),
//! then the override pass that produces the craft-parameter table.
//! [`SessionAssets`] owns the results and hands stations their shared
//! tables, so the ordering is encoded in the type flow rather than
//! enforced at runtime.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

use fibercraft_assets::{
    build_craft_params, disable_competing_recipes, items_from_file, pattern_recipes_from_file,
    FibercraftConfig, GridRecipe,
};
use fibercraft_core::{CraftParams, ItemRegistry, PatternRecipe, WEAVE_CYCLE_SECONDS};
use fibercraft_world::{
    BlockPos, Facing, PatternResolver, QuantityResolver, Station, StationSpec, UseRestriction,
};
use tracing::info;

/// File locations for one session load.
#[derive(Debug, Clone)]
pub struct SessionPaths {
    /// Session config JSON; created with defaults on first run.
    pub config: PathBuf,
    /// Item pack JSON.
    pub items: PathBuf,
    /// Pattern recipe JSON; `None` disables pattern weaving entirely.
    pub pattern_recipes: Option<PathBuf>,
}

/// Finalized session state shared by every station.
#[derive(Debug, Clone)]
pub struct SessionAssets {
    config: FibercraftConfig,
    registry: Arc<ItemRegistry>,
    params: Arc<CraftParams>,
    patterns: Arc<Vec<PatternRecipe>>,
}

impl SessionAssets {
    /// Run the ordered load: config, items, pattern recipes, override pass.
    pub fn load(paths: &SessionPaths) -> Result<Self> {
        if !paths.config.exists() {
            FibercraftConfig::default()
                .save_to_path(&paths.config)
                .with_context(|| {
                    format!("writing default config to {}", paths.config.display())
                })?;
            info!("wrote default config to {}", paths.config.display());
        }
        let config = FibercraftConfig::load_from_path(&paths.config);

        let registry = items_from_file(&paths.items)
            .with_context(|| format!("loading item pack {}", paths.items.display()))?;

        let patterns = match &paths.pattern_recipes {
            Some(path) => pattern_recipes_from_file(path, &registry)
                .with_context(|| format!("loading pattern recipes {}", path.display()))?,
            None => Vec::new(),
        };

        let params = build_craft_params(&registry, &config);
        info!(
            items = registry.len(),
            patterns = patterns.len(),
            "session assets loaded"
        );

        Ok(Self {
            config,
            registry: Arc::new(registry),
            params: Arc::new(params),
            patterns: Arc::new(patterns),
        })
    }

    /// Session configuration as loaded.
    pub fn config(&self) -> &FibercraftConfig {
        &self.config
    }

    /// Finalized item registry.
    pub fn registry(&self) -> &Arc<ItemRegistry> {
        &self.registry
    }

    /// Craft-parameter table with config overrides applied.
    pub fn params(&self) -> &Arc<CraftParams> {
        &self.params
    }

    /// Loaded pattern-recipe table.
    pub fn patterns(&self) -> &Arc<Vec<PatternRecipe>> {
        &self.patterns
    }

    /// The class/trait gate configured for this session.
    pub fn use_restriction(&self) -> UseRestriction {
        UseRestriction {
            enabled: self.config.require_class_or_trait,
            allowed_classes: self.config.allowed_classes.clone(),
            allowed_traits: self.config.allowed_traits.clone(),
        }
    }

    /// Flag the competing hand-crafting recipes in a host recipe table.
    pub fn apply_to_grid_recipes(&self, recipes: &mut [GridRecipe]) -> usize {
        disable_competing_recipes(recipes, &self.config)
    }

    /// Place a spinning wheel.
    pub fn spinning_wheel_at(&self, pos: BlockPos, facing: Facing) -> Station {
        let spec = StationSpec::spinning_wheel();
        let quantity = QuantityResolver::new(
            self.registry.clone(),
            self.params.clone(),
            spec.kind.process(),
        );
        Station::new(spec, pos, facing, quantity, None)
    }

    /// Place a fly-shuttle loom.
    ///
    /// Pattern mode is available only when pattern recipes were loaded.
    pub fn loom_at(&self, pos: BlockPos, facing: Facing) -> Station {
        let spec = StationSpec::fly_shuttle_loom();
        let quantity = QuantityResolver::new(
            self.registry.clone(),
            self.params.clone(),
            spec.kind.process(),
        );
        let pattern = (!self.patterns.is_empty()).then(|| {
            PatternResolver::new(
                self.registry.clone(),
                self.patterns.clone(),
                WEAVE_CYCLE_SECONDS,
            )
        });
        Station::new(spec, pos, facing, quantity, pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(format!("fibercraft-{}-{}", std::process::id(), name))
    }

    const ITEMS: &str = r#"[
        {
            "code": "game:flaxfibers",
            "spinningProps": { "inputQuantity": 2, "output": "game:flaxtwine" }
        },
        { "code": "game:flaxtwine" }
    ]"#;

    #[test]
    fn first_run_writes_a_default_config_file() {
        let config = temp_path("first-run.json");
        let items = temp_path("items.json");
        fs::write(&items, ITEMS).unwrap();

        let paths = SessionPaths {
            config: config.clone(),
            items: items.clone(),
            pattern_recipes: None,
        };
        let assets = SessionAssets::load(&paths).unwrap();

        assert!(config.exists());
        assert_eq!(assets.config(), &FibercraftConfig::default());
        assert_eq!(assets.registry().len(), 2);

        fs::remove_file(&config).ok();
        fs::remove_file(&items).ok();
    }

    #[test]
    fn missing_item_pack_is_an_error() {
        let config = temp_path("no-items.json");
        let paths = SessionPaths {
            config: config.clone(),
            items: PathBuf::from("/definitely/not/here/items.json"),
            pattern_recipes: None,
        };
        assert!(SessionAssets::load(&paths).is_err());
        fs::remove_file(&config).ok();
    }

    #[test]
    fn restriction_mirrors_the_config() {
        let config = temp_path("restrict.json");
        let items = temp_path("restrict-items.json");
        fs::write(&items, ITEMS).unwrap();
        fs::write(
            &config,
            r#"{ "requireClassOrTrait": true, "allowedClasses": ["clockmaker"] }"#,
        )
        .unwrap();

        let assets = SessionAssets::load(&SessionPaths {
            config: config.clone(),
            items: items.clone(),
            pattern_recipes: None,
        })
        .unwrap();

        let gate = assets.use_restriction();
        assert!(gate.enabled);
        assert!(gate.permits("clockmaker", &[]));
        assert!(gate.permits("commoner", &["clothier"]));
        assert!(!gate.permits("commoner", &[]));

        fs::remove_file(&config).ok();
        fs::remove_file(&items).ok();
    }

    #[test]
    fn loom_without_pattern_recipes_refuses_pattern_mode() {
        let config = temp_path("no-patterns.json");
        let items = temp_path("no-patterns-items.json");
        fs::write(&items, ITEMS).unwrap();

        let assets = SessionAssets::load(&SessionPaths {
            config: config.clone(),
            items: items.clone(),
            pattern_recipes: None,
        })
        .unwrap();

        let mut loom = assets.loom_at(BlockPos::new(0, 0, 0), Facing::South);
        assert!(!loom.request_mode(fibercraft_world::StationMode::Pattern));

        fs::remove_file(&config).ok();
        fs::remove_file(&items).ok();
    }
}
