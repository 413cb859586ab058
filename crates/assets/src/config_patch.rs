//! Load-time config override pass.
//!
//! Runs once after the item registry is finalized: walks every item
//! carrying craft attributes, applies the matching per-category config
//! override, and produces the immutable [`CraftParams`] table the recipe
//! resolvers read for the rest of the session. The pass is pure, so
//! re-running it with the same inputs yields the same table.

use crate::config::{FibercraftConfig, SpinOverride, WeaveOverride};
use fibercraft_core::{
    CraftAttrs, CraftParams, ItemCode, ItemRegistry, Process, QuantityParams, DEFAULT_SPIN_SECONDS,
    WEAVE_CYCLE_SECONDS,
};
use tracing::{debug, info, warn};

fn spin_override<'a>(code: &ItemCode, config: &'a FibercraftConfig) -> Option<&'a SpinOverride> {
    let (domain, path) = (code.domain.as_str(), code.path.as_str());
    match domain {
        "game" if path == "flaxfibers" => Some(&config.flax),
        "floralzonescaribbeanregion" if path.starts_with("cotton-") && path.contains("-fiber") => {
            Some(&config.cotton)
        }
        "wool" if path.starts_with("twine-wool-") => Some(&config.wool_twine),
        "wool" if path.starts_with("fibers-") => Some(&config.wool_fibers),
        "pemmican" if path == "papyrus-fiber" => Some(&config.papyrus),
        "pemmican" if path == "algae-chem" => Some(&config.algae),
        _ => None,
    }
}

fn weave_override<'a>(code: &ItemCode, config: &'a FibercraftConfig) -> Option<&'a WeaveOverride> {
    let (domain, path) = (code.domain.as_str(), code.path.as_str());
    match domain {
        "game" if path == "flaxtwine" => Some(&config.flax_twine_weave),
        "wool" if path.starts_with("twine-wool-") => Some(&config.wool_twine_weave),
        "tailorsdelight" if path.starts_with("twine-") => Some(&config.tailors_thread_weave),
        _ => None,
    }
}

fn finalize(
    registry: &ItemRegistry,
    owner: &ItemCode,
    attrs: &CraftAttrs,
    default_duration: f32,
) -> Option<QuantityParams> {
    let Some(output) = registry.id_by_code(&attrs.output) else {
        warn!(
            item = %owner,
            output = %attrs.output,
            "craft output not registered, skipping"
        );
        return None;
    };
    Some(QuantityParams {
        duration: attrs.duration.unwrap_or(default_duration),
        input_quantity: attrs.input_quantity,
        output,
        output_quantity: attrs.output_quantity,
    })
}

/// Build the session craft-parameter table from authored attributes plus
/// config overrides.
///
/// Items without a matching config category keep their authored values.
pub fn build_craft_params(registry: &ItemRegistry, config: &FibercraftConfig) -> CraftParams {
    let mut params = CraftParams::new();
    let mut spin_patched = 0usize;
    let mut weave_patched = 0usize;

    for (id, def) in registry.iter() {
        if let Some(attrs) = &def.spinning {
            if let Some(mut entry) = finalize(registry, &def.code, attrs, DEFAULT_SPIN_SECONDS) {
                if let Some(over) = spin_override(&def.code, config) {
                    entry.duration = over.spin_time;
                    entry.input_quantity = over.input_quantity;
                    entry.output_quantity = over.output_quantity;
                    spin_patched += 1;
                    debug!(item = %def.code, "applied spinning override");
                }
                params.insert(Process::Spinning, id, entry);
            }
        }
        if let Some(attrs) = &def.weaving {
            if let Some(mut entry) = finalize(registry, &def.code, attrs, WEAVE_CYCLE_SECONDS) {
                if let Some(over) = weave_override(&def.code, config) {
                    entry.input_quantity = over.input_quantity;
                    entry.output_quantity = over.output_quantity;
                    weave_patched += 1;
                    debug!(item = %def.code, "applied weaving override");
                }
                params.insert(Process::Weaving, id, entry);
            }
        }
    }

    info!(
        spinnable = params.len(Process::Spinning),
        weavable = params.len(Process::Weaving),
        spin_patched,
        weave_patched,
        "craft parameter table built"
    );
    if spin_patched == 0 && !params.is_empty(Process::Spinning) {
        debug!("no spinnable items matched a config category");
    }
    params
}

/// One entry of the host's grid-recipe table, as much of it as the
/// disabling pass needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRecipe {
    /// Recipe identifier; the path carries the source file location.
    pub name: ItemCode,
    /// Code of the item the recipe produces.
    pub output: ItemCode,
    /// Whether the recipe can be crafted.
    pub enabled: bool,
    /// Whether the recipe is listed in handbook credits.
    pub show_in_created_by: bool,
}

fn is_competing(recipe: &GridRecipe) -> bool {
    let out = &recipe.output;
    let name = &recipe.name;
    let flaxtwine = out.domain == "game" && out.path == "flaxtwine";
    match name.domain.as_str() {
        "game" => flaxtwine,
        "wool" => {
            out.domain == "wool"
                && out.path.starts_with("twine-")
                && name.path.contains("recipes/grid/twine")
        }
        "floralzonescaribbeanregion" => flaxtwine && name.path.contains("recipes/grid/twine"),
        "pemmican" => flaxtwine && (name.path.contains("papyrus") || name.path.contains("algae")),
        _ => false,
    }
}

/// Disable (never remove) the hand-crafting recipes the stations replace.
///
/// Returns the number of recipes flagged. A no-op when the config leaves
/// the recipes enabled, or when none of the providing content is present.
pub fn disable_competing_recipes(recipes: &mut [GridRecipe], config: &FibercraftConfig) -> usize {
    if !config.disable_twine_grid_recipes {
        return 0;
    }
    if recipes.is_empty() {
        debug!("grid recipe table empty, nothing to disable");
        return 0;
    }

    let mut disabled = 0;
    for recipe in recipes.iter_mut() {
        if is_competing(recipe) {
            recipe.enabled = false;
            recipe.show_in_created_by = false;
            disabled += 1;
            debug!(recipe = %recipe.name, "disabled competing recipe");
        }
    }

    if disabled > 0 {
        info!(disabled, "disabled competing grid recipes");
    } else {
        debug!("no competing grid recipes found");
    }
    disabled
}
