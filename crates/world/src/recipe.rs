//! Recipe resolution against live station slots.
//!
//! Two strategies share one seam: quantity recipes pool identical items
//! across the regular input slots, pattern recipes match the 2x2 grid
//! positionally. Resolution is read-only; a successful resolve yields a
//! [`Batch`] which the station applies on cycle completion.

use fibercraft_core::{CraftParams, ItemRegistry, ItemStack, PatternRecipe, Process};
use std::sync::Arc;

/// Item slots belonging to one station instance.
#[derive(Debug, Clone, Default)]
pub struct StationSlots {
    /// Regular input slots, pooled by quantity recipes.
    pub inputs: Vec<Option<ItemStack>>,
    /// 2x2 pattern grid: top-left, top-right, bottom-left, bottom-right.
    pub pattern: [Option<ItemStack>; 4],
    /// Single output slot.
    pub output: Option<ItemStack>,
}

impl StationSlots {
    /// Create a slot set with `input_count` empty input slots.
    pub fn new(input_count: usize) -> Self {
        Self {
            inputs: vec![None; input_count],
            ..Self::default()
        }
    }

    /// Whether every input slot is empty.
    pub fn inputs_empty(&self) -> bool {
        self.inputs.iter().all(Option::is_none)
    }

    /// Total units across input slots holding `item`.
    pub fn input_total(&self, item: fibercraft_core::ItemId) -> u32 {
        self.inputs
            .iter()
            .flatten()
            .filter(|stack| stack.item == item)
            .map(|stack| stack.count)
            .sum()
    }
}

/// What one completed cycle consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Consumption {
    /// Take the given units from the given input slot indices.
    FromInputs(Vec<(usize, u32)>),
    /// Take this many units from every pattern slot.
    PerPatternSlot(u32),
}

/// A fully resolved cycle: what it consumes, yields, and how long it takes.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    /// Input consumption plan.
    pub consumed: Consumption,
    /// Stack produced into the output slot.
    pub output: ItemStack,
    /// Seconds of work for this cycle.
    pub duration: f32,
}

/// A recipe strategy resolving slot contents into a producible batch.
pub trait RecipeResolver {
    /// Resolve the current slots, or `None` when nothing can be produced.
    ///
    /// Returning `None` covers all failure causes alike: no matching
    /// recipe, insufficient input, or a full output slot.
    fn resolve(&self, slots: &StationSlots) -> Option<Batch>;
}

fn output_accepts(
    registry: &ItemRegistry,
    output: Option<&ItemStack>,
    produced: ItemStack,
) -> bool {
    match output {
        None => true,
        Some(held) => {
            held.item == produced.item
                && held.count + produced.count <= registry.max_stack(produced.item)
        }
    }
}

/// Quantity strategy: all occupied input slots pooled as one supply.
///
/// Mixed item types across the input slots never resolve; the pool must be
/// homogeneous before a cycle can start.
#[derive(Debug, Clone)]
pub struct QuantityResolver {
    registry: Arc<ItemRegistry>,
    params: Arc<CraftParams>,
    process: Process,
}

impl QuantityResolver {
    /// Create a resolver for one process over the shared parameter table.
    pub fn new(registry: Arc<ItemRegistry>, params: Arc<CraftParams>, process: Process) -> Self {
        Self {
            registry,
            params,
            process,
        }
    }

    /// Whether `item` participates in this resolver's process at all.
    pub fn accepts_item(&self, item: fibercraft_core::ItemId) -> bool {
        self.params.accepts(self.process, item)
    }
}

impl RecipeResolver for QuantityResolver {
    fn resolve(&self, slots: &StationSlots) -> Option<Batch> {
        let mut item = None;
        for stack in slots.inputs.iter().flatten() {
            match item {
                None => item = Some(stack.item),
                Some(seen) if seen == stack.item => {}
                Some(_) => return None,
            }
        }
        let item = item?;
        let params = self.params.get(self.process, item)?;
        if slots.input_total(item) < params.input_quantity {
            return None;
        }

        let produced = ItemStack::new(params.output, params.output_quantity);
        if !output_accepts(&self.registry, slots.output.as_ref(), produced) {
            return None;
        }

        // Consume in slot order until the cycle's input is covered.
        let mut remaining = params.input_quantity;
        let mut plan = Vec::new();
        for (idx, stack) in slots.inputs.iter().enumerate() {
            if remaining == 0 {
                break;
            }
            if let Some(stack) = stack {
                let take = stack.count.min(remaining);
                plan.push((idx, take));
                remaining -= take;
            }
        }

        Some(Batch {
            consumed: Consumption::FromInputs(plan),
            output: produced,
            duration: params.duration,
        })
    }
}

/// Pattern strategy: first table entry matching the 2x2 grid wins.
#[derive(Debug, Clone)]
pub struct PatternResolver {
    registry: Arc<ItemRegistry>,
    table: Arc<Vec<PatternRecipe>>,
    cycle_seconds: f32,
}

impl PatternResolver {
    /// Create a resolver over a loaded pattern-recipe table.
    pub fn new(registry: Arc<ItemRegistry>, table: Arc<Vec<PatternRecipe>>, cycle_seconds: f32) -> Self {
        Self {
            registry,
            table,
            cycle_seconds,
        }
    }

    /// Whether any recipe wants `item` in any pattern slot.
    pub fn accepts_item(&self, item: fibercraft_core::ItemId) -> bool {
        self.table
            .iter()
            .any(|recipe| recipe.slots.contains(&item))
    }
}

impl RecipeResolver for PatternResolver {
    fn resolve(&self, slots: &StationSlots) -> Option<Batch> {
        let recipe = self
            .table
            .iter()
            .find(|r| r.matches(&slots.pattern) && r.has_sufficient_input(&slots.pattern))?;

        let produced = ItemStack::new(recipe.output, recipe.output_quantity);
        if !output_accepts(&self.registry, slots.output.as_ref(), produced) {
            return None;
        }

        Some(Batch {
            consumed: Consumption::PerPatternSlot(recipe.quantity_per_slot),
            output: produced,
            duration: self.cycle_seconds,
        })
    }
}

/// Apply a resolved batch to the slots: deduct inputs, merge the output.
pub fn apply_batch(slots: &mut StationSlots, batch: &Batch) {
    match &batch.consumed {
        Consumption::FromInputs(plan) => {
            for (idx, take) in plan {
                if let Some(stack) = slots.inputs[*idx].as_mut() {
                    stack.remove(*take);
                    if stack.count == 0 {
                        slots.inputs[*idx] = None;
                    }
                }
            }
        }
        Consumption::PerPatternSlot(per_slot) => {
            for slot in slots.pattern.iter_mut() {
                if let Some(stack) = slot.as_mut() {
                    stack.remove(*per_slot);
                    if stack.count == 0 {
                        *slot = None;
                    }
                }
            }
        }
    }

    match slots.output.as_mut() {
        Some(held) => held.count += batch.output.count,
        None => slots.output = Some(batch.output),
    }
}
