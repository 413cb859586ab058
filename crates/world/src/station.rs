//! Station state machine: occupancy, tick-driven progress, mode switching.
//!
//! One [`Station`] type drives every station family; the differences
//! between the spinning wheel and the fly-shuttle loom live entirely in
//! the [`StationSpec`] variant descriptor (idle policy, cycle fallback,
//! pattern capability, cell layout).

use crate::geometry::{
    Aabb, BlockPos, CellOffset, CellSpec, Facing, Interaction, MultiblockLayout,
};
use crate::occupancy::{
    dismount_position, resolve_persisted, CollisionProbe, EntityDirectory, MountOutcome,
    OccupancyController, OccupantId,
};
use crate::persist::AttrTree;
use crate::recipe::{apply_batch, PatternResolver, QuantityResolver, RecipeResolver, StationSlots};
use fibercraft_core::{ItemId, ItemStack, Process, DEFAULT_SPIN_SECONDS, WEAVE_CYCLE_SECONDS};
use tracing::{debug, warn};

/// The station families this crate models.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationKind {
    /// Single-seat wheel spinning fibers into thread.
    SpinningWheel,
    /// Benched loom weaving thread into cloth.
    Loom,
}

impl StationKind {
    /// The transformation process this family drives.
    pub fn process(self) -> Process {
        match self {
            Self::SpinningWheel => Process::Spinning,
            Self::Loom => Process::Weaving,
        }
    }
}

/// What happens to accumulated progress while the station sits idle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IdlePolicy {
    /// Progress bleeds off at `rate` seconds of progress per idle second.
    Decay {
        /// Progress lost per second of idle time.
        rate: f32,
    },
    /// Progress snaps to zero the moment work stops.
    Reset,
}

/// Which recipe strategy the station is currently running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StationMode {
    /// Pooled quantity recipes over the regular input slots.
    #[default]
    Normal,
    /// Positional 2x2 pattern recipes.
    Pattern,
}

impl StationMode {
    /// Decode a persisted mode value; unknown values read as Normal.
    pub fn from_i32(value: i32) -> Self {
        match value {
            1 => Self::Pattern,
            _ => Self::Normal,
        }
    }

    /// Persisted encoding.
    pub fn as_i32(self) -> i32 {
        match self {
            Self::Normal => 0,
            Self::Pattern => 1,
        }
    }
}

/// Immutable per-family descriptor a [`Station`] is instantiated from.
#[derive(Debug, Clone)]
pub struct StationSpec {
    /// Which family this is.
    pub kind: StationKind,
    /// Idle progress handling.
    pub idle_policy: IdlePolicy,
    /// Cycle seconds used when no recipe supplies one.
    pub fallback_duration: f32,
    /// Whether the pattern mode can be engaged at all.
    pub pattern_capable: bool,
    /// Number of regular input slots.
    pub input_slots: usize,
    /// Canonical cell layout.
    pub layout: MultiblockLayout,
}

impl StationSpec {
    /// The spinning wheel: one seat on the control cell, slow idle decay.
    pub fn spinning_wheel() -> Self {
        let mut layout = MultiblockLayout::new();
        layout.insert_cell(
            CellOffset::new(0, 0, 0),
            CellSpec::with_seat(
                vec![
                    Aabb::full_cell(),
                    Aabb::new(0.0, 0.0, 0.0, 1.0, 0.5, 1.0),
                ],
                1,
            ),
        );
        layout.insert_cell(
            CellOffset::new(0, 1, 0),
            CellSpec::interface(vec![Aabb::full_cell()]),
        );
        Self {
            kind: StationKind::SpinningWheel,
            idle_policy: IdlePolicy::Decay { rate: 0.5 },
            fallback_duration: DEFAULT_SPIN_SECONDS,
            pattern_capable: false,
            input_slots: 4,
            layout,
        }
    }

    /// The fly-shuttle loom: 3-wide frame with a bench row, instant reset.
    ///
    /// Bench cells sit one step toward the weaver (canonical -Z); box
    /// index 1 on a bench cell is the seat surface.
    pub fn fly_shuttle_loom() -> Self {
        let mut layout = MultiblockLayout::new();
        for x in -1..=1 {
            for y in 0..=1 {
                layout.insert_cell(
                    CellOffset::new(x, y, 0),
                    CellSpec::interface(vec![Aabb::full_cell()]),
                );
            }
            layout.insert_cell(
                CellOffset::new(x, 0, -1),
                CellSpec::with_seat(
                    vec![
                        Aabb::full_cell(),
                        Aabb::new(0.0, 0.0, 0.0, 1.0, 0.5, 1.0),
                    ],
                    1,
                ),
            );
        }
        Self {
            kind: StationKind::Loom,
            idle_policy: IdlePolicy::Reset,
            fallback_duration: WEAVE_CYCLE_SECONDS,
            pattern_capable: true,
            input_slots: 4,
            layout,
        }
    }
}

/// Class/trait gate applied before seating a player.
#[derive(Debug, Clone, Default)]
pub struct UseRestriction {
    /// Whether the gate is active at all.
    pub enabled: bool,
    /// Character classes allowed through.
    pub allowed_classes: Vec<String>,
    /// Character traits allowed through.
    pub allowed_traits: Vec<String>,
}

impl UseRestriction {
    /// Whether a player with this class and trait set may use the station.
    pub fn permits(&self, class: &str, traits: &[&str]) -> bool {
        if !self.enabled {
            return true;
        }
        self.allowed_classes.iter().any(|c| c == class)
            || traits
                .iter()
                .any(|t| self.allowed_traits.iter().any(|a| a == t))
    }
}

/// State transitions observed during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// The station started working this tick.
    pub activated: bool,
    /// The station stopped working this tick.
    pub deactivated: bool,
    /// A cycle completed and its batch was applied this tick.
    pub completed: bool,
}

impl TickReport {
    /// Whether anything observable changed.
    pub fn changed(&self) -> bool {
        self.activated || self.deactivated || self.completed
    }
}

/// Read-only progress snapshot for interface rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressView {
    /// Accumulated work seconds.
    pub progress_time: f32,
    /// Seconds required for the current cycle (0 when no cycle is set).
    pub required_duration: f32,
    /// Current recipe mode.
    pub mode: StationMode,
    /// Whether work is running right now.
    pub active: bool,
}

/// A placed station instance.
#[derive(Debug)]
pub struct Station {
    spec: StationSpec,
    pos: BlockPos,
    facing: Facing,
    occupancy: OccupancyController,
    /// Live slot contents; hosts mutate these through the accessors below.
    pub slots: StationSlots,
    progress_time: f32,
    required_duration: f32,
    active: bool,
    mode: StationMode,
    pending_mode: Option<StationMode>,
    quantity: QuantityResolver,
    pattern: Option<PatternResolver>,
}

impl Station {
    /// Instantiate a station at a world position.
    ///
    /// A pattern resolver handed to a family that is not pattern capable
    /// is dropped with a warning.
    pub fn new(
        spec: StationSpec,
        pos: BlockPos,
        facing: Facing,
        quantity: QuantityResolver,
        pattern: Option<PatternResolver>,
    ) -> Self {
        let pattern = if spec.pattern_capable {
            pattern
        } else {
            if pattern.is_some() {
                warn!(kind = ?spec.kind, "pattern resolver ignored for non-pattern station");
            }
            None
        };
        let slots = StationSlots::new(spec.input_slots);
        Self {
            spec,
            pos,
            facing,
            occupancy: OccupancyController::new(),
            slots,
            progress_time: 0.0,
            required_duration: 0.0,
            active: false,
            mode: StationMode::Normal,
            pending_mode: None,
            quantity,
            pattern,
        }
    }

    /// World position of the control cell.
    pub fn pos(&self) -> BlockPos {
        self.pos
    }

    /// Placement orientation.
    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Family descriptor.
    pub fn spec(&self) -> &StationSpec {
        &self.spec
    }

    /// Current occupant identity.
    pub fn occupant(&self) -> Option<&OccupantId> {
        self.occupancy.occupant()
    }

    /// Current recipe mode.
    pub fn mode(&self) -> StationMode {
        self.mode
    }

    fn resolver(&self) -> &dyn RecipeResolver {
        match (self.mode, self.pattern.as_ref()) {
            (StationMode::Pattern, Some(pattern)) => pattern,
            _ => &self.quantity,
        }
    }

    /// Route an interaction at a raw world-space offset of this station.
    pub fn route_interaction(&self, raw: CellOffset, box_index: usize) -> Interaction {
        self.spec.layout.route_interaction(raw, self.facing, box_index)
    }

    /// Attempt to seat an actor.
    pub fn try_mount(&mut self, who: OccupantId) -> MountOutcome {
        let outcome = self.occupancy.mount(who);
        if outcome == MountOutcome::Mounted {
            debug!(pos = ?self.pos, "occupant seated");
        }
        outcome
    }

    /// Release the seat held by `entity_id`.
    ///
    /// Under the reset idle policy, progress is dropped immediately rather
    /// than waiting for the next tick. When a collision probe is supplied,
    /// a clear standing position near the seat is returned.
    pub fn unmount(
        &mut self,
        entity_id: i64,
        probe: Option<&dyn CollisionProbe>,
    ) -> Option<[f64; 3]> {
        if !self.occupancy.unmount(entity_id) {
            return None;
        }
        if let IdlePolicy::Reset = self.spec.idle_policy {
            self.progress_time = 0.0;
            self.required_duration = 0.0;
            self.active = false;
        }
        probe.and_then(|probe| {
            dismount_position(
                [self.pos.x, self.pos.y, self.pos.z],
                self.facing,
                &Aabb::full_cell(),
                probe,
            )
        })
    }

    /// Evict whoever is seated, e.g. when the station block is broken.
    pub fn evict(&mut self) -> Option<OccupantId> {
        let evicted = self.occupancy.clear();
        if evicted.is_some() {
            self.progress_time = 0.0;
            self.required_duration = 0.0;
            self.active = false;
        }
        evicted
    }

    /// Request a recipe-mode switch; applied at the start of the next tick.
    ///
    /// Returns `false` when the station cannot run the requested mode.
    pub fn request_mode(&mut self, mode: StationMode) -> bool {
        if mode == StationMode::Pattern && self.pattern.is_none() {
            return false;
        }
        self.pending_mode = Some(mode);
        true
    }

    /// Whether the station's current mode would accept this item as input.
    pub fn accepts_input(&self, item: ItemId) -> bool {
        match (self.mode, self.pattern.as_ref()) {
            (StationMode::Pattern, Some(pattern)) => pattern.accepts_item(item),
            _ => self.quantity.accepts_item(item),
        }
    }

    /// Take the output stack, leaving the slot empty.
    pub fn take_output(&mut self) -> Option<ItemStack> {
        let taken = self.slots.output.take();
        if taken.is_some() {
            self.on_slots_changed();
        }
        taken
    }

    /// Notify the station that a host mutated its slots directly.
    ///
    /// Progress is cleared when the current mode's inputs have emptied;
    /// the required duration tracks whatever now resolves.
    pub fn on_slots_changed(&mut self) {
        let emptied = match self.mode {
            StationMode::Normal => self.slots.inputs_empty(),
            StationMode::Pattern => self.slots.pattern.iter().all(Option::is_none),
        };
        if emptied {
            self.progress_time = 0.0;
            self.required_duration = 0.0;
        }
        match self.resolver().resolve(&self.slots) {
            Some(batch) => self.required_duration = batch.duration,
            None => self.active = false,
        }
    }

    /// Advance the station by `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> TickReport {
        let mut report = TickReport::default();

        if let Some(next) = self.pending_mode.take() {
            if next != self.mode {
                self.mode = next;
                self.progress_time = 0.0;
                self.required_duration = 0.0;
                if self.active {
                    self.active = false;
                    report.deactivated = true;
                }
            }
        }

        let resolved = if self.occupancy.is_occupied() {
            self.resolver().resolve(&self.slots)
        } else {
            None
        };

        match resolved {
            Some(batch) => {
                if !self.active {
                    self.active = true;
                    report.activated = true;
                }
                // Duration tracks the live recipe, so mid-cycle slot edits
                // retarget the bar instead of stalling it.
                self.required_duration = batch.duration;
                self.progress_time += dt;

                if self.progress_time >= self.required_duration {
                    apply_batch(&mut self.slots, &batch);
                    report.completed = true;
                    self.progress_time = 0.0;
                    debug!(pos = ?self.pos, kind = ?self.spec.kind, "cycle completed");

                    if self.resolver().resolve(&self.slots).is_none() {
                        self.active = false;
                        self.required_duration = 0.0;
                        report.deactivated = true;
                    }
                }
            }
            None => {
                if self.active {
                    self.active = false;
                    report.deactivated = true;
                }
                match self.spec.idle_policy {
                    IdlePolicy::Decay { rate } => {
                        self.progress_time = (self.progress_time - rate * dt).max(0.0);
                    }
                    IdlePolicy::Reset => {
                        self.progress_time = 0.0;
                        self.required_duration = 0.0;
                    }
                }
            }
        }

        report
    }

    /// Progress snapshot for interface rendering.
    pub fn progress_view(&self) -> ProgressView {
        ProgressView {
            progress_time: self.progress_time,
            required_duration: self.required_duration,
            mode: self.mode,
            active: self.active,
        }
    }

    /// Whether this station's state is worth broadcasting to watchers.
    pub fn should_broadcast(&self) -> bool {
        self.occupancy.is_occupied() || self.progress_time > 0.0
    }

    /// Serialize dynamic state into an attribute tree.
    pub fn to_tree(&self) -> AttrTree {
        let mut tree = AttrTree::new();
        tree.set_str("facing", self.facing.code());
        tree.set_f32("progressTime", self.progress_time);
        tree.set_f32("requiredDuration", self.required_duration);
        tree.set_bool("active", self.active);
        tree.set_i32("mode", self.mode.as_i32());
        let (entity_id, owner) = match self.occupancy.occupant() {
            Some(occupant) => (occupant.entity_id, occupant.owner.as_deref().unwrap_or("")),
            None => (0, ""),
        };
        tree.set_i64("occupantEntityId", entity_id);
        tree.set_str("occupantIdentity", owner);
        tree
    }

    /// Restore dynamic state from an attribute tree.
    ///
    /// A persisted occupant is resolved through the directory and reseated
    /// via the normal mount transition; an unresolvable occupant leaves
    /// the seat empty.
    pub fn from_tree(
        spec: StationSpec,
        pos: BlockPos,
        quantity: QuantityResolver,
        pattern: Option<PatternResolver>,
        tree: &AttrTree,
        directory: &dyn EntityDirectory,
    ) -> Self {
        let facing = Facing::from_code_or_north(tree.get_str("facing").unwrap_or("north"));
        let mut station = Self::new(spec, pos, facing, quantity, pattern);
        station.progress_time = tree.get_f32("progressTime").max(0.0);
        station.required_duration = tree.get_f32("requiredDuration").max(0.0);
        station.active = tree.get_bool("active");
        station.mode = StationMode::from_i32(tree.get_i32("mode"));

        let owner = tree
            .get_str("occupantIdentity")
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let entity_id = tree.get_i64("occupantEntityId");
        if let Some(who) = resolve_persisted(entity_id, owner.as_deref(), directory) {
            if station.try_mount(who) != MountOutcome::Mounted {
                warn!(pos = ?pos, "persisted occupant could not be reseated");
            }
        } else if entity_id != 0 || owner.is_some() {
            debug!(pos = ?pos, entity_id, "persisted occupant no longer resolvable");
        }
        station
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fibercraft_core::{CraftParams, ItemCode, ItemDef, ItemRegistry, PatternRecipe, QuantityParams};
    use std::collections::HashMap;
    use std::sync::Arc;

    const FIBERS: ItemId = 0;
    const TWINE: ItemId = 1;
    const CLOTH: ItemId = 2;

    fn registry() -> Arc<ItemRegistry> {
        Arc::new(ItemRegistry::new(vec![
            ItemDef::simple("game:flaxfibers"),
            ItemDef::simple("game:flaxtwine"),
            ItemDef::simple("game:linen-normal-down"),
        ]))
    }

    fn spin_params() -> Arc<CraftParams> {
        let mut params = CraftParams::new();
        params.insert(
            Process::Spinning,
            FIBERS,
            QuantityParams {
                duration: 4.0,
                input_quantity: 2,
                output: TWINE,
                output_quantity: 1,
            },
        );
        Arc::new(params)
    }

    fn weave_params() -> Arc<CraftParams> {
        let mut params = CraftParams::new();
        params.insert(
            Process::Weaving,
            TWINE,
            QuantityParams {
                duration: WEAVE_CYCLE_SECONDS,
                input_quantity: 4,
                output: CLOTH,
                output_quantity: 1,
            },
        );
        Arc::new(params)
    }

    fn wheel() -> Station {
        let quantity = QuantityResolver::new(registry(), spin_params(), Process::Spinning);
        Station::new(
            StationSpec::spinning_wheel(),
            BlockPos::new(0, 4, 0),
            Facing::North,
            quantity,
            None,
        )
    }

    fn loom() -> Station {
        let quantity = QuantityResolver::new(registry(), weave_params(), Process::Weaving);
        let table = Arc::new(vec![PatternRecipe {
            code: ItemCode::parse("fibercraft:plain"),
            slots: [TWINE, TWINE, TWINE, TWINE],
            quantity_per_slot: 2,
            output: CLOTH,
            output_quantity: 1,
        }]);
        let pattern = PatternResolver::new(registry(), table, WEAVE_CYCLE_SECONDS);
        Station::new(
            StationSpec::fly_shuttle_loom(),
            BlockPos::new(0, 4, 0),
            Facing::North,
            quantity,
            Some(pattern),
        )
    }

    #[test]
    fn idle_until_both_occupant_and_input_present() {
        let mut station = wheel();
        assert!(!station.tick(1.0).changed());

        station.slots.inputs[0] = Some(ItemStack::new(FIBERS, 4));
        station.on_slots_changed();
        assert!(!station.tick(1.0).changed());
        assert_eq!(station.progress_view().progress_time, 0.0);

        station.try_mount(OccupantId::player(7, "ada"));
        let report = station.tick(1.0);
        assert!(report.activated);
        assert!(station.progress_view().active);
    }

    #[test]
    fn completed_cycle_consumes_input_and_emits_output() {
        let mut station = wheel();
        station.slots.inputs[0] = Some(ItemStack::new(FIBERS, 4));
        station.try_mount(OccupantId::player(7, "ada"));

        station.tick(2.0);
        station.tick(1.9);
        assert_eq!(station.slots.output, None);

        let report = station.tick(0.2);
        assert!(report.completed);
        assert_eq!(station.slots.inputs[0], Some(ItemStack::new(FIBERS, 2)));
        assert_eq!(station.slots.output, Some(ItemStack::new(TWINE, 1)));
        assert_eq!(station.progress_view().progress_time, 0.0);
        // Two fibers left, so the next cycle keeps running.
        assert!(!report.deactivated);
    }

    #[test]
    fn exhausting_input_deactivates_on_completion_tick() {
        let mut station = wheel();
        station.slots.inputs[0] = Some(ItemStack::new(FIBERS, 2));
        station.try_mount(OccupantId::player(7, "ada"));

        let report = station.tick(4.5);
        assert!(report.completed);
        assert!(report.deactivated);
        assert!(station.slots.inputs_empty());
    }

    #[test]
    fn wheel_progress_decays_while_unoccupied() {
        let mut station = wheel();
        station.slots.inputs[0] = Some(ItemStack::new(FIBERS, 4));
        station.try_mount(OccupantId::player(7, "ada"));
        station.tick(2.0);

        station.unmount(7, None);
        let report = station.tick(1.0);
        assert!(report.deactivated);
        assert_eq!(station.progress_view().progress_time, 1.5);

        // Decay clamps at zero.
        station.tick(100.0);
        assert_eq!(station.progress_view().progress_time, 0.0);
    }

    #[test]
    fn loom_progress_resets_on_unmount() {
        let mut station = loom();
        station.slots.inputs[0] = Some(ItemStack::new(TWINE, 8));
        station.try_mount(OccupantId::player(7, "ada"));
        station.tick(3.0);
        assert!(station.progress_view().progress_time > 0.0);

        station.unmount(7, None);
        assert_eq!(station.progress_view().progress_time, 0.0);
        assert!(!station.progress_view().active);
    }

    #[test]
    fn mode_switch_applies_on_next_tick_and_clears_progress() {
        let mut station = loom();
        station.slots.inputs[0] = Some(ItemStack::new(TWINE, 8));
        station.try_mount(OccupantId::player(7, "ada"));
        station.tick(3.0);

        assert!(station.request_mode(StationMode::Pattern));
        assert_eq!(station.mode(), StationMode::Normal);

        station.slots.pattern = [Some(ItemStack::new(TWINE, 2)); 4];
        let report = station.tick(1.0);
        assert_eq!(station.mode(), StationMode::Pattern);
        // Progress restarted for the new mode: one tick of work only.
        assert_eq!(station.progress_view().progress_time, 1.0);
        assert!(report.activated);
    }

    #[test]
    fn pattern_mode_refused_without_pattern_support() {
        let mut station = wheel();
        assert!(!station.request_mode(StationMode::Pattern));
        station.tick(1.0);
        assert_eq!(station.mode(), StationMode::Normal);
    }

    #[test]
    fn input_gating_follows_mode() {
        let mut station = loom();
        assert!(station.accepts_input(TWINE));
        assert!(!station.accepts_input(FIBERS));

        station.request_mode(StationMode::Pattern);
        station.tick(0.0);
        assert!(station.accepts_input(TWINE));
        assert!(!station.accepts_input(CLOTH));
    }

    #[test]
    fn emptying_inputs_clears_progress() {
        let mut station = wheel();
        station.slots.inputs[0] = Some(ItemStack::new(FIBERS, 4));
        station.try_mount(OccupantId::player(7, "ada"));
        station.tick(2.0);

        station.slots.inputs[0] = None;
        station.on_slots_changed();
        assert_eq!(station.progress_view().progress_time, 0.0);
        assert!(!station.progress_view().active);
    }

    #[test]
    fn broadcast_only_with_occupant_or_progress() {
        let mut station = wheel();
        assert!(!station.should_broadcast());

        station.slots.inputs[0] = Some(ItemStack::new(FIBERS, 4));
        station.try_mount(OccupantId::player(7, "ada"));
        assert!(station.should_broadcast());

        station.tick(1.0);
        station.unmount(7, None);
        // Residual decaying progress still broadcasts.
        assert!(station.should_broadcast());
        station.tick(100.0);
        assert!(!station.should_broadcast());
    }

    #[test]
    fn use_restriction_gates_by_class_or_trait() {
        let open = UseRestriction::default();
        assert!(open.permits("commoner", &[]));

        let gate = UseRestriction {
            enabled: true,
            allowed_classes: vec!["clockmaker".to_string()],
            allowed_traits: vec!["nimblefingers".to_string()],
        };
        assert!(gate.permits("clockmaker", &[]));
        assert!(gate.permits("commoner", &["nimblefingers"]));
        assert!(!gate.permits("commoner", &["heavyhanded"]));
    }

    struct OpenFloor;

    impl CollisionProbe for OpenFloor {
        fn is_obstructed(&self, _pos: [f64; 3], _bounds: &Aabb) -> bool {
            false
        }
    }

    #[test]
    fn seat_conflict_leaves_holder_and_repositions_on_unmount() {
        let mut station = wheel();
        assert_eq!(
            station.try_mount(OccupantId::player(7, "ada")),
            MountOutcome::Mounted
        );
        assert_eq!(
            station.try_mount(OccupantId::player(9, "brin")),
            MountOutcome::Occupied
        );
        assert_eq!(station.occupant().unwrap().entity_id, 7);

        let spot = station.unmount(7, Some(&OpenFloor)).unwrap();
        assert!(station.occupant().is_none());
        // Station at (0, 4, 0) facing north: front cell center.
        assert_eq!(spot, [0.5, 4.001, -0.5]);
    }

    struct FixedDirectory {
        players: HashMap<String, i64>,
    }

    impl EntityDirectory for FixedDirectory {
        fn player_entity_by_uid(&self, uid: &str) -> Option<i64> {
            self.players.get(uid).copied()
        }
        fn entity_exists(&self, _entity_id: i64) -> bool {
            false
        }
    }

    #[test]
    fn state_round_trips_through_attribute_tree() {
        let mut station = loom();
        station.slots.inputs[0] = Some(ItemStack::new(TWINE, 8));
        station.try_mount(OccupantId::player(7, "ada"));
        station.request_mode(StationMode::Pattern);
        station.slots.pattern = [Some(ItemStack::new(TWINE, 2)); 4];
        station.tick(3.0);

        let tree = station.to_tree();
        let directory = FixedDirectory {
            players: HashMap::from([("ada".to_string(), 42)]),
        };
        let quantity = QuantityResolver::new(registry(), weave_params(), Process::Weaving);
        let restored = Station::from_tree(
            StationSpec::fly_shuttle_loom(),
            BlockPos::new(0, 4, 0),
            quantity,
            None,
            &tree,
            &directory,
        );

        assert_eq!(restored.progress_view().progress_time, 3.0);
        assert_eq!(restored.mode(), StationMode::Pattern);
        // Re-seated via uid lookup, picking up the player's live entity id.
        assert_eq!(restored.occupant().unwrap().entity_id, 42);
    }

    #[test]
    fn missing_tree_fields_restore_to_defaults() {
        let directory = FixedDirectory {
            players: HashMap::new(),
        };
        let quantity = QuantityResolver::new(registry(), spin_params(), Process::Spinning);
        let restored = Station::from_tree(
            StationSpec::spinning_wheel(),
            BlockPos::new(1, 2, 3),
            quantity,
            None,
            &AttrTree::new(),
            &directory,
        );
        assert_eq!(restored.progress_view().progress_time, 0.0);
        assert_eq!(restored.mode(), StationMode::Normal);
        assert!(restored.occupant().is_none());
        assert_eq!(restored.facing(), Facing::North);
    }
}
