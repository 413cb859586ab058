//! Seat occupancy and dismount placement.
//!
//! A station's seat holds at most one occupant, stored as an identity
//! rather than a live handle: an entity id plus, for players, the owning
//! player uid. The identity survives persistence and is resolved back to
//! a live entity through the [`EntityDirectory`] seam.

use crate::geometry::{Aabb, Facing};
use tracing::debug;

/// Identity of a seated actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupantId {
    /// World entity id of the seated actor.
    pub entity_id: i64,
    /// Player uid when the occupant is a player, `None` for other entities.
    pub owner: Option<String>,
}

impl OccupantId {
    /// Identity for a non-player entity.
    pub fn entity(entity_id: i64) -> Self {
        Self {
            entity_id,
            owner: None,
        }
    }

    /// Identity for a player-controlled entity.
    pub fn player(entity_id: i64, uid: impl Into<String>) -> Self {
        Self {
            entity_id,
            owner: Some(uid.into()),
        }
    }
}

/// Result of a mount attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountOutcome {
    /// The seat was free and the actor is now seated.
    Mounted,
    /// The actor was already seated here; nothing changed.
    AlreadySeated,
    /// A different actor holds the seat. The requester must stand down.
    Occupied,
}

/// Tracks the single seat of one station.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccupancyController {
    occupant: Option<OccupantId>,
}

impl OccupancyController {
    /// Create an empty controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current occupant, if any.
    pub fn occupant(&self) -> Option<&OccupantId> {
        self.occupant.as_ref()
    }

    /// Whether anyone is seated.
    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    /// Attempt to seat an actor.
    ///
    /// A second mount by the current occupant is a no-op; a mount while a
    /// different actor is seated is refused and the requester must be
    /// force-dismounted by the caller.
    pub fn mount(&mut self, who: OccupantId) -> MountOutcome {
        match &self.occupant {
            Some(current) if current.entity_id == who.entity_id => MountOutcome::AlreadySeated,
            Some(current) => {
                debug!(
                    seated = current.entity_id,
                    requester = who.entity_id,
                    "seat already taken"
                );
                MountOutcome::Occupied
            }
            None => {
                self.occupant = Some(who);
                MountOutcome::Mounted
            }
        }
    }

    /// Release the seat if `entity_id` holds it. Returns whether it did.
    pub fn unmount(&mut self, entity_id: i64) -> bool {
        if self
            .occupant
            .as_ref()
            .is_some_and(|o| o.entity_id == entity_id)
        {
            self.occupant = None;
            true
        } else {
            false
        }
    }

    /// Unconditionally clear the seat, returning the previous occupant.
    pub fn clear(&mut self) -> Option<OccupantId> {
        self.occupant.take()
    }
}

/// Host-side collision query used when placing a dismounting actor.
pub trait CollisionProbe {
    /// Whether `bounds` positioned at `pos` intersects any solid geometry.
    fn is_obstructed(&self, pos: [f64; 3], bounds: &Aabb) -> bool;
}

/// Host-side entity lookup used when restoring a persisted occupant.
pub trait EntityDirectory {
    /// Live entity id of the player with this uid, if online.
    fn player_entity_by_uid(&self, uid: &str) -> Option<i64>;
    /// Whether an entity with this id is currently loaded.
    fn entity_exists(&self, entity_id: i64) -> bool;
}

/// Find a clear spot for an actor stepping off the seat at `seat_pos`.
///
/// At most four candidates are probed, one per horizontal direction
/// starting in front of the station. Each candidate is the neighboring
/// cell's center at floor height. Returns `None` when all four are
/// obstructed; the caller then leaves the actor at the seat.
pub fn dismount_position(
    seat_pos: [i32; 3],
    facing: Facing,
    bounds: &Aabb,
    probe: &dyn CollisionProbe,
) -> Option<[f64; 3]> {
    for dir in facing.dismount_order() {
        let (dx, dz) = dir.delta();
        let candidate = [
            f64::from(seat_pos[0] + dx) + 0.5,
            f64::from(seat_pos[1]) + 0.001,
            f64::from(seat_pos[2] + dz) + 0.5,
        ];
        if !probe.is_obstructed(candidate, bounds) {
            return Some(candidate);
        }
    }
    None
}

/// Resolve a persisted occupant record to a live identity.
///
/// Player uids are authoritative: if the uid resolves to an online player
/// we reseat that player's current entity even if its id changed across
/// the save. Otherwise the raw entity id is used if it still exists.
pub fn resolve_persisted(
    entity_id: i64,
    owner: Option<&str>,
    directory: &dyn EntityDirectory,
) -> Option<OccupantId> {
    if let Some(uid) = owner {
        if let Some(live) = directory.player_entity_by_uid(uid) {
            return Some(OccupantId::player(live, uid));
        }
    }
    if entity_id != 0 && directory.entity_exists(entity_id) {
        return Some(OccupantId::entity(entity_id));
    }
    None
}
