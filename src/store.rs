//! Hazard component store
//!
//! Simulation data for hazard actors lives here rather than on the actor
//! itself. Rows are reachable by [`RowId`] and by owner [`ActorKey`].
//!
//! Locking is per call: readers take the shared lock, mutators the exclusive
//! lock. Mutators never reach back into the owning actor. Anything the owner
//! must do in response (resize its collider, move) is returned as an
//! [`OwnerEffect`] after the lock is released, and the caller applies it.
//!
//! Lookups that miss return neutral defaults and never fail.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use glam::Vec2;
use parking_lot::RwLock;

use crate::consts::*;
use crate::pool::PoolHandle;
use crate::wrap_degrees;

/// Opaque row identifier, monotonically assigned and never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(u64);

impl RowId {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Non-owning reference from a row to its actor: an index into the hazard arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActorKey(pub u32);

impl From<PoolHandle> for ActorKey {
    fn from(handle: PoolHandle) -> Self {
        ActorKey(handle.index() as u32)
    }
}

/// Side effect a store mutation requests from the owning actor
#[must_use = "owner effects must be applied to keep the actor in sync"]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OwnerEffect {
    /// Collider radius / shape changed
    Resize {
        owner: ActorKey,
        radius: f32,
        point_count: u32,
    },
    /// Owner should move by `delta`
    Translate { owner: ActorKey, delta: Vec2 },
}

impl OwnerEffect {
    pub fn owner(&self) -> ActorKey {
        match *self {
            OwnerEffect::Resize { owner, .. } | OwnerEffect::Translate { owner, .. } => owner,
        }
    }
}

/// Per-hazard simulation data
#[derive(Debug, Clone, PartialEq)]
pub struct HazardRow {
    pub id: RowId,
    pub owner: ActorKey,
    pub level: u32,
    /// Degrees per second
    pub rotation_speed: f32,
    /// Current rotation phase in degrees
    pub rotation: f32,
    pub default_speed: f32,
    pub speed: f32,
    pub direction: Vec2,
    pub radius: f32,
    pub point_count: u32,
}

impl HazardRow {
    fn new(id: RowId, owner: ActorKey, level: u32) -> Self {
        Self {
            id,
            owner,
            level,
            rotation_speed: HAZARD_ROTATION_SPEED,
            rotation: 0.0,
            default_speed: HAZARD_DEFAULT_SPEED,
            speed: HAZARD_DEFAULT_SPEED,
            direction: Vec2::ZERO,
            radius: radius_for_level(level),
            point_count: HAZARD_POINTS,
        }
    }

    fn set_level(&mut self, level: u32) -> OwnerEffect {
        self.level = level;
        self.radius = radius_for_level(level);
        self.resize_effect()
    }

    fn resize_effect(&self) -> OwnerEffect {
        OwnerEffect::Resize {
            owner: self.owner,
            radius: self.radius,
            point_count: self.point_count,
        }
    }
}

/// Collision radius for a hazard level
#[inline]
pub fn radius_for_level(level: u32) -> f32 {
    HAZARD_BASE_RADIUS + level as f32 * HAZARD_RADIUS_STEP
}

#[derive(Debug, Default)]
struct Tables {
    rows: HashMap<RowId, HazardRow>,
    by_owner: HashMap<ActorKey, RowId>,
}

/// Concurrency-safe table of hazard rows
#[derive(Debug)]
pub struct HazardStore {
    tables: RwLock<Tables>,
    next_id: AtomicU64,
}

impl Default for HazardStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HazardStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Insert a row for `owner`. Negative levels clamp to zero.
    ///
    /// Re-registering an owner that already has a row replaces the mapping
    /// and drops the old row, keeping owner to id one-to-one.
    pub fn create(&self, owner: ActorKey, initial_level: i32) -> (RowId, OwnerEffect) {
        let id = RowId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let row = HazardRow::new(id, owner, clamp_level(initial_level));
        let effect = row.resize_effect();

        let mut tables = self.tables.write();
        if let Some(stale) = tables.by_owner.insert(owner, id) {
            tables.rows.remove(&stale);
        }
        tables.rows.insert(id, row);
        (id, effect)
    }

    /// Remove a row and its owner mapping; unknown ids are ignored
    pub fn destroy(&self, id: RowId) -> bool {
        let mut tables = self.tables.write();
        match tables.rows.remove(&id) {
            Some(row) => {
                if tables.by_owner.get(&row.owner) == Some(&id) {
                    tables.by_owner.remove(&row.owner);
                }
                true
            }
            None => false,
        }
    }

    /// Advance rotation and request the owner move along its direction
    pub fn update(&self, id: RowId, dt: f32) -> Option<OwnerEffect> {
        self.with_row_mut(id, |row| {
            row.rotation = wrap_degrees(row.rotation + row.rotation_speed * dt);
            OwnerEffect::Translate {
                owner: row.owner,
                delta: row.direction * row.speed * dt,
            }
        })
    }

    pub fn set_level(&self, id: RowId, level: i32) -> Option<OwnerEffect> {
        self.with_row_mut(id, |row| row.set_level(clamp_level(level)))
    }

    /// Decrement the level unless it is already zero
    pub fn decrease_level(&self, id: RowId) -> Option<OwnerEffect> {
        self.with_row_mut(id, |row| row.set_level(row.level.saturating_sub(1)))
    }

    /// Restore motion state to construction defaults, keeping the level
    pub fn reset(&self, id: RowId) -> Option<OwnerEffect> {
        self.with_row_mut(id, |row| {
            row.rotation_speed = HAZARD_ROTATION_SPEED;
            row.rotation = 0.0;
            row.default_speed = HAZARD_DEFAULT_SPEED;
            row.speed = row.default_speed;
            row.direction = Vec2::ZERO;
            row.resize_effect()
        })
    }

    pub fn level(&self, id: RowId) -> u32 {
        self.with_row(id, |row| row.level).unwrap_or(0)
    }

    pub fn radius(&self, id: RowId) -> f32 {
        self.with_row(id, |row| row.radius).unwrap_or(0.0)
    }

    pub fn rotation(&self, id: RowId) -> f32 {
        self.with_row(id, |row| row.rotation).unwrap_or(0.0)
    }

    pub fn direction(&self, id: RowId) -> Vec2 {
        self.with_row(id, |row| row.direction).unwrap_or(Vec2::ZERO)
    }

    pub fn set_direction(&self, id: RowId, direction: Vec2) {
        self.with_row_mut(id, |row| row.direction = direction);
    }

    pub fn speed(&self, id: RowId) -> f32 {
        self.with_row(id, |row| row.speed).unwrap_or(0.0)
    }

    pub fn set_speed(&self, id: RowId, speed: f32) {
        self.with_row_mut(id, |row| row.speed = speed);
    }

    pub fn default_speed(&self, id: RowId) -> f32 {
        self.with_row(id, |row| row.default_speed).unwrap_or(0.0)
    }

    pub fn set_default_speed(&self, id: RowId, speed: f32) {
        self.with_row_mut(id, |row| row.default_speed = speed);
    }

    /// Copy of the whole row
    pub fn row(&self, id: RowId) -> Option<HazardRow> {
        self.with_row(id, HazardRow::clone)
    }

    pub fn contains(&self, id: RowId) -> bool {
        self.tables.read().rows.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.tables.read().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Point-in-time list of live ids, ascending
    pub fn snapshot_ids(&self) -> Vec<RowId> {
        let mut ids: Vec<RowId> = self.tables.read().rows.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn id_for_owner(&self, owner: ActorKey) -> Option<RowId> {
        self.tables.read().by_owner.get(&owner).copied()
    }

    // Owner-keyed variants. Each resolves the id under its own lock first, so
    // the pair is not atomic with respect to other writers.

    pub fn level_by_owner(&self, owner: ActorKey) -> u32 {
        self.id_for_owner(owner).map_or(0, |id| self.level(id))
    }

    pub fn set_level_by_owner(&self, owner: ActorKey, level: i32) -> Option<OwnerEffect> {
        self.id_for_owner(owner).and_then(|id| self.set_level(id, level))
    }

    pub fn decrease_level_by_owner(&self, owner: ActorKey) -> Option<OwnerEffect> {
        self.id_for_owner(owner).and_then(|id| self.decrease_level(id))
    }

    pub fn radius_by_owner(&self, owner: ActorKey) -> f32 {
        self.id_for_owner(owner).map_or(0.0, |id| self.radius(id))
    }

    pub fn rotation_by_owner(&self, owner: ActorKey) -> f32 {
        self.id_for_owner(owner).map_or(0.0, |id| self.rotation(id))
    }

    pub fn direction_by_owner(&self, owner: ActorKey) -> Vec2 {
        self.id_for_owner(owner)
            .map_or(Vec2::ZERO, |id| self.direction(id))
    }

    pub fn set_direction_by_owner(&self, owner: ActorKey, direction: Vec2) {
        if let Some(id) = self.id_for_owner(owner) {
            self.set_direction(id, direction);
        }
    }

    pub fn speed_by_owner(&self, owner: ActorKey) -> f32 {
        self.id_for_owner(owner).map_or(0.0, |id| self.speed(id))
    }

    pub fn set_speed_by_owner(&self, owner: ActorKey, speed: f32) {
        if let Some(id) = self.id_for_owner(owner) {
            self.set_speed(id, speed);
        }
    }

    pub fn default_speed_by_owner(&self, owner: ActorKey) -> f32 {
        self.id_for_owner(owner)
            .map_or(0.0, |id| self.default_speed(id))
    }

    fn with_row<R>(&self, id: RowId, f: impl FnOnce(&HazardRow) -> R) -> Option<R> {
        let tables = self.tables.read();
        tables.rows.get(&id).map(f)
    }

    fn with_row_mut<R>(&self, id: RowId, f: impl FnOnce(&mut HazardRow) -> R) -> Option<R> {
        let mut tables = self.tables.write();
        tables.rows.get_mut(&id).map(f)
    }
}

#[inline]
fn clamp_level(level: i32) -> u32 {
    level.max(0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::Arc;

    #[test]
    fn test_create_reports_radius_to_owner() {
        let store = HazardStore::new();
        let (id, effect) = store.create(ActorKey(7), 2);
        assert_eq!(
            effect,
            OwnerEffect::Resize {
                owner: ActorKey(7),
                radius: 30.0,
                point_count: HAZARD_POINTS,
            }
        );
        assert_eq!(store.radius(id), 30.0);
        assert_eq!(store.speed(id), HAZARD_DEFAULT_SPEED);
    }

    #[test]
    fn test_negative_level_clamps_to_zero() {
        let store = HazardStore::new();
        let (id, _) = store.create(ActorKey(0), -4);
        assert_eq!(store.level(id), 0);
        assert_eq!(store.radius(id), HAZARD_BASE_RADIUS);

        let _ = store.set_level(id, -1);
        assert_eq!(store.level(id), 0);
    }

    #[test]
    fn test_decrease_level_stops_at_zero() {
        let store = HazardStore::new();
        let (id, _) = store.create(ActorKey(0), 1);
        let _ = store.decrease_level(id);
        assert_eq!(store.level(id), 0);
        let effect = store.decrease_level(id);
        assert_eq!(store.level(id), 0);
        assert!(matches!(effect, Some(OwnerEffect::Resize { radius, .. }) if radius == HAZARD_BASE_RADIUS));
    }

    #[test]
    fn test_ids_are_never_reused() {
        let store = HazardStore::new();
        let (a, _) = store.create(ActorKey(0), 1);
        store.destroy(a);
        let (b, _) = store.create(ActorKey(0), 1);
        assert!(b > a);
    }

    #[test]
    fn test_owner_mapping_follows_lifecycle() {
        let store = HazardStore::new();
        let owner = ActorKey(3);
        let (id, _) = store.create(owner, 2);
        assert_eq!(store.id_for_owner(owner), Some(id));

        assert!(store.destroy(id));
        assert_eq!(store.id_for_owner(owner), None);
        assert!(!store.destroy(id));
    }

    #[test]
    fn test_recreate_for_same_owner_replaces_row() {
        let store = HazardStore::new();
        let owner = ActorKey(1);
        let (first, _) = store.create(owner, 1);
        let (second, _) = store.create(owner, 2);
        assert_eq!(store.id_for_owner(owner), Some(second));
        assert!(!store.contains(first));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_unknown_id_returns_defaults() {
        let store = HazardStore::new();
        let (id, _) = store.create(ActorKey(0), 1);
        store.destroy(id);

        assert_eq!(store.level(id), 0);
        assert_eq!(store.radius(id), 0.0);
        assert_eq!(store.direction(id), Vec2::ZERO);
        assert!(store.update(id, 1.0).is_none());
        assert!(store.set_level(id, 3).is_none());
        assert!(store.row(id).is_none());

        let stranger = ActorKey(99);
        assert_eq!(store.level_by_owner(stranger), 0);
        assert_eq!(store.default_speed_by_owner(stranger), 0.0);
        store.set_speed_by_owner(stranger, 5.0);
        assert!(store.set_level_by_owner(stranger, 2).is_none());
    }

    #[test]
    fn test_update_rotates_and_requests_move() {
        let store = HazardStore::new();
        let (id, _) = store.create(ActorKey(4), 1);
        store.set_direction(id, Vec2::X);
        store.set_speed(id, 100.0);

        let effect = store.update(id, 0.5);
        assert_eq!(
            effect,
            Some(OwnerEffect::Translate {
                owner: ActorKey(4),
                delta: Vec2::new(50.0, 0.0),
            })
        );
        assert!((store.rotation(id) - HAZARD_ROTATION_SPEED * 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_reset_restores_motion_keeps_level() {
        let store = HazardStore::new();
        let (id, _) = store.create(ActorKey(0), 3);
        store.set_speed(id, 1.0);
        store.set_direction(id, Vec2::Y);
        let _ = store.update(id, 1.0);

        let _ = store.reset(id);
        let row = store.row(id).unwrap();
        assert_eq!(row.speed, HAZARD_DEFAULT_SPEED);
        assert_eq!(row.direction, Vec2::ZERO);
        assert_eq!(row.rotation, 0.0);
        assert_eq!(row.level, 3);
    }

    #[test]
    fn test_snapshot_is_sorted() {
        let store = HazardStore::new();
        let ids: Vec<RowId> = (0..10).map(|i| store.create(ActorKey(i), 1).0).collect();
        assert_eq!(store.snapshot_ids(), ids);
    }

    #[test]
    fn test_concurrent_access() {
        let store = Arc::new(HazardStore::new());
        let ids: Vec<RowId> = (0..16).map(|i| store.create(ActorKey(i), 3).0).collect();

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for _ in 0..200 {
                        for id in store.snapshot_ids() {
                            let level = store.level(id);
                            let radius = store.radius(id);
                            // A concurrent writer may land between the two reads
                            assert!(radius >= HAZARD_BASE_RADIUS || radius == 0.0);
                            assert!(level <= 3);
                        }
                    }
                })
            })
            .collect();

        let writer = {
            let store = Arc::clone(&store);
            let ids = ids.clone();
            std::thread::spawn(move || {
                for _ in 0..3 {
                    for &id in &ids {
                        let _ = store.decrease_level(id);
                    }
                }
            })
        };

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
        assert!(ids.iter().all(|&id| store.level(id) == 0));
    }

    proptest! {
        #[test]
        fn prop_radius_tracks_level(initial in -5i32..10, ops in proptest::collection::vec(prop_oneof![Just(None), (-3i32..8).prop_map(Some)], 0..32)) {
            let store = HazardStore::new();
            let (id, _) = store.create(ActorKey(0), initial);
            prop_assert_eq!(store.radius(id), radius_for_level(store.level(id)));
            for op in ops {
                let effect = match op {
                    None => store.decrease_level(id),
                    Some(level) => store.set_level(id, level),
                };
                prop_assert_eq!(store.radius(id), radius_for_level(store.level(id)));
                let is_matching_resize = matches!(effect, Some(OwnerEffect::Resize { radius, .. }) if radius == store.radius(id));
                prop_assert!(is_matching_resize);
            }
        }

        #[test]
        fn prop_owner_mapping_is_bijective(count in 1u32..24, destroy_mask in any::<u32>()) {
            let store = HazardStore::new();
            let ids: Vec<RowId> = (0..count).map(|i| store.create(ActorKey(i), 1).0).collect();
            for (i, id) in ids.iter().enumerate() {
                if destroy_mask & (1 << i) != 0 {
                    store.destroy(*id);
                }
            }
            for (i, id) in ids.iter().enumerate() {
                let owner = ActorKey(i as u32);
                if destroy_mask & (1 << i) != 0 {
                    prop_assert_eq!(store.id_for_owner(owner), None);
                } else {
                    prop_assert_eq!(store.id_for_owner(owner), Some(*id));
                    prop_assert_eq!(store.row(*id).map(|r| r.owner), Some(owner));
                }
            }
        }
    }
}
