//! Spawning rules: projectiles, incoming hazards and hazard splitting
//!
//! Pool exhaustion is normal here; every rule degrades to "nothing spawned".

use glam::Vec2;
use rand::Rng;

use super::actor::Hazard;
use super::state::{EntityRef, GameState};
use crate::events::GameEvent;
use crate::pool::PoolHandle;
use crate::store::ActorKey;
use crate::{direction_to, heading, rotate_degrees};

/// Fire from the ship toward `aim` (ship heading if there is no pointer yet).
///
/// The cooldown restarts on every accepted attempt, even with an empty pool.
pub fn try_shoot(state: &mut GameState, aim: Option<Vec2>) -> Option<PoolHandle> {
    if state.shoot_timer.elapsed() <= state.tuning.shoot_cooldown {
        return None;
    }
    state.shoot_timer.restart();

    let origin = state.ship.actor.position;
    let direction = match aim.map(|target| direction_to(origin, target)) {
        Some(dir) if dir != Vec2::ZERO => dir,
        _ => heading(state.ship.actor.rotation),
    };

    let Some(handle) = state.projectiles.acquire() else {
        log::debug!("Projectile pool exhausted, shot skipped");
        return None;
    };
    if let Some(projectile) = state.projectiles.get_mut(handle) {
        projectile.position = origin;
        projectile.direction = direction;
    }
    state.entities.push(EntityRef::Projectile(handle));
    state.bus.publish(GameEvent::ProjectileFired { position: origin });
    Some(handle)
}

/// Cooldown-gated hazard spawn just outside a random edge.
///
/// An empty pool leaves the cooldown running so the next tick retries.
pub fn try_spawn_hazard(state: &mut GameState) -> Option<PoolHandle> {
    if state.spawn_timer.elapsed() <= state.tuning.hazard_spawn_cooldown {
        return None;
    }
    let Some(handle) = state.hazards.acquire() else {
        log::debug!("Hazard pool exhausted, spawn skipped");
        return None;
    };

    let tuning = &state.tuning;
    let bounds = state.bounds;
    let margin = tuning.spawn_margin;
    let rng = &mut state.rng;

    let position = match rng.random_range(0..4) {
        0 => Vec2::new(rng.random_range(0.0..bounds.width.max(1.0)), -margin),
        1 => Vec2::new(
            rng.random_range(0.0..bounds.width.max(1.0)),
            bounds.height + margin,
        ),
        2 => Vec2::new(-margin, rng.random_range(0.0..bounds.height.max(1.0))),
        _ => Vec2::new(
            bounds.width + margin,
            rng.random_range(0.0..bounds.height.max(1.0)),
        ),
    };

    let target = if state.ship_in_zone {
        state.ship.actor.position
    } else {
        let jitter = tuning.spawn_aim_jitter;
        bounds.center()
            + Vec2::new(
                rng.random_range(-jitter..=jitter),
                rng.random_range(-jitter..=jitter),
            )
    };
    let level = rng.random_range(1..=tuning.max_spawn_level.max(1));
    let speed_offset = rng.random_range(-tuning.speed_jitter..=tuning.speed_jitter);

    let owner = ActorKey::from(handle);
    let store = &state.store;
    let mut effects = Vec::with_capacity(2);
    if let Some(row) = store.id_for_owner(owner) {
        effects.extend(store.reset(row));
    }
    effects.extend(store.set_level_by_owner(owner, level));
    store.set_direction_by_owner(owner, direction_to(position, target));
    store.set_speed_by_owner(owner, store.default_speed_by_owner(owner) + speed_offset);

    for effect in effects {
        state.apply_owner_effect(effect);
    }
    if let Some(hazard) = state.hazards.get_mut(handle) {
        hazard.actor.position = position;
    }
    state.entities.push(EntityRef::Hazard(handle));
    state.spawn_timer.restart();

    log::debug!(
        "Spawned level {} hazard at ({:.0}, {:.0})",
        level,
        position.x,
        position.y
    );
    Some(handle)
}

/// Split a hit hazard.
///
/// Level 1 or lower is recycled outright. Otherwise the hazard drops a level
/// and, if the pool allows, a fragment of the same level appears at its
/// position. Both fly off at independent small angles from the old heading.
pub fn split_hazard(state: &mut GameState, handle: PoolHandle) {
    let owner = ActorKey::from(handle);
    let position = state.hazard_position(handle);
    let level = state.store.level_by_owner(owner);

    if level <= 1 {
        state.recycle_hazard(handle);
        state
            .bus
            .publish(GameEvent::HazardDestroyed { position, level });
        return;
    }

    if let Some(effect) = state.store.decrease_level_by_owner(owner) {
        state.apply_owner_effect(effect);
    }
    let survivor_level = state.store.level_by_owner(owner);

    let Some(fragment) = state.hazards.acquire() else {
        log::debug!("Hazard pool exhausted, split produced no fragment");
        state.bus.publish(GameEvent::HazardSplit {
            position,
            level: survivor_level,
            fragment: false,
        });
        return;
    };
    let fragment_owner = ActorKey::from(fragment);

    let original_direction = state.store.direction_by_owner(owner);
    let spread = state.tuning.split_angle;
    let jitter = state.tuning.speed_jitter;
    let rng = &mut state.rng;
    let fragment_angle = rng.random_range(-spread..=spread);
    let survivor_angle = rng.random_range(-spread..=spread);
    let fragment_offset = rng.random_range(-jitter..=jitter);
    let survivor_offset = rng.random_range(-jitter..=jitter);

    let store = &state.store;
    let mut effects = Vec::with_capacity(2);
    if let Some(row) = store.id_for_owner(fragment_owner) {
        effects.extend(store.reset(row));
    }
    effects.extend(store.set_level_by_owner(fragment_owner, survivor_level as i32));

    store.set_direction_by_owner(
        fragment_owner,
        rotate_degrees(original_direction, fragment_angle),
    );
    store.set_direction_by_owner(owner, rotate_degrees(original_direction, survivor_angle));
    store.set_speed_by_owner(
        fragment_owner,
        store.default_speed_by_owner(fragment_owner) + fragment_offset,
    );
    store.set_speed_by_owner(owner, store.default_speed_by_owner(owner) + survivor_offset);

    for effect in effects {
        state.apply_owner_effect(effect);
    }
    if let Some(Hazard { actor, .. }) = state.hazards.get_mut(fragment) {
        actor.position = position;
    }
    state.entities.push(EntityRef::Hazard(fragment));

    log::debug!("Hazard split into two level {} pieces", survivor_level);
    state.bus.publish(GameEvent::HazardSplit {
        position,
        level: survivor_level,
        fragment: true,
    });
}
