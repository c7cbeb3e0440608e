//! Fixed timestep simulation tick
//!
//! Order within a playing tick: fire, move, zone timing, clamp, collisions,
//! spawn. A tick that ends the session stops where it ended.

use super::collision::{circles_collide, clamp_to_bounds, is_out_of_bounds};
use super::input::TickInput;
use super::spawn::{split_hazard, try_shoot, try_spawn_hazard};
use super::state::{EntityRef, GamePhase, GameState};
use crate::consts::*;
use crate::events::GameEvent;
use crate::store::ActorKey;
use crate::wrap_degrees;

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    match state.phase {
        GamePhase::Paused => {
            // Any key press resumes, Escape included
            if !input.resume {
                return;
            }
            state.resume();
        }
        GamePhase::Playing if input.pause => {
            state.pause();
            return;
        }
        GamePhase::Playing => {}
        GamePhase::Menu | GamePhase::GameOver | GamePhase::Win => return,
    }

    state.time_ticks += 1;
    state.playtime.advance(dt);
    state.zone_timer.advance(dt);
    state.shoot_timer.advance(dt);
    state.spawn_timer.advance(dt);

    if input.fire {
        try_shoot(state, input.aim);
    }

    advance_entities(state, input, dt);

    update_zone(state);
    if state.phase != GamePhase::Playing {
        return;
    }

    state.ship.actor.position =
        clamp_to_bounds(state.ship.actor.position, state.ship.actor.radius, state.bounds);

    check_collisions(state);
    if state.phase != GamePhase::Playing {
        return;
    }

    try_spawn_hazard(state);
}

/// Move every live entity. The live list is not mutated here, so index it directly.
fn advance_entities(state: &mut GameState, input: &TickInput, dt: f32) {
    for i in 0..state.entities.len() {
        match state.entities[i] {
            EntityRef::Ship => state.ship.update(input.thrust, input.turn, dt),
            EntityRef::Zone => {
                state.zone.rotation = wrap_degrees(state.zone.rotation + ZONE_ROTATION_SPEED * dt);
            }
            // Moved in bulk below
            EntityRef::Projectile(_) => {}
            EntityRef::Hazard(handle) => {
                let Some(row) = state.hazards.get(handle).map(|h| h.row) else {
                    continue;
                };
                if let Some(effect) = state.store.update(row, dt) {
                    state.apply_owner_effect(effect);
                }
            }
        }
    }

    for (_, projectile) in state.projectiles.iter_active_mut() {
        projectile.advance(dt);
    }
}

/// Time the ship's stay in the zone and award completions
fn update_zone(state: &mut GameState) {
    state.ship_in_zone = state.ship.actor.intersects(&state.zone);
    if !state.ship_in_zone {
        // Frozen, not cleared, until the ship comes back
        state.zone_timer.stop();
        return;
    }

    if !state.zone_timer.is_running() {
        state.zone_timer.restart();
    }

    if state.zone_timer.elapsed() >= state.tuning.zone_completion_time {
        state.zones_completed += 1;
        state.score += state.tuning.points_per_zone;
        state.zone_timer.reset();
        log::info!("Zone {} completed", state.zones_completed);
        state.bus.publish(GameEvent::ZoneCompleted {
            zones_completed: state.zones_completed,
        });
        state.place_zone();
    }
}

/// Projectile vs hazard, then ship vs hazard.
///
/// Both passes walk snapshots of the pools' active lists, so recycling and
/// splitting inline never disturbs the scan.
pub fn check_collisions(state: &mut GameState) {
    let margin = state.tuning.bounds_margin;

    for projectile in state.projectiles.active().to_vec() {
        let Some((pos, radius)) = state
            .projectiles
            .get(projectile)
            .map(|p| (p.position, p.radius))
        else {
            continue;
        };

        if is_out_of_bounds(pos, state.bounds, margin) {
            state.recycle_projectile(projectile);
            continue;
        }

        for hazard in state.hazards.active().to_vec() {
            let owner = ActorKey::from(hazard);
            let hazard_radius = state.store.radius_by_owner(owner);
            if hazard_radius <= 0.0 {
                continue;
            }

            if circles_collide(pos, radius, state.hazard_position(hazard), hazard_radius) {
                let level = state.store.level_by_owner(owner);
                state.score += state.tuning.points_per_hazard_level * u64::from(level);
                state.recycle_projectile(projectile);
                split_hazard(state, hazard);
                // One projectile takes out at most one hazard
                break;
            }
        }
    }

    let ship_pos = state.ship.actor.position;
    let ship_radius = state.ship.actor.radius;

    for hazard in state.hazards.active().to_vec() {
        let pos = state.hazard_position(hazard);
        if is_out_of_bounds(pos, state.bounds, margin) {
            state.recycle_hazard(hazard);
            continue;
        }

        let hazard_radius = state.store.radius_by_owner(ActorKey::from(hazard));
        if hazard_radius <= 0.0 {
            continue;
        }

        if circles_collide(ship_pos, ship_radius, pos, hazard_radius) {
            log::info!("Ship destroyed at ({:.0}, {:.0})", ship_pos.x, ship_pos.y);
            state.finish_session(false);
            break;
        }
    }
}
