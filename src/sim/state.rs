//! Session state and lifecycle
//!
//! `GameState` owns every actor in the session: the ship and zone singletons
//! plus the projectile and hazard pools. Hazard simulation data lives in the
//! shared [`HazardStore`]; one row per pooled hazard is created when the pool
//! is built and destroyed when the state drops.

use std::sync::Arc;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::actor::{Actor, DrawShape, Hazard};
use super::collision::Bounds;
use super::ship::Ship;
use crate::consts::*;
use crate::events::{EventBus, GameEvent};
use crate::game::SimContext;
use crate::pool::{Pool, PoolHandle};
use crate::store::{HazardStore, OwnerEffect};
use crate::tuning::Tuning;

/// Top-level session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the start action
    Menu,
    /// Active gameplay
    Playing,
    /// Stopwatches frozen until any key press
    Paused,
    /// Ship hit a hazard
    GameOver,
    /// All objective zones completed
    Win,
}

/// Elapsed-time counter advanced by simulation time
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Stopwatch {
    elapsed: f32,
    running: bool,
}

impl Stopwatch {
    pub fn stopped() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Zero and run
    pub fn restart(&mut self) {
        self.elapsed = 0.0;
        self.running = true;
    }

    /// Zero and stop
    pub fn reset(&mut self) {
        *self = Self::stopped();
    }

    pub fn advance(&mut self, dt: f32) {
        if self.running {
            self.elapsed += dt;
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

/// Entry in the live list: what gets advanced and drawn, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityRef {
    Ship,
    Zone,
    Projectile(PoolHandle),
    Hazard(PoolHandle),
}

/// Plain values for a HUD overlay
#[derive(Debug, Clone, PartialEq)]
pub struct HudSnapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub playtime_secs: u64,
    pub zones_completed: u32,
    /// Seconds left inside the zone, floored at zero
    pub zone_time_remaining: f32,
    pub ship_in_zone: bool,
    /// End-of-session summary, set once the session finishes
    pub results: Option<String>,
    /// Whole seconds left in the zone, rounded up
    pub zone_countdown: i32,
}

impl HudSnapshot {
    pub fn score_text(&self) -> String {
        format!("Score: {}", self.score)
    }

    pub fn playtime_text(&self) -> String {
        format!("Time: {}", self.playtime_secs)
    }

    /// Whole seconds shown while the ship is inside the zone
    pub fn zone_countdown_text(&self) -> String {
        self.zone_countdown.to_string()
    }
}

/// Complete session state
#[derive(Debug)]
pub struct GameState {
    pub phase: GamePhase,
    pub score: u64,
    pub zones_completed: u32,
    pub ship: Ship,
    /// Objective zone (outline-only actor)
    pub zone: Actor,
    pub projectiles: Pool<Actor>,
    pub hazards: Pool<Hazard>,
    /// Live list in insertion order
    pub entities: Vec<EntityRef>,
    pub bounds: Bounds,
    pub tuning: Tuning,
    /// Time spent inside the current zone
    pub zone_timer: Stopwatch,
    pub playtime: Stopwatch,
    pub shoot_timer: Stopwatch,
    pub spawn_timer: Stopwatch,
    pub ship_in_zone: bool,
    pub results: Option<String>,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(crate) rng: Pcg32,
    pub(crate) store: Arc<HazardStore>,
    pub(crate) bus: Arc<EventBus>,
}

impl GameState {
    /// Build pools up front; each hazard gets its store row here
    pub fn new(ctx: &SimContext, tuning: Tuning, bounds: Bounds, seed: u64) -> Self {
        let tuning = tuning.sanitized();
        let store = Arc::clone(&ctx.store);
        let projectiles = Pool::new(tuning.projectile_pool_capacity, |_| Actor::projectile());
        let hazards = Pool::new(tuning.hazard_pool_capacity, |handle| {
            let (row, effect) = store.create(handle.into(), HAZARD_INITIAL_LEVEL);
            let mut actor = Actor::hazard();
            actor.apply_effect(effect);
            Hazard { actor, row }
        });

        let mut ship = Ship::new();
        ship.reset(bounds.center());

        log::debug!(
            "Session state built: {} projectiles, {} hazards, seed {}",
            projectiles.capacity(),
            hazards.capacity(),
            seed
        );

        Self {
            phase: GamePhase::Menu,
            score: 0,
            zones_completed: 0,
            ship,
            zone: Actor::zone(),
            projectiles,
            hazards,
            entities: Vec::new(),
            bounds,
            tuning,
            zone_timer: Stopwatch::stopped(),
            playtime: Stopwatch::stopped(),
            shoot_timer: Stopwatch::stopped(),
            spawn_timer: Stopwatch::stopped(),
            ship_in_zone: false,
            results: None,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            store,
            bus: Arc::clone(&ctx.bus),
        }
    }

    pub fn store(&self) -> &Arc<HazardStore> {
        &self.store
    }

    pub(crate) fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        if from == to {
            return;
        }
        self.phase = to;
        log::info!("Phase {:?} -> {:?}", from, to);
        self.bus.publish(GameEvent::PhaseChanged { from, to });
    }

    /// Menu → Playing: fresh score, ship at centre, first zone placed
    pub fn start_session(&mut self) -> bool {
        if self.phase != GamePhase::Menu {
            log::debug!("Ignoring start in {:?}", self.phase);
            return false;
        }

        self.score = 0;
        self.zones_completed = 0;
        self.results = None;
        self.ship.reset(self.bounds.center());
        self.projectiles.release_all();
        self.hazards.release_all();
        self.entities.clear();
        self.entities.push(EntityRef::Ship);
        self.entities.push(EntityRef::Zone);

        self.ship_in_zone = false;
        self.zone_timer.reset();
        self.playtime.restart();
        self.shoot_timer.restart();
        self.spawn_timer.restart();

        self.set_phase(GamePhase::Playing);
        self.place_zone();
        true
    }

    /// Playing → Paused
    pub fn pause(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            log::debug!("Ignoring pause in {:?}", self.phase);
            return false;
        }
        self.playtime.stop();
        self.zone_timer.stop();
        self.set_phase(GamePhase::Paused);
        true
    }

    /// Paused → Playing; the zone timer only runs again if the ship is inside
    pub fn resume(&mut self) -> bool {
        if self.phase != GamePhase::Paused {
            log::debug!("Ignoring resume in {:?}", self.phase);
            return false;
        }
        self.playtime.start();
        if self.ship_in_zone {
            self.zone_timer.start();
        }
        self.set_phase(GamePhase::Playing);
        true
    }

    /// GameOver/Win → Menu
    pub fn return_to_menu(&mut self) -> bool {
        if !matches!(self.phase, GamePhase::GameOver | GamePhase::Win) {
            log::debug!("Ignoring back-to-menu in {:?}", self.phase);
            return false;
        }
        self.set_phase(GamePhase::Menu);
        true
    }

    /// End the session as a win or a loss and record the results text
    pub(crate) fn finish_session(&mut self, won: bool) {
        let headline = if won {
            "You have completed all objectives!"
        } else {
            "You died!"
        };

        self.projectiles.release_all();
        self.hazards.release_all();
        self.entities.clear();
        self.playtime.stop();
        self.zone_timer.stop();
        self.shoot_timer.stop();
        self.spawn_timer.stop();

        let results = format!(
            "{}\nTotal time played: {} seconds\nTotal Score: {} points",
            headline,
            self.playtime.elapsed() as u64,
            self.score
        );
        log::info!("Session finished: {}", results.replace('\n', "; "));
        self.results = Some(results);

        self.set_phase(if won { GamePhase::Win } else { GamePhase::GameOver });
    }

    /// Move the zone to the next slot, or win once enough zones are done
    pub(crate) fn place_zone(&mut self) {
        if self.zones_completed >= self.tuning.zones_to_win {
            self.finish_session(true);
            return;
        }
        // Zones step left to right across the middle of the screen
        let slots = (self.tuning.zones_to_win + 1) as f32;
        self.zone.position = Vec2::new(
            self.bounds.width / slots * (self.zones_completed + 1) as f32,
            self.bounds.height / 2.0,
        );
    }

    pub fn resize(&mut self, bounds: Bounds) {
        log::debug!("Bounds resized to {}x{}", bounds.width, bounds.height);
        self.bounds = bounds;
    }

    /// Route a store side effect to the hazard it names
    pub(crate) fn apply_owner_effect(&mut self, effect: OwnerEffect) {
        let key = effect.owner();
        let Some(handle) = self.hazards.handle_at(key.0 as usize) else {
            return;
        };
        if let Some(hazard) = self.hazards.get_mut(handle) {
            hazard.actor.apply_effect(effect);
        }
    }

    pub(crate) fn remove_entity(&mut self, entity: EntityRef) {
        if let Some(pos) = self.entities.iter().position(|&e| e == entity) {
            self.entities.remove(pos);
        }
    }

    pub(crate) fn recycle_projectile(&mut self, handle: PoolHandle) {
        self.projectiles.release(handle);
        self.remove_entity(EntityRef::Projectile(handle));
    }

    pub(crate) fn recycle_hazard(&mut self, handle: PoolHandle) {
        self.hazards.release(handle);
        self.remove_entity(EntityRef::Hazard(handle));
    }

    pub fn hazard_position(&self, handle: PoolHandle) -> Vec2 {
        self.hazards
            .get(handle)
            .map_or(Vec2::ZERO, |h| h.actor.position)
    }

    /// Shapes for every live entity, in live-list order
    pub fn drawables(&self) -> Vec<DrawShape> {
        self.entities
            .iter()
            .filter_map(|entity| match *entity {
                EntityRef::Ship => Some(self.ship.actor.draw_shape()),
                EntityRef::Zone => Some(self.zone.draw_shape()),
                EntityRef::Projectile(h) => self.projectiles.get(h).map(Actor::draw_shape),
                EntityRef::Hazard(h) => self.hazards.get(h).map(|hazard| DrawShape {
                    rotation: self.store.rotation(hazard.row),
                    ..hazard.actor.draw_shape()
                }),
            })
            .collect()
    }

    pub fn hud(&self) -> HudSnapshot {
        let threshold = self.tuning.zone_completion_time;
        let elapsed = self.zone_timer.elapsed();
        HudSnapshot {
            phase: self.phase,
            score: self.score,
            playtime_secs: self.playtime.elapsed() as u64,
            zones_completed: self.zones_completed,
            zone_time_remaining: (threshold - elapsed).max(0.0),
            ship_in_zone: self.ship_in_zone,
            results: self.results.clone(),
            zone_countdown: (1.0 + threshold - elapsed) as i32,
        }
    }
}

impl Drop for GameState {
    fn drop(&mut self) {
        for (_, hazard) in self.hazards.iter_all() {
            self.store.destroy(hazard.row);
        }
    }
}
