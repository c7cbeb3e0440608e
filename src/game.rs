//! Fixed-timestep driver
//!
//! `Game` wires the shared context, the input router and the session state
//! together and turns variable frame times into fixed simulation ticks.

use std::sync::Arc;

use glam::Vec2;

use crate::consts::*;
use crate::events::{EventBus, Key, KeyEvent, MouseButton, MouseEvent};
use crate::sim::{Bounds, DrawShape, GameState, HudSnapshot, InputRouter, tick};
use crate::store::HazardStore;
use crate::tuning::Tuning;

/// Shared services handed to the simulation explicitly
#[derive(Debug, Clone, Default)]
pub struct SimContext {
    pub store: Arc<HazardStore>,
    pub bus: Arc<EventBus>,
}

impl SimContext {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Game instance holding all state
#[derive(Debug)]
pub struct Game {
    ctx: SimContext,
    state: GameState,
    router: InputRouter,
    accumulator: f32,
}

impl Game {
    pub fn new(ctx: SimContext, tuning: Tuning, bounds: Bounds, seed: u64) -> Self {
        let state = GameState::new(&ctx, tuning, bounds, seed);
        let router = InputRouter::attach(Arc::clone(&ctx.bus));
        log::info!("Game created ({}x{})", bounds.width, bounds.height);
        Self {
            ctx,
            state,
            router,
            accumulator: 0.0,
        }
    }

    pub fn context(&self) -> &SimContext {
        &self.ctx
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Run as many fixed ticks as `dt` covers; returns how many ran
    pub fn frame(&mut self, dt: f32) -> u32 {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = self.router.latch().peek();
            tick(&mut self.state, &input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // One-shots stay latched until a tick has run
            self.router.latch().clear_one_shots();
        }
        substeps
    }

    pub fn publish_key(&self, event: KeyEvent) {
        self.ctx.bus.publish(event);
    }

    pub fn press_key(&self, key: Key) {
        self.publish_key(KeyEvent::press(key));
    }

    pub fn release_key(&self, key: Key) {
        self.publish_key(KeyEvent::release(key));
    }

    pub fn publish_mouse(&self, event: MouseEvent) {
        self.ctx.bus.publish(event);
    }

    /// Left click at `position` (window coordinates)
    pub fn click(&self, position: Vec2) {
        self.publish_mouse(MouseEvent::pressed(position, MouseButton::Left));
        self.publish_mouse(MouseEvent::released(position, MouseButton::Left));
    }

    /// Start action from the menu
    pub fn start(&mut self) -> bool {
        self.accumulator = 0.0;
        // Keys held in the menu must not leak into the new session
        self.router.latch().take();
        self.state.start_session()
    }

    pub fn back_to_menu(&mut self) -> bool {
        self.state.return_to_menu()
    }

    pub fn resize(&mut self, bounds: Bounds) {
        self.state.resize(bounds);
    }

    pub fn hud(&self) -> HudSnapshot {
        self.state.hud()
    }

    pub fn drawables(&self) -> Vec<DrawShape> {
        self.state.drawables()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventKind, GameEvent};
    use crate::sim::GamePhase;
    use parking_lot::Mutex;

    fn game() -> Game {
        let tuning = Tuning {
            hazard_spawn_cooldown: 1.0e6,
            ..Tuning::default()
        };
        Game::new(SimContext::new(), tuning, Bounds::new(1280.0, 720.0), 9)
    }

    #[test]
    fn test_frame_substeps_are_capped() {
        let mut game = game();
        game.start();
        assert_eq!(game.frame(1.0 / 60.0 + 1e-4), 2);
        // Clamped to MAX_FRAME_DT, then capped
        assert_eq!(game.frame(5.0), MAX_SUBSTEPS);
    }

    #[test]
    fn test_escape_pauses_and_any_key_resumes() {
        let mut game = game();
        game.start();
        game.press_key(Key::Escape);
        game.frame(SIM_DT * 3.0);
        assert_eq!(game.state().phase, GamePhase::Paused);

        // Still paused with no new press
        game.frame(SIM_DT * 3.0);
        assert_eq!(game.state().phase, GamePhase::Paused);

        game.press_key(Key::Other(7));
        game.frame(SIM_DT * 1.5);
        assert_eq!(game.state().phase, GamePhase::Playing);
    }

    #[test]
    fn test_escape_survives_frame_without_ticks() {
        let mut game = game();
        game.start();
        assert_eq!(game.frame(SIM_DT * 1.5), 1);

        game.press_key(Key::Escape);
        // Leftover 0.5 + 0.25 steps: too short to tick
        assert_eq!(game.frame(SIM_DT * 0.25), 0);
        assert_eq!(game.state().phase, GamePhase::Playing);

        assert_eq!(game.frame(SIM_DT * 0.5), 1);
        assert_eq!(game.state().phase, GamePhase::Paused);
    }

    #[test]
    fn test_click_survives_frame_without_ticks() {
        let mut game = game();
        game.start();
        for _ in 0..20 {
            game.frame(1.0 / 60.0);
        }

        game.click(Vec2::new(1000.0, 360.0));
        // Leftover is always under one step
        assert_eq!(game.frame(0.0), 0);
        assert_eq!(game.state().projectiles.active_len(), 0);
        game.frame(SIM_DT);
        assert_eq!(game.state().projectiles.active_len(), 1);
    }

    #[test]
    fn test_held_thrust_moves_ship() {
        let mut game = game();
        game.start();
        let start = game.state().ship.actor.position;
        game.press_key(Key::W);
        for _ in 0..30 {
            game.frame(1.0 / 60.0);
        }
        assert!(game.state().ship.actor.position.y < start.y);

        game.release_key(Key::W);
        let hud = game.hud();
        assert_eq!(hud.phase, GamePhase::Playing);
    }

    #[test]
    fn test_click_fires_once() {
        let mut game = game();
        game.start();
        // Let the shoot cooldown expire
        for _ in 0..20 {
            game.frame(1.0 / 60.0);
        }
        let fired = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&fired);
        game.context().bus.subscribe::<GameEvent>(move |event| {
            if matches!(event, GameEvent::ProjectileFired { .. }) {
                *counter.lock() += 1;
            }
        });

        game.click(Vec2::new(1000.0, 360.0));
        game.frame(0.05);
        game.frame(0.05);
        assert_eq!(*fired.lock(), 1);
        assert_eq!(game.state().projectiles.active_len(), 1);
    }

    #[test]
    fn test_input_ignored_in_menu() {
        let mut game = game();
        game.press_key(Key::Escape);
        game.frame(0.1);
        assert_eq!(game.state().phase, GamePhase::Menu);
        assert!(game.drawables().is_empty());
        assert!(!game.back_to_menu());
    }

    #[test]
    fn test_drop_cleans_up_context() {
        let ctx = SimContext::new();
        let game = Game::new(ctx.clone(), Tuning::default(), Bounds::new(800.0, 600.0), 1);
        assert_eq!(ctx.store.len(), 50);
        assert_eq!(ctx.bus.subscriber_count(EventKind::Key), 2);
        drop(game);
        assert!(ctx.store.is_empty());
        assert_eq!(ctx.bus.subscriber_count(EventKind::Key), 0);
        assert_eq!(ctx.bus.subscriber_count(EventKind::Mouse), 0);
    }
}
