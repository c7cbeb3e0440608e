//! Input consumers
//!
//! Bus handlers cannot touch the simulation directly, so they latch what they
//! see into a shared [`TickInput`]. The driver reads the latch every substep
//! and clears one-shot commands only after a tick has consumed them.

use std::sync::Arc;

use glam::Vec2;
use parking_lot::Mutex;

use crate::events::{EventBus, HandlerId, Key, KeyAction, KeyEvent, MouseAction, MouseButton, MouseEvent};

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Forward (+1) / reverse (-1) thrust, held
    pub thrust: f32,
    /// Clockwise (+1) / counter-clockwise (-1) turn, held
    pub turn: f32,
    /// Latest pointer position in window coordinates
    pub aim: Option<Vec2>,
    /// Fire a projectile toward `aim` (one-shot)
    pub fire: bool,
    /// Pause request (one-shot)
    pub pause: bool,
    /// Resume request, any key press (one-shot)
    pub resume: bool,
}

impl TickInput {
    /// Copy of this input with one-shot commands cleared
    pub fn held(&self) -> Self {
        Self {
            fire: false,
            pause: false,
            resume: false,
            ..self.clone()
        }
    }
}

/// Ship control: arrow keys / WASD drive thrust and turning
pub fn apply_ship_key(input: &mut TickInput, event: &KeyEvent) {
    match (event.action, event.key) {
        (KeyAction::Press, Key::Up | Key::W) => input.thrust = 1.0,
        (KeyAction::Press, Key::Down | Key::S) => input.thrust = -1.0,
        (KeyAction::Press, Key::Left | Key::A) => input.turn = -1.0,
        (KeyAction::Press, Key::Right | Key::D) => input.turn = 1.0,
        // Releasing one direction must not cancel the opposite one
        (KeyAction::Release, Key::Up | Key::W) if input.thrust > 0.0 => input.thrust = 0.0,
        (KeyAction::Release, Key::Down | Key::S) if input.thrust < 0.0 => input.thrust = 0.0,
        (KeyAction::Release, Key::Left | Key::A) if input.turn < 0.0 => input.turn = 0.0,
        (KeyAction::Release, Key::Right | Key::D) if input.turn > 0.0 => input.turn = 0.0,
        _ => {}
    }
}

/// Pause control: Escape pauses, any key press resumes
pub fn apply_pause_key(input: &mut TickInput, event: &KeyEvent) {
    if event.action != KeyAction::Press {
        return;
    }
    if event.key == Key::Escape {
        input.pause = true;
    }
    input.resume = true;
}

/// Fire control: track the pointer, left click fires
pub fn apply_mouse(input: &mut TickInput, event: &MouseEvent) {
    match event.action {
        MouseAction::Move => input.aim = Some(event.position),
        MouseAction::ButtonPress => {
            input.aim = Some(event.position);
            if event.button == Some(MouseButton::Left) {
                input.fire = true;
            }
        }
        MouseAction::ButtonRelease => {}
    }
}

/// Shared latch written by bus handlers and drained by the driver
#[derive(Debug, Clone, Default)]
pub struct InputLatch(Arc<Mutex<TickInput>>);

impl InputLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&self, f: impl FnOnce(&mut TickInput)) {
        f(&mut *self.0.lock());
    }

    /// Current input; one-shot commands are consumed
    pub fn take(&self) -> TickInput {
        let mut latched = self.0.lock();
        let frame = latched.clone();
        *latched = latched.held();
        frame
    }

    pub fn peek(&self) -> TickInput {
        self.0.lock().clone()
    }

    /// Drop fire/pause/resume once a tick has seen them
    pub fn clear_one_shots(&self) {
        let mut latched = self.0.lock();
        *latched = latched.held();
    }
}

/// Subscribes ship, pause and fire control to the bus; unsubscribes on drop
#[derive(Debug)]
pub struct InputRouter {
    bus: Arc<EventBus>,
    latch: InputLatch,
    ship_sub: HandlerId,
    pause_sub: HandlerId,
    fire_sub: HandlerId,
}

impl InputRouter {
    pub fn attach(bus: Arc<EventBus>) -> Self {
        let latch = InputLatch::new();

        let ship_latch = latch.clone();
        let ship_sub = bus.subscribe::<KeyEvent>(move |event| {
            ship_latch.update(|input| apply_ship_key(input, event));
        });

        let pause_latch = latch.clone();
        let pause_sub = bus.subscribe::<KeyEvent>(move |event| {
            pause_latch.update(|input| apply_pause_key(input, event));
        });

        let fire_latch = latch.clone();
        let fire_sub = bus.subscribe::<MouseEvent>(move |event| {
            fire_latch.update(|input| apply_mouse(input, event));
        });

        log::debug!("Input router attached");
        Self {
            bus,
            latch,
            ship_sub,
            pause_sub,
            fire_sub,
        }
    }

    pub fn latch(&self) -> &InputLatch {
        &self.latch
    }
}

impl Drop for InputRouter {
    fn drop(&mut self) {
        self.bus.unsubscribe::<KeyEvent>(self.ship_sub);
        self.bus.unsubscribe::<KeyEvent>(self.pause_sub);
        self.bus.unsubscribe::<MouseEvent>(self.fire_sub);
    }
}
