//! In-process publish/subscribe event bus
//!
//! Events form a closed set ([`Event`]) and handlers are stored in a dispatch
//! table keyed by [`EventKind`]. Subscribing is typed through [`BusEvent`],
//! so a `KeyEvent` handler only ever sees key events.
//!
//! `publish` copies the handler list under the lock and invokes the copy
//! after releasing it. Handlers may therefore subscribe or unsubscribe from
//! inside a callback; such changes only apply to later publishes.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use glam::Vec2;
use parking_lot::Mutex;

use crate::sim::GamePhase;

/// Identifier returned by [`EventBus::subscribe`]
pub type HandlerId = u64;

/// Keyboard keys the simulation cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    W,
    A,
    S,
    D,
    Space,
    Enter,
    Escape,
    /// Any other key, by platform scancode
    Other(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Press,
    Release,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub action: KeyAction,
}

impl KeyEvent {
    pub fn press(key: Key) -> Self {
        Self {
            key,
            action: KeyAction::Press,
        }
    }

    pub fn release(key: Key) -> Self {
        Self {
            key,
            action: KeyAction::Release,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseAction {
    Move,
    ButtonPress,
    ButtonRelease,
}

/// Pointer event in window coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEvent {
    pub position: Vec2,
    /// `None` for moves
    pub button: Option<MouseButton>,
    pub action: MouseAction,
}

impl MouseEvent {
    pub fn moved(position: Vec2) -> Self {
        Self {
            position,
            button: None,
            action: MouseAction::Move,
        }
    }

    pub fn pressed(position: Vec2, button: MouseButton) -> Self {
        Self {
            position,
            button: Some(button),
            action: MouseAction::ButtonPress,
        }
    }

    pub fn released(position: Vec2, button: MouseButton) -> Self {
        Self {
            position,
            button: Some(button),
            action: MouseAction::ButtonRelease,
        }
    }
}

/// Things that happened inside the simulation (sound/UI triggers)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    ProjectileFired { position: Vec2 },
    /// A level-1 hazard was hit and recycled
    HazardDestroyed { position: Vec2, level: u32 },
    /// A hazard was hit and split; `fragment` is false when the pool was empty
    HazardSplit { position: Vec2, level: u32, fragment: bool },
    ZoneCompleted { zones_completed: u32 },
}

/// Dispatch table key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Key,
    Mouse,
    Game,
}

/// Closed set of everything the bus can carry
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Game(GameEvent),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Key(_) => EventKind::Key,
            Event::Mouse(_) => EventKind::Mouse,
            Event::Game(_) => EventKind::Game,
        }
    }
}

/// Typed view of one [`Event`] variant
pub trait BusEvent: Copy + Send + Sync + 'static {
    const KIND: EventKind;

    fn into_event(self) -> Event;

    fn from_event(event: &Event) -> Option<&Self>;
}

impl BusEvent for KeyEvent {
    const KIND: EventKind = EventKind::Key;

    fn into_event(self) -> Event {
        Event::Key(self)
    }

    fn from_event(event: &Event) -> Option<&Self> {
        match event {
            Event::Key(e) => Some(e),
            _ => None,
        }
    }
}

impl BusEvent for MouseEvent {
    const KIND: EventKind = EventKind::Mouse;

    fn into_event(self) -> Event {
        Event::Mouse(self)
    }

    fn from_event(event: &Event) -> Option<&Self> {
        match event {
            Event::Mouse(e) => Some(e),
            _ => None,
        }
    }
}

impl BusEvent for GameEvent {
    const KIND: EventKind = EventKind::Game;

    fn into_event(self) -> Event {
        Event::Game(self)
    }

    fn from_event(event: &Event) -> Option<&Self> {
        match event {
            Event::Game(e) => Some(e),
            _ => None,
        }
    }
}

type Handler = Arc<dyn Fn(&Event) + Send + Sync>;

/// Kind-indexed subscriber registry
pub struct EventBus {
    handlers: Mutex<HashMap<EventKind, Vec<(HandlerId, Handler)>>>,
    next_id: AtomicU64,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let handlers = self.handlers.lock();
        f.debug_struct("EventBus")
            .field(
                "subscribers",
                &handlers.iter().map(|(k, v)| (*k, v.len())).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            handlers: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a handler for events of type `E`
    pub fn subscribe<E: BusEvent>(&self, handler: impl Fn(&E) + Send + Sync + 'static) -> HandlerId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let erased: Handler = Arc::new(move |event: &Event| {
            if let Some(e) = E::from_event(event) {
                handler(e);
            }
        });
        self.handlers
            .lock()
            .entry(E::KIND)
            .or_default()
            .push((id, erased));
        id
    }

    /// Remove a handler; returns false if it was not registered for `E`
    pub fn unsubscribe<E: BusEvent>(&self, id: HandlerId) -> bool {
        self.unsubscribe_kind(E::KIND, id)
    }

    pub fn unsubscribe_kind(&self, kind: EventKind, id: HandlerId) -> bool {
        let mut handlers = self.handlers.lock();
        let Some(list) = handlers.get_mut(&kind) else {
            return false;
        };
        let before = list.len();
        list.retain(|(handler_id, _)| *handler_id != id);
        list.len() != before
    }

    /// Deliver `event` to every handler registered at the time of the call
    pub fn publish<E: BusEvent>(&self, event: E) {
        let event = event.into_event();
        let snapshot: Vec<Handler> = {
            let handlers = self.handlers.lock();
            match handlers.get(&event.kind()) {
                Some(list) => list.iter().map(|(_, h)| Arc::clone(h)).collect(),
                None => return,
            }
        };
        for handler in snapshot {
            handler(&event);
        }
    }

    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.handlers.lock().get(&kind).map_or(0, Vec::len)
    }
}
