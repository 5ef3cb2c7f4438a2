//! Local game state: a non-authoritative mirror of server-announced truth,
//! folded from domain events and read by the renderer.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use protocol::{Bullet, Event, GameMap, Payload, Player};

use crate::session::Session;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameState {
    pub players: Vec<Player>,
    pub bullets: Vec<Bullet>,
    pub map: GameMap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KickOutcome {
    /// The local session is over; the caller navigates away. The reducer
    /// performs no mutation for this branch.
    LocalPlayer { kills: i32 },
    OtherPlayer,
    Ignored,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole snapshot. The only event that establishes the map.
    pub fn apply_spawn(&mut self, payload: &Payload) {
        let Some(map) = payload.map.clone() else {
            return;
        };
        *self = GameState {
            players: payload.players.clone(),
            bullets: Vec::new(),
            map,
        };
    }

    pub fn apply_kick(
        &mut self,
        id: Option<i32>,
        local_id: Option<i32>,
        kills: i32,
    ) -> KickOutcome {
        let Some(id) = id else {
            return KickOutcome::Ignored;
        };
        if local_id == Some(id) {
            return KickOutcome::LocalPlayer { kills };
        }
        self.players.retain(|p| p.id != id);
        KickOutcome::OtherPlayer
    }

    /// Upsert keyed by bullet id; an `expired` bullet is removed instead.
    pub fn apply_shoot(&mut self, payload: &Payload) {
        let Some(bullet) = payload.bullet.as_ref() else {
            return;
        };
        self.bullets.retain(|b| b.id != bullet.id);
        if !bullet.expired {
            self.bullets.push(bullet.clone());
        }
    }

    /// Partial moves are rejected whole: `position`, `rotation`, and
    /// `in_grass` must all be present or the player record stays untouched.
    pub fn apply_move(&mut self, id: Option<i32>, payload: &Payload) {
        let (Some(id), Some(position), Some(rotation), Some(in_grass)) =
            (id, payload.position, payload.rotation, payload.in_grass)
        else {
            return;
        };
        if let Some(player) = self.players.iter_mut().find(|p| p.id == id) {
            player.position = position;
            player.rotation = rotation;
            player.in_grass = in_grass;
        }
    }

    pub fn apply_hit(&mut self, id: Option<i32>, payload: &Payload) {
        let (Some(id), Some(health)) = (id, payload.health) else {
            return;
        };
        if let Some(player) = self.players.iter_mut().find(|p| p.id == id) {
            player.health = health;
        }
    }
}

/// Flags raised by event callbacks for the run loop to act on.
pub struct MatchSignals {
    pub local_kick: Rc<Cell<bool>>,
    pub kick_kills: Rc<Cell<i32>>,
}

/// Wires the five match events into the shared snapshot. The snapshot is the
/// single slot the render tick reads; callbacks replace its contents, the
/// renderer only ever borrows the latest.
pub fn subscribe_match_events(
    session: &mut Session,
    state: &Rc<RefCell<GameState>>,
) -> MatchSignals {
    let identity = session.identity_handle();
    let signals = MatchSignals {
        local_kick: Rc::new(Cell::new(false)),
        kick_kills: Rc::new(Cell::new(0)),
    };

    let spawn_state = Rc::clone(state);
    session.on_event(Event::Spawn, move |message| {
        if let Some(payload) = &message.payload {
            spawn_state.borrow_mut().apply_spawn(payload);
        }
    });

    let kick_state = Rc::clone(state);
    let local_kick = Rc::clone(&signals.local_kick);
    let kick_kills = Rc::clone(&signals.kick_kills);
    session.on_event(Event::Kick, move |message| {
        let kills = message
            .payload
            .as_ref()
            .and_then(|p| p.kills)
            .unwrap_or(0);
        let outcome = kick_state
            .borrow_mut()
            .apply_kick(message.id, identity.get(), kills);
        if let KickOutcome::LocalPlayer { kills } = outcome {
            kick_kills.set(kills);
            local_kick.set(true);
        }
    });

    let shoot_state = Rc::clone(state);
    session.on_event(Event::Shoot, move |message| {
        if let Some(payload) = &message.payload {
            shoot_state.borrow_mut().apply_shoot(payload);
        }
    });

    let move_state = Rc::clone(state);
    session.on_event(Event::Move, move |message| {
        if let Some(payload) = &message.payload {
            move_state.borrow_mut().apply_move(message.id, payload);
        }
    });

    let hit_state = Rc::clone(state);
    session.on_event(Event::Hit, move |message| {
        if let Some(payload) = &message.payload {
            hit_state.borrow_mut().apply_hit(message.id, payload);
        }
    });

    signals
}

pub fn unsubscribe_match_events(session: &mut Session) {
    for event in [
        Event::Spawn,
        Event::Kick,
        Event::Shoot,
        Event::Move,
        Event::Hit,
    ] {
        session.off_event(event);
    }
}
