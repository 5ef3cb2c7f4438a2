//! Lobby roster: who is in the room and who is ready, before the match
//! starts.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use protocol::{Event, Player};

use crate::session::Session;

#[derive(Debug, Clone, Default)]
pub struct LobbyState {
    pub players: Vec<Player>,
}

impl LobbyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join delivers the full roster; it replaces whatever we had.
    pub fn apply_roster(&mut self, players: &[Player]) {
        self.players = players.to_vec();
    }

    pub fn apply_ready(&mut self, id: Option<i32>, is_ready: Option<bool>) {
        let (Some(id), Some(is_ready)) = (id, is_ready) else {
            return;
        };
        if let Some(player) = self.players.iter_mut().find(|p| p.id == id) {
            player.is_ready = is_ready;
        }
    }

    pub fn remove_player(&mut self, id: i32) {
        self.players.retain(|p| p.id != id);
    }

    pub fn ready_count(&self) -> usize {
        self.players.iter().filter(|p| p.counts_ready()).count()
    }

    /// A match needs at least two players, every one ready (host exempt).
    pub fn can_start(&self) -> bool {
        self.players.len() >= 2 && self.players.iter().all(|p| p.counts_ready())
    }
}

pub struct LobbySignals {
    pub started: Rc<Cell<bool>>,
    pub kicked: Rc<Cell<bool>>,
}

pub fn subscribe_lobby_events(
    session: &mut Session,
    lobby: &Rc<RefCell<LobbyState>>,
) -> LobbySignals {
    let identity = session.identity_handle();
    let signals = LobbySignals {
        started: Rc::new(Cell::new(false)),
        kicked: Rc::new(Cell::new(false)),
    };

    let join_lobby = Rc::clone(lobby);
    session.on_event(Event::Join, move |message| {
        if let Some(payload) = &message.payload {
            join_lobby.borrow_mut().apply_roster(&payload.players);
        }
    });

    let ready_lobby = Rc::clone(lobby);
    session.on_event(Event::Ready, move |message| {
        let is_ready = message.payload.as_ref().and_then(|p| p.is_ready);
        ready_lobby.borrow_mut().apply_ready(message.id, is_ready);
    });

    let started = Rc::clone(&signals.started);
    session.on_event(Event::Start, move |_| started.set(true));

    let kick_lobby = Rc::clone(lobby);
    let kicked = Rc::clone(&signals.kicked);
    session.on_event(Event::Kick, move |message| {
        let Some(id) = message.id else {
            return;
        };
        if identity.get() == Some(id) {
            kicked.set(true);
            return;
        }
        kick_lobby.borrow_mut().remove_player(id);
    });

    signals
}

pub fn unsubscribe_lobby_events(session: &mut Session) {
    for event in [Event::Join, Event::Ready, Event::Start, Event::Kick] {
        session.off_event(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster_of(ids: &[i32]) -> Vec<Player> {
        ids.iter()
            .map(|id| Player::new(*id, format!("P{id}"), "#aaaaaa"))
            .collect()
    }

    #[test]
    fn host_counts_ready_without_toggling() {
        let mut lobby = LobbyState::new();
        lobby.apply_roster(&roster_of(&[0, 1]));

        assert_eq!(lobby.ready_count(), 1);
        assert!(!lobby.can_start());

        lobby.apply_ready(Some(1), Some(true));
        assert_eq!(lobby.ready_count(), 2);
        assert!(lobby.can_start());
    }

    #[test]
    fn host_ready_flag_is_irrelevant_for_all_ready() {
        let mut lobby = LobbyState::new();
        let mut players = roster_of(&[0, 1]);
        players[1].is_ready = true;
        lobby.apply_roster(&players);

        // Host never toggled ready, the room can still start.
        assert!(!lobby.players[0].is_ready);
        assert!(lobby.can_start());
    }

    #[test]
    fn a_single_player_cannot_start() {
        let mut lobby = LobbyState::new();
        lobby.apply_roster(&roster_of(&[0]));
        assert!(!lobby.can_start());
    }

    #[test]
    fn ready_with_missing_fields_is_ignored() {
        let mut lobby = LobbyState::new();
        lobby.apply_roster(&roster_of(&[0, 1]));

        lobby.apply_ready(None, Some(true));
        lobby.apply_ready(Some(1), None);

        assert_eq!(lobby.ready_count(), 1);
    }

    #[test]
    fn unready_takes_a_player_back_out() {
        let mut lobby = LobbyState::new();
        lobby.apply_roster(&roster_of(&[0, 1]));

        lobby.apply_ready(Some(1), Some(true));
        lobby.apply_ready(Some(1), Some(false));

        assert!(!lobby.can_start());
    }

    #[test]
    fn roster_replacement_and_removal() {
        let mut lobby = LobbyState::new();
        lobby.apply_roster(&roster_of(&[0, 1, 2]));
        lobby.apply_roster(&roster_of(&[0, 2]));
        assert_eq!(lobby.players.len(), 2);

        lobby.remove_player(2);
        assert_eq!(lobby.players.len(), 1);
        assert_eq!(lobby.players[0].id, 0);
    }
}
