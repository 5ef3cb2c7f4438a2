//! Lobby and match run loops: one task driving the socket, the command
//! timers, and the render cadence through `tokio::select!`.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use log::info;
use macroquad::prelude::next_frame;
use protocol::{BULLET_FIRE_INTERVAL_MS, HOST_ID, MOVEMENT_UPDATE_INTERVAL_MS};
use tokio::time::interval;

use crate::game::{subscribe_match_events, unsubscribe_match_events, GameState};
use crate::input::InputManager;
use crate::lobby::{subscribe_lobby_events, unsubscribe_lobby_events, LobbyState};
use crate::network::SocketStatus;
use crate::rendering::Renderer;
use crate::session::Session;

const RENDER_INTERVAL_MS: u64 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LobbyOutcome {
    Started,
    Kicked,
    Disconnected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Kicked { kills: i32 },
    Disconnected,
}

/// Sits in the lobby until the match starts, we get kicked, or the
/// connection dies. The host fires Start once everyone is ready.
pub async fn run_lobby(session: &mut Session) -> LobbyOutcome {
    let lobby = Rc::new(RefCell::new(LobbyState::new()));
    let signals = subscribe_lobby_events(session, &lobby);

    session.set_player_ready(true).await;

    let mut start_sent = false;
    let outcome = loop {
        if signals.kicked.get() {
            break LobbyOutcome::Kicked;
        }
        if signals.started.get() {
            break LobbyOutcome::Started;
        }

        if !start_sent && session.player_id() == Some(HOST_ID) && lobby.borrow().can_start() {
            info!("all {} players ready, starting", lobby.borrow().players.len());
            session.start_game().await;
            start_sent = true;
        }

        if session.poll().await == SocketStatus::Closed {
            break LobbyOutcome::Disconnected;
        }
    };

    unsubscribe_lobby_events(session);
    outcome
}

enum Tick {
    Frame(SocketStatus),
    Move,
    Fire,
    Render,
}

/// The in-match loop. Inbound frames fold into the shared snapshot through
/// the dispatcher; the render tick reads the latest snapshot on its own
/// cadence, never paced by frame arrival.
pub async fn run_match(session: &mut Session) -> MatchOutcome {
    let state = Rc::new(RefCell::new(GameState::new()));
    let signals = subscribe_match_events(session, &state);
    let renderer = Renderer::new();
    let input = InputManager::new();

    let mut move_timer = interval(Duration::from_millis(MOVEMENT_UPDATE_INTERVAL_MS));
    let mut fire_timer = interval(Duration::from_millis(BULLET_FIRE_INTERVAL_MS));
    let mut render_timer = interval(Duration::from_millis(RENDER_INTERVAL_MS));

    let outcome = loop {
        if signals.local_kick.get() {
            break MatchOutcome::Kicked {
                kills: signals.kick_kills.get(),
            };
        }

        let tick = tokio::select! {
            status = session.poll() => Tick::Frame(status),
            _ = move_timer.tick() => Tick::Move,
            _ = fire_timer.tick() => Tick::Fire,
            _ = render_timer.tick() => Tick::Render,
        };

        match tick {
            Tick::Frame(SocketStatus::Closed) => break MatchOutcome::Disconnected,
            Tick::Frame(SocketStatus::Active) => {}
            Tick::Move => {
                if let Some(movement) = input.sample_movement() {
                    session.move_player(movement).await;
                }
            }
            Tick::Fire => {
                if input.fire_held() {
                    session.shoot().await;
                }
            }
            Tick::Render => {
                renderer.render(&state.borrow(), session.player_id());
                next_frame().await;
            }
        }
    };

    unsubscribe_match_events(session);
    outcome
}
