//! Session facade: room lifecycle over HTTP, command emitters over the
//! socket, and the one piece of durable client identity.

use std::cell::Cell;
use std::rc::Rc;

use log::{info, warn};
use protocol::{Event, Message, Payload, Position, MAX_PLAYER_NAME_LEN};
use serde::{Deserialize, Serialize};

use crate::network::{SocketStatus, Transport};

/// Bounded immediate retries on 400-class responses, no backoff.
pub const CREATE_ROOM_RETRIES: u32 = 3;
pub const JOIN_ROOM_RETRIES: u32 = 2;

#[derive(Debug, Clone, Serialize)]
pub struct PlayerProfile {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Color")]
    pub color: String,
}

impl PlayerProfile {
    pub fn new(name: &str, color: &str) -> Self {
        Self {
            name: name.chars().take(MAX_PLAYER_NAME_LEN).collect(),
            color: color.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreateRoomResponse {
    #[serde(rename = "playerId")]
    player_id: i32,
    #[serde(rename = "roomId")]
    room_id: u16,
}

#[derive(Debug, Deserialize)]
struct JoinRoomResponse {
    #[serde(rename = "playerId")]
    player_id: i32,
}

/// Exactly one of these exists per running client; it is constructed at the
/// application root and passed down explicitly.
pub struct Session {
    identity: Rc<Cell<Option<i32>>>,
    transport: Transport,
    http: reqwest::Client,
    http_base: String,
    ws_base: String,
}

impl Session {
    pub fn new(http_base: impl Into<String>, ws_base: impl Into<String>) -> Self {
        let identity = Rc::new(Cell::new(None));
        Self {
            transport: Transport::new(Rc::clone(&identity)),
            identity,
            http: reqwest::Client::new(),
            http_base: http_base.into(),
            ws_base: ws_base.into(),
        }
    }

    pub fn player_id(&self) -> Option<i32> {
        self.identity.get()
    }

    /// Shared read handle for the reducer and render path. They read it,
    /// they never own it.
    pub fn identity_handle(&self) -> Rc<Cell<Option<i32>>> {
        Rc::clone(&self.identity)
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// Creates a room and connects to it. `None` means "no room": retries
    /// exhausted or any other expected failure. Never panics, never errors.
    pub async fn create_room(&mut self, profile: &PlayerProfile, retries: u32) -> Option<u16> {
        let url = format!("{}/api/rooms/create", self.http_base);

        for attempt in 0..=retries {
            let response = match self.http.post(&url).json(profile).send().await {
                Ok(response) => response,
                Err(err) => {
                    warn!("room create request failed: {err}");
                    return None;
                }
            };

            let status = response.status();
            if status.is_success() {
                let body: CreateRoomResponse = match response.json().await {
                    Ok(body) => body,
                    Err(err) => {
                        warn!("malformed room create response: {err}");
                        return None;
                    }
                };
                return self.enter_room(body.room_id, body.player_id).await;
            }

            if status.is_client_error() && attempt < retries {
                info!("room create rejected ({status}), retrying");
                continue;
            }

            warn!("room create failed: {status}");
            return None;
        }

        None
    }

    /// Joins an existing room; echoes the room id back for navigation.
    /// Room full, room unknown, and transient conflicts all surface as a
    /// 400-class status and end in `None` once the budget is spent.
    pub async fn join_room(
        &mut self,
        profile: &PlayerProfile,
        room_id: u16,
        retries: u32,
    ) -> Option<u16> {
        let url = format!("{}/api/rooms/join?roomId={room_id}", self.http_base);

        for attempt in 0..=retries {
            let response = match self.http.post(&url).json(profile).send().await {
                Ok(response) => response,
                Err(err) => {
                    warn!("room join request failed: {err}");
                    return None;
                }
            };

            let status = response.status();
            if status.is_success() {
                let body: JoinRoomResponse = match response.json().await {
                    Ok(body) => body,
                    Err(err) => {
                        warn!("malformed room join response: {err}");
                        return None;
                    }
                };
                return self.enter_room(room_id, body.player_id).await;
            }

            if status.is_client_error() && attempt < retries {
                info!("room join rejected ({status}), retrying");
                continue;
            }

            warn!("room join failed: {status}");
            return None;
        }

        None
    }

    async fn enter_room(&mut self, room_id: u16, player_id: i32) -> Option<u16> {
        self.identity.set(Some(player_id));
        if let Err(err) = self.transport.connect(&self.ws_base, room_id, player_id).await {
            warn!("socket connect failed: {err}");
            self.identity.set(None);
            return None;
        }
        Some(room_id)
    }

    /// Safe to call when not connected, so navigation can always run it.
    pub async fn leave_room(&mut self) {
        self.transport.disconnect().await;
        self.identity.set(None);
    }

    pub async fn set_player_ready(&mut self, is_ready: bool) {
        let payload = Payload {
            is_ready: Some(is_ready),
            ..Payload::default()
        };
        self.transport.send(Event::Ready, payload, None).await;
    }

    pub async fn start_game(&mut self) {
        self.transport.send(Event::Start, Payload::default(), None).await;
    }

    pub async fn kick_player(&mut self, player_id: i32) {
        self.transport
            .send(Event::Kick, Payload::default(), Some(player_id))
            .await;
    }

    pub async fn move_player(&mut self, movement: Position) {
        let payload = Payload {
            position: Some(movement),
            ..Payload::default()
        };
        self.transport.send(Event::Move, payload, None).await;
    }

    /// Empty payload; the server computes the bullet from our position.
    pub async fn shoot(&mut self) {
        self.transport.send(Event::Shoot, Payload::default(), None).await;
    }

    pub async fn poll(&mut self) -> SocketStatus {
        self.transport.poll().await
    }

    /// The only entry point other components use to observe server state.
    pub fn on_event<F>(&mut self, event: Event, callback: F)
    where
        F: FnMut(&Message) + 'static,
    {
        self.transport.dispatcher_mut().subscribe(event, callback);
    }

    pub fn off_event(&mut self, event: Event) {
        self.transport.dispatcher_mut().unsubscribe(event);
    }
}
