//! Wire types shared with the arena server: the binary message envelope,
//! the payload union, and the gameplay constants both sides agree on.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAP_WIDTH: f64 = 2000.0;
pub const MAP_HEIGHT: f64 = 1500.0;
pub const VIEWPORT_WIDTH: f32 = 800.0;
pub const VIEWPORT_HEIGHT: f32 = 600.0;
pub const PLAYER_SIZE: f32 = 25.0;
pub const BULLET_SIZE: f32 = 5.0;
pub const PLAYER_SPEED: f64 = 6.0;
pub const MOVEMENT_UPDATE_INTERVAL_MS: u64 = 16;
pub const BULLET_FIRE_INTERVAL_MS: u64 = 250;
pub const MAX_PLAYER_NAME_LEN: usize = 20;

/// Player id 0 is the room owner: always counted as ready, never kickable
/// by other players, and the only one allowed to start the match.
pub const HOST_ID: i32 = 0;

/// Event tag carried by every envelope. The payload shape is keyed by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Event {
    Join,
    Ready,
    Leave,
    Spawn,
    Move,
    Shoot,
    Hit,
    Kick,
    Start,
    Kills,
    GameOver,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::Join => "Join",
            Event::Ready => "Ready",
            Event::Leave => "Leave",
            Event::Spawn => "Spawn",
            Event::Move => "Move",
            Event::Shoot => "Shoot",
            Event::Hit => "Hit",
            Event::Kick => "Kick",
            Event::Start => "Start",
            Event::Kills => "Kills",
            Event::GameOver => "Game Over",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: i32,
    pub name: String,
    pub color: String,
    pub position: Position,
    pub rotation: f64,
    pub health: i32,
    pub is_ready: bool,
    pub in_grass: bool,
    pub kills: i32,
}

impl Player {
    pub fn new(id: i32, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            color: color.into(),
            position: Position::default(),
            rotation: 0.0,
            health: 100,
            is_ready: false,
            in_grass: false,
            kills: 0,
        }
    }

    pub fn is_host(&self) -> bool {
        self.id == HOST_ID
    }

    /// Ready status as seen by the lobby: the host never has to toggle ready.
    pub fn counts_ready(&self) -> bool {
        self.is_ready || self.is_host()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u64,
    pub position: Position,
    pub rotation: f64,
    pub expired: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrassPatch {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Static per-match terrain, delivered once by the Spawn event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameMap {
    pub grass_patches: Vec<GrassPatch>,
    pub obstacles: Vec<Obstacle>,
}

/// Polymorphic payload. Only the subset relevant to the envelope's event is
/// populated; absent fields stay `None` and never collapse into defaults,
/// so `is_ready: Some(false)` and "field not sent" remain distinguishable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    pub players: Vec<Player>,
    pub map: Option<GameMap>,
    pub bullet: Option<Bullet>,
    pub position: Option<Position>,
    pub rotation: Option<f64>,
    pub in_grass: Option<bool>,
    pub health: Option<i32>,
    pub is_ready: Option<bool>,
    pub kills: Option<i32>,
}

/// One envelope per socket frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub event: Event,
    /// Subject player or entity id, when the event concerns one.
    pub id: Option<i32>,
    /// Client-send timestamp in unix millis, echoed for diagnostics only.
    pub time: Option<u64>,
    pub payload: Option<Payload>,
}

impl Message {
    pub fn encode(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }
}
