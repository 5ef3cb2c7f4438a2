//! Key sampling for the fixed-rate command timers.
//!
//! Keys are polled on every timer tick rather than tracked through
//! keydown/keyup events, so a key-up swallowed by a focus change cannot
//! leave a phantom held key behind.

use macroquad::prelude::{is_key_down, KeyCode};
use protocol::{Position, PLAYER_SPEED};

pub struct InputManager;

impl InputManager {
    pub fn new() -> Self {
        Self
    }

    /// Current movement command, or `None` when no direction is held.
    pub fn sample_movement(&self) -> Option<Position> {
        movement_vector(
            is_key_down(KeyCode::Up) || is_key_down(KeyCode::W),
            is_key_down(KeyCode::Down) || is_key_down(KeyCode::S),
            is_key_down(KeyCode::Left) || is_key_down(KeyCode::A),
            is_key_down(KeyCode::Right) || is_key_down(KeyCode::D),
        )
    }

    pub fn fire_held(&self) -> bool {
        is_key_down(KeyCode::Space)
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

pub fn movement_vector(up: bool, down: bool, left: bool, right: bool) -> Option<Position> {
    let mut movement = Position { x: 0.0, y: 0.0 };
    if up {
        movement.y -= PLAYER_SPEED;
    }
    if down {
        movement.y += PLAYER_SPEED;
    }
    if left {
        movement.x -= PLAYER_SPEED;
    }
    if right {
        movement.x += PLAYER_SPEED;
    }

    if movement.x == 0.0 && movement.y == 0.0 {
        None
    } else {
        Some(movement)
    }
}
