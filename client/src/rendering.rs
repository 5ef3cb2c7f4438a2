//! Draws the latest snapshot: camera anchored on the local player, clamped
//! to the map bounds.

use macroquad::prelude::*;
use protocol::{
    Player, BULLET_SIZE, MAP_HEIGHT, MAP_WIDTH, PLAYER_SIZE, VIEWPORT_HEIGHT, VIEWPORT_WIDTH,
};

use crate::game::GameState;

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// Paints one frame. Without the local player there is no camera
    /// anchor, so the tick draws nothing.
    pub fn render(&self, state: &GameState, local_id: Option<i32>) {
        let Some(local) = state.players.iter().find(|p| Some(p.id) == local_id) else {
            return;
        };

        let camera_x = (local.position.x as f32 - VIEWPORT_WIDTH / 2.0)
            .clamp(0.0, MAP_WIDTH as f32 - VIEWPORT_WIDTH);
        let camera_y = (local.position.y as f32 - VIEWPORT_HEIGHT / 2.0)
            .clamp(0.0, MAP_HEIGHT as f32 - VIEWPORT_HEIGHT);

        clear_background(Color::from_rgba(26, 28, 44, 255));

        draw_rectangle_lines(
            -camera_x,
            -camera_y,
            MAP_WIDTH as f32,
            MAP_HEIGHT as f32,
            4.0,
            Color::from_rgba(79, 70, 229, 255),
        );

        for patch in &state.map.grass_patches {
            draw_circle(
                patch.x as f32 - camera_x,
                patch.y as f32 - camera_y,
                patch.radius as f32,
                Color::from_rgba(55, 65, 81, 160),
            );
        }

        for obstacle in &state.map.obstacles {
            draw_rectangle(
                obstacle.x as f32 - camera_x,
                obstacle.y as f32 - camera_y,
                obstacle.width as f32,
                obstacle.height as f32,
                Color::from_rgba(71, 85, 105, 255),
            );
        }

        for bullet in &state.bullets {
            draw_circle(
                bullet.position.x as f32 - camera_x,
                bullet.position.y as f32 - camera_y,
                BULLET_SIZE,
                Color::from_rgba(250, 204, 21, 255),
            );
        }

        for player in &state.players {
            self.draw_player(player, camera_x, camera_y, Some(player.id) == local_id);
        }
    }

    fn draw_player(&self, player: &Player, camera_x: f32, camera_y: f32, is_local: bool) {
        let x = player.position.x as f32 - camera_x;
        let y = player.position.y as f32 - camera_y;

        let mut color = parse_hex_color(&player.color).unwrap_or(WHITE);
        if player.in_grass {
            color.a = 0.45;
        }

        draw_circle(x, y, PLAYER_SIZE, color);
        if is_local {
            draw_circle_lines(x, y, PLAYER_SIZE + 2.0, 2.0, WHITE);
        }

        // Facing indicator
        let facing_x = x + player.rotation.cos() as f32 * PLAYER_SIZE;
        let facing_y = y + player.rotation.sin() as f32 * PLAYER_SIZE;
        draw_line(x, y, facing_x, facing_y, 2.0, WHITE);

        // Health bar above the player
        let health = player.health.clamp(0, 100) as f32 / 100.0;
        let bar_width = PLAYER_SIZE * 2.0;
        draw_rectangle(
            x - bar_width / 2.0,
            y - PLAYER_SIZE - 12.0,
            bar_width,
            4.0,
            Color::from_rgba(51, 51, 51, 255),
        );
        draw_rectangle(
            x - bar_width / 2.0,
            y - PLAYER_SIZE - 12.0,
            bar_width * health,
            4.0,
            if health > 0.5 { GREEN } else { RED },
        );

        draw_text(&player.name, x - bar_width / 2.0, y - PLAYER_SIZE - 16.0, 16.0, WHITE);
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    // Boundary-checked slicing: colors come from the peer roster, so a
    // multi-byte string must come back as None, not a panic.
    let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
    let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
    let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
    Some(Color::from_rgba(r, g, b, 255))
}
