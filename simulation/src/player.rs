//! Player state and intent handling.

use glam::Vec2;
use thurs_core::{normalize_angle, FrameInput, PlayerView};

use crate::config::PlayerConfig;

/// The user-controlled viewpoint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Player {
    position: Vec2,
    angle: f32,
    fov: f32,
    speed: f32,
    turn_rate: f32,
    look_sensitivity: f32,
    sprint_multiplier: f32,
    strafe_factor: f32,
    mouse_locked: bool,
}

impl Player {
    /// Creates a player at `position` with the configured tuning.
    #[must_use]
    pub fn new(config: &PlayerConfig, position: Vec2) -> Self {
        Self {
            position,
            angle: normalize_angle(config.angle),
            fov: config.fov,
            speed: config.speed,
            turn_rate: config.turn_rate,
            look_sensitivity: config.look_sensitivity,
            sprint_multiplier: config.sprint_multiplier,
            strafe_factor: config.strafe_factor,
            mouse_locked: false,
        }
    }

    /// Position in map units.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Facing angle in `[-π, π)`.
    #[must_use]
    pub const fn angle(&self) -> f32 {
        self.angle
    }

    /// Horizontal field of view.
    #[must_use]
    pub const fn fov(&self) -> f32 {
        self.fov
    }

    /// Whether look deltas are currently applied.
    #[must_use]
    pub const fn mouse_locked(&self) -> bool {
        self.mouse_locked
    }

    /// Projection parameters handed to ray casting and renderers.
    #[must_use]
    pub const fn view(&self) -> PlayerView {
        PlayerView {
            position: self.position,
            angle: self.angle,
            fov: self.fov,
        }
    }

    pub(crate) fn turn(&mut self, input: &FrameInput) {
        if input.toggle_mouse_lock {
            self.mouse_locked = !self.mouse_locked;
            log::debug!("pointer capture {}", if self.mouse_locked { "on" } else { "off" });
        }

        let mut direction = 0.0;
        if input.turn_left {
            direction -= 1.0;
        }
        if input.turn_right {
            direction += 1.0;
        }

        let mut angle = self.angle + direction * self.turn_rate * input.dt;
        if self.mouse_locked {
            angle += input.look_delta * self.look_sensitivity;
        }
        self.angle = normalize_angle(angle);
    }

    /// Position the movement intents would reach without collision.
    pub(crate) fn desired_position(&self, input: &FrameInput) -> Vec2 {
        let (sin, cos) = self.angle.sin_cos();
        let forward = Vec2::new(cos, sin);
        let right = Vec2::new(-sin, cos);

        let mut heading = Vec2::ZERO;
        if input.move_forward {
            heading += forward;
        }
        if input.move_back {
            heading -= forward;
        }
        if input.strafe_right {
            heading += right * self.strafe_factor;
        }
        if input.strafe_left {
            heading -= right * self.strafe_factor;
        }

        let speed = if input.sprint {
            self.speed * self.sprint_multiplier
        } else {
            self.speed
        };
        self.position + heading * speed * input.dt
    }

    pub(crate) fn place(&mut self, position: Vec2) {
        self.position = position;
    }
}
