//! Perspective camera and damped orbit controls.

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::{Mat4, Vec2, Vec3};

use crate::input::{Input, MouseButton};

/// Perspective projection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees.
    pub fov_y: f32,
    /// Width / height of the viewport.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl PerspectiveCamera {
    pub fn new(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov_y,
            aspect,
            near,
            far,
        }
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y.to_radians(), self.aspect, self.near, self.far)
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(75.0, 1.0, 0.1, 100.0)
    }
}

/// Keeps pitch away from the poles so `look_at` stays well defined.
const PITCH_LIMIT: f32 = FRAC_PI_2 - 1e-3;

/// Orbit camera with inertial damping.
///
/// Input is accumulated as pending motion (`rotate`, `pan`, `zoom`) and
/// applied in [`update`](Self::update), which must run once per frame. With
/// damping on, each update applies a `damping_factor` share of the pending
/// motion and keeps the rest, so the camera glides to a stop.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Elevation above the target's horizontal plane in radians.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,

    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,

    yaw_delta: f32,
    pitch_delta: f32,
    pan_offset: Vec3,
    zoom_scale: f32,
}

impl OrbitControls {
    /// Controls placed at `position`, looking at `target`.
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        let offset = position - target;
        let distance = offset.length().max(1e-4);
        Self {
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / distance).clamp(-1.0, 1.0).asin(),
            distance,
            target,
            enable_damping: true,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: 0.1,
            max_distance: 90.0,
            yaw_delta: 0.0,
            pitch_delta: 0.0,
            pan_offset: Vec3::ZERO,
            zoom_scale: 1.0,
        }
    }

    /// Calculate the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    /// Queue a rotation for a drag of `delta` pixels on a viewport
    /// `viewport_height` pixels tall. A full-height drag turns 360°.
    pub fn rotate(&mut self, delta: Vec2, viewport_height: f32) {
        if viewport_height <= 0.0 {
            return;
        }
        self.yaw_delta -= TAU * delta.x / viewport_height * self.rotate_speed;
        self.pitch_delta += TAU * delta.y / viewport_height * self.rotate_speed;
    }

    /// Queue a pan that keeps the point under the cursor fixed on the
    /// target plane.
    pub fn pan(&mut self, delta: Vec2, viewport_height: f32, fov_y_degrees: f32) {
        if viewport_height <= 0.0 {
            return;
        }
        let forward = (self.target - self.position()).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward);

        let target_distance = self.distance * (fov_y_degrees.to_radians() * 0.5).tan();
        let scale = 2.0 * target_distance / viewport_height * self.pan_speed;
        self.pan_offset += -right * delta.x * scale + up * delta.y * scale;
    }

    /// Queue a zoom of `steps` wheel notches; positive moves closer.
    pub fn zoom(&mut self, steps: f32) {
        self.zoom_scale *= 0.95_f32.powf(steps * self.zoom_speed);
    }

    /// Translate this frame's input into pending motion.
    ///
    /// Left drag rotates, right drag pans, middle drag and wheel zoom.
    pub fn handle_input(&mut self, input: &Input, viewport_height: f32, fov_y_degrees: f32) {
        let drag = input.drag_delta();
        if drag != Vec2::ZERO {
            if input.mouse_held(MouseButton::Left) {
                self.rotate(drag, viewport_height);
            } else if input.mouse_held(MouseButton::Right) {
                self.pan(drag, viewport_height, fov_y_degrees);
            } else if input.mouse_held(MouseButton::Middle) && drag.y != 0.0 {
                self.zoom(-drag.y.signum());
            }
        }
        if input.scroll_delta() != 0.0 {
            self.zoom(input.scroll_delta());
        }
    }

    /// Apply pending motion. Returns `true` if the camera moved noticeably.
    pub fn update(&mut self) -> bool {
        let before = (self.position(), self.target);
        let share = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };

        self.yaw += self.yaw_delta * share;
        self.pitch = (self.pitch + self.pitch_delta * share).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.distance = (self.distance * self.zoom_scale).clamp(self.min_distance, self.max_distance);
        self.target += self.pan_offset * share;

        if self.enable_damping {
            let keep = 1.0 - self.damping_factor;
            self.yaw_delta *= keep;
            self.pitch_delta *= keep;
            self.pan_offset *= keep;
        } else {
            self.yaw_delta = 0.0;
            self.pitch_delta = 0.0;
            self.pan_offset = Vec3::ZERO;
        }
        self.zoom_scale = 1.0;

        const EPS: f32 = 1e-6;
        before.0.distance_squared(self.position()) > EPS || before.1.distance_squared(self.target) > EPS
    }
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::looking_at(Vec3::splat(3.0), Vec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        a.distance(b) < 1e-4
    }

    #[test]
    fn test_looking_at_round_trips_position() {
        let controls = OrbitControls::looking_at(Vec3::new(3.0, 3.0, 3.0), Vec3::ZERO);
        assert!(approx(controls.position(), Vec3::new(3.0, 3.0, 3.0)));
        assert!((controls.distance - 27.0_f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn test_damping_glides_to_rest() {
        let mut controls = OrbitControls::default();
        let start_yaw = controls.yaw;
        controls.rotate(Vec2::new(-100.0, 0.0), 1000.0);

        // First frame only applies a fraction of the motion
        assert!(controls.update());
        let expected_total = TAU * 100.0 / 1000.0;
        let first_step = controls.yaw - start_yaw;
        assert!((first_step - expected_total * 0.05).abs() < 1e-5);

        // Motion converges on the full rotation
        for _ in 0..1000 {
            controls.update();
        }
        assert!((controls.yaw - start_yaw - expected_total).abs() < 1e-3);
        assert!(!controls.update());
    }

    #[test]
    fn test_no_damping_applies_immediately() {
        let mut controls = OrbitControls::default();
        controls.enable_damping = false;
        let start_yaw = controls.yaw;
        controls.rotate(Vec2::new(-250.0, 0.0), 1000.0);
        controls.update();
        assert!((controls.yaw - start_yaw - TAU / 4.0).abs() < 1e-5);
        assert!(!controls.update());
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut controls = OrbitControls::default();
        controls.enable_damping = false;
        controls.rotate(Vec2::new(0.0, 10_000.0), 100.0);
        controls.update();
        assert!(controls.pitch <= PITCH_LIMIT);
    }

    #[test]
    fn test_zoom_moves_closer_and_clamps() {
        let mut controls = OrbitControls::default();
        let start = controls.distance;
        controls.zoom(1.0);
        controls.update();
        assert!((controls.distance - start * 0.95).abs() < 1e-5);

        controls.zoom(-10_000.0);
        controls.update();
        assert_eq!(controls.distance, controls.max_distance);
    }

    #[test]
    fn test_pan_moves_target_and_camera_together() {
        let mut controls = OrbitControls::default();
        controls.enable_damping = false;
        let offset_before = controls.position() - controls.target;
        controls.pan(Vec2::new(50.0, 20.0), 800.0, 75.0);
        controls.update();
        assert!(controls.target.length() > 0.0);
        assert!(approx(controls.position() - controls.target, offset_before));
    }

    #[test]
    fn test_projection_uses_aspect() {
        let a = PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0).projection_matrix();
        let b = PerspectiveCamera::new(75.0, 2.0, 0.1, 100.0).projection_matrix();
        assert!((a.x_axis.x - 2.0 * b.x_axis.x).abs() < 1e-5);
        assert_eq!(a.y_axis.y, b.y_axis.y);
    }
}
