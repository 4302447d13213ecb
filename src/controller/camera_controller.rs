use winit::keyboard::KeyCode;

use crate::controller::InputState;
use crate::model::{Camera, MoveDirection};

/// Translates one frame of input state into camera operations.
/// Holds no camera state of its own.
pub struct CameraController {
    pub boost_factor: f32,
}

impl CameraController {
    pub fn new() -> Self {
        Self { boost_factor: 10.0 }
    }

    pub fn update(&self, camera: &mut Camera, input: &mut InputState, dt: f32) {
        // Mouse look: screen y grows downward, pitch grows upward
        let (dx, dy) = input.consume_look();
        if dx != 0.0 || dy != 0.0 {
            camera.look(dx, -dy, true);
        }

        let scroll = input.consume_scroll();
        if scroll != 0.0 {
            camera.zoom_by(scroll);
        }

        let boosted = input.is_key_pressed(KeyCode::ControlLeft)
            || input.is_key_pressed(KeyCode::ControlRight);
        let step = if boosted { dt * self.boost_factor } else { dt };

        let bindings = [
            (KeyCode::KeyW, MoveDirection::Forward),
            (KeyCode::KeyS, MoveDirection::Backward),
            (KeyCode::KeyA, MoveDirection::Left),
            (KeyCode::KeyD, MoveDirection::Right),
        ];
        for (key, direction) in bindings {
            if input.is_key_pressed(key) {
                camera.advance(direction, step);
            }
        }
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_forward_key_moves_along_front() {
        let mut camera = Camera::default();
        camera.speed = 1.0;
        let mut input = InputState::new();
        input.press(KeyCode::KeyW);

        CameraController::new().update(&mut camera, &mut input, 1.0);
        assert!((camera.position - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_boost_multiplies_step() {
        let mut camera = Camera::default();
        camera.speed = 1.0;
        let mut input = InputState::new();
        input.press(KeyCode::KeyD);
        input.press(KeyCode::ControlLeft);

        let controller = CameraController::new();
        controller.update(&mut camera, &mut input, 1.0);
        assert!((camera.position.x - controller.boost_factor).abs() < 1e-4);
    }

    #[test]
    fn test_mouse_y_is_inverted_into_pitch() {
        let mut camera = Camera::default();
        camera.sensitivity = 1.0;
        let mut input = InputState::new();
        input.mouse_locked = true;
        // Mouse moved down the screen: camera should pitch down
        input.accumulate_look(0.0, 10.0);

        CameraController::new().update(&mut camera, &mut input, 0.016);
        assert!(camera.pitch() < 0.0);
    }

    #[test]
    fn test_scroll_zooms() {
        let mut camera = Camera::default();
        let mut input = InputState::new();
        input.accumulate_scroll(3.0);

        CameraController::new().update(&mut camera, &mut input, 0.016);
        assert_eq!(camera.zoom(), 42.0);
    }
}
