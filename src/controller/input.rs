use std::collections::HashSet;

use winit::keyboard::KeyCode;

/// Per-frame input state fed by winit events.
///
/// Mouse look and scroll are accumulated between frames and consumed
/// exactly once per update, so event delivery rate never couples to the
/// frame rate.
pub struct InputState {
    pub pressed_keys: HashSet<KeyCode>,
    look_delta: (f32, f32),
    scroll_delta: f32,
    pub mouse_locked: bool,
    shadow_toggle: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            pressed_keys: HashSet::new(),
            look_delta: (0.0, 0.0),
            scroll_delta: 0.0,
            mouse_locked: false,
            shadow_toggle: false,
        }
    }

    pub fn press(&mut self, key: KeyCode) {
        self.pressed_keys.insert(key);
    }

    pub fn release(&mut self, key: KeyCode) {
        self.pressed_keys.remove(&key);
    }

    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.pressed_keys.contains(&key)
    }

    /// Drop all held keys (focus loss would otherwise leave them stuck).
    pub fn clear_keys(&mut self) {
        self.pressed_keys.clear();
    }

    /// Accumulate a raw mouse motion delta. Ignored while the cursor is
    /// free so UI interaction does not steer the camera.
    pub fn accumulate_look(&mut self, dx: f32, dy: f32) {
        if self.mouse_locked {
            self.look_delta.0 += dx;
            self.look_delta.1 += dy;
        }
    }

    pub fn consume_look(&mut self) -> (f32, f32) {
        let result = self.look_delta;
        self.look_delta = (0.0, 0.0);
        result
    }

    pub fn accumulate_scroll(&mut self, delta_y: f32) {
        self.scroll_delta += delta_y;
    }

    pub fn consume_scroll(&mut self) -> f32 {
        let result = self.scroll_delta;
        self.scroll_delta = 0.0;
        result
    }

    /// Latch a shadows-on/off request (Space). The latch is taken once
    /// per frame so holding the key does not flicker the toggle.
    pub fn request_shadow_toggle(&mut self) {
        self.shadow_toggle = true;
    }

    pub fn take_shadow_toggle(&mut self) -> bool {
        std::mem::take(&mut self.shadow_toggle)
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_look_delta_accumulates_then_drains() {
        let mut input = InputState::new();
        input.mouse_locked = true;
        input.accumulate_look(2.0, -1.0);
        input.accumulate_look(0.5, 0.5);
        assert_eq!(input.consume_look(), (2.5, -0.5));
        assert_eq!(input.consume_look(), (0.0, 0.0));
    }

    #[test]
    fn test_look_ignored_while_unlocked() {
        let mut input = InputState::new();
        input.accumulate_look(10.0, 10.0);
        assert_eq!(input.consume_look(), (0.0, 0.0));
    }

    #[test]
    fn test_scroll_drains() {
        let mut input = InputState::new();
        input.accumulate_scroll(1.0);
        input.accumulate_scroll(2.0);
        assert_eq!(input.consume_scroll(), 3.0);
        assert_eq!(input.consume_scroll(), 0.0);
    }

    #[test]
    fn test_shadow_toggle_latches_once() {
        let mut input = InputState::new();
        input.request_shadow_toggle();
        input.request_shadow_toggle();
        assert!(input.take_shadow_toggle());
        assert!(!input.take_shadow_toggle());
    }

    #[test]
    fn test_clear_keys() {
        let mut input = InputState::new();
        input.press(KeyCode::KeyW);
        input.press(KeyCode::ShiftLeft);
        input.clear_keys();
        assert!(!input.is_key_pressed(KeyCode::KeyW));
    }
}
