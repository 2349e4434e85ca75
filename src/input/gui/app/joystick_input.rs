use crate::core::input::snapshot::InputSnapshot;
use winit::event::ElementState;
use winit::keyboard::KeyCode;

const FULL_DEFLECTION: i8 = 127;

/// Keyboard stand-in for the joystick and its two buttons.
///
/// Arrows or WASD deflect the stick fully; Z and C are the buttons. Screen up
/// is towards smaller imaginary values because display row 0 is `min_y`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct JoystickInputState {
    up_held: bool,
    down_held: bool,
    left_held: bool,
    right_held: bool,
    z_held: bool,
    c_held: bool,
}

impl JoystickInputState {
    pub fn handle_key_event(&mut self, key_code: KeyCode, state: ElementState) {
        let pressed = state == ElementState::Pressed;

        match key_code {
            KeyCode::ArrowUp | KeyCode::KeyW => self.up_held = pressed,
            KeyCode::ArrowDown | KeyCode::KeyS => self.down_held = pressed,
            KeyCode::ArrowLeft | KeyCode::KeyA => self.left_held = pressed,
            KeyCode::ArrowRight | KeyCode::KeyD => self.right_held = pressed,
            KeyCode::KeyZ => self.z_held = pressed,
            KeyCode::KeyC => self.c_held = pressed,
            _ => {}
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            joystick_x: axis(self.left_held, self.right_held),
            joystick_y: axis(self.up_held, self.down_held),
            z: self.z_held,
            c: self.c_held,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn axis(negative: bool, positive: bool) -> i8 {
    match (negative, positive) {
        (true, false) => -FULL_DEFLECTION,
        (false, true) => FULL_DEFLECTION,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::JoystickInputState;
    use winit::{event::ElementState, keyboard::KeyCode};

    #[test]
    fn arrows_and_wasd_deflect_the_stick() {
        let mut input = JoystickInputState::default();

        input.handle_key_event(KeyCode::ArrowRight, ElementState::Pressed);
        input.handle_key_event(KeyCode::KeyW, ElementState::Pressed);

        let snapshot = input.snapshot();
        assert_eq!(snapshot.joystick_x, 127);
        assert_eq!(snapshot.joystick_y, -127);

        input.handle_key_event(KeyCode::ArrowRight, ElementState::Released);
        input.handle_key_event(KeyCode::KeyW, ElementState::Released);

        let snapshot = input.snapshot();
        assert_eq!(snapshot.joystick_x, 0);
        assert_eq!(snapshot.joystick_y, 0);
    }

    #[test]
    fn opposite_keys_cancel() {
        let mut input = JoystickInputState::default();

        input.handle_key_event(KeyCode::KeyA, ElementState::Pressed);
        input.handle_key_event(KeyCode::KeyD, ElementState::Pressed);

        assert_eq!(input.snapshot().joystick_x, 0);
    }

    #[test]
    fn buttons_follow_key_state() {
        let mut input = JoystickInputState::default();

        input.handle_key_event(KeyCode::KeyZ, ElementState::Pressed);
        input.handle_key_event(KeyCode::KeyC, ElementState::Pressed);
        assert!(input.snapshot().z);
        assert!(input.snapshot().c);

        input.handle_key_event(KeyCode::KeyC, ElementState::Released);
        assert!(input.snapshot().z);
        assert!(!input.snapshot().c);
    }

    #[test]
    fn reset_clears_all_state() {
        let mut input = JoystickInputState::default();
        input.handle_key_event(KeyCode::ArrowDown, ElementState::Pressed);
        input.handle_key_event(KeyCode::KeyZ, ElementState::Pressed);

        input.reset();

        assert_eq!(input.snapshot(), Default::default());
    }
}
