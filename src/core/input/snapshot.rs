/// One reading of the input device: two signed axes and two buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputSnapshot {
    /// Positive is towards larger real values.
    pub joystick_x: i8,
    /// Positive is towards larger imaginary values.
    pub joystick_y: i8,
    /// Exit zoom.
    pub z: bool,
    /// Pause or resume.
    pub c: bool,
}

pub trait InputDevice: Send {
    fn read(&mut self) -> InputSnapshot;
}

/// Render-side view of the latest input.
pub trait InputSource {
    fn snapshot(&self) -> InputSnapshot;
}

/// Input source for runs without a device.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInput;

impl InputSource for NoInput {
    fn snapshot(&self) -> InputSnapshot {
        InputSnapshot::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_snapshot_is_centred_and_released() {
        let snapshot = InputSnapshot::default();

        assert_eq!(snapshot.joystick_x, 0);
        assert_eq!(snapshot.joystick_y, 0);
        assert!(!snapshot.z);
        assert!(!snapshot.c);
        assert_eq!(NoInput.snapshot(), snapshot);
    }
}
