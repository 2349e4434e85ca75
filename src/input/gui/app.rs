pub mod gui_app;
pub mod joystick_input;
pub mod ports;
