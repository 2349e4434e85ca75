//! Windowed front end: winit for the window and keyboard, pixels for the
//! framebuffer.

pub mod app;
pub mod commands;
pub mod events;
