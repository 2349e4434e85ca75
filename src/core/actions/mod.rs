pub mod generate_fractal;
pub mod handshake;
pub mod stream_frame;
