pub mod colour;
pub mod complex;
pub mod complex_rect;
pub mod fixed;
pub mod fractal_buffer;
pub mod frame;
pub mod point;
