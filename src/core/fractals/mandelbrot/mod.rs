pub mod algorithm;
pub mod cycle;
pub mod errors;
pub mod escape;
pub mod mandelbrot_config;
pub mod palette;
