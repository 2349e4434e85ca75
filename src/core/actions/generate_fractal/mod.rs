#[cfg(test)]
#[allow(clippy::module_inception)]
pub mod generate_fractal;
pub mod generate_fractal_rayon;
pub mod ports;
