use crate::core::actions::generate_fractal::generate_fractal_rayon::generate_fractal_rayon;
use crate::core::data::fractal_buffer::{FractalBuffer, PassParams};
use crate::core::fractals::mandelbrot::algorithm::MandelbrotAlgorithm;
use crate::core::fractals::mandelbrot::escape::EscapeEngine;
use crate::core::fractals::mandelbrot::mandelbrot_config::MandelbrotConfig;
use crate::core::util::pixel_to_complex_coords::GridSize;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerifyReport {
    pub grid: GridSize,
    pub matching: usize,
    pub inside_engine: u32,
    pub inside_reference: usize,
    pub engine_duration: Duration,
    pub reference_duration: Duration,
}

impl VerifyReport {
    /// Fraction of pixels both classify the same way.
    #[must_use]
    pub fn agreement(&self) -> f64 {
        self.matching as f64 / self.grid.len().max(1) as f64
    }
}

/// Computes the first pass of `config` with the fixed-point engine and with
/// the double-precision reference, and compares inside/escaped classification.
pub fn verify_controller(
    config: &MandelbrotConfig,
    use_cycle_detection: bool,
) -> Result<VerifyReport, Box<dyn std::error::Error>> {
    config.validate()?;

    let params = PassParams {
        use_cycle_detection,
        ..config.initial_pass()
    };
    let grid = GridSize::new(config.buffer_rows, config.buffer_cols);

    let mut buffer = FractalBuffer::new(grid.rows, grid.cols, params)?;
    let engine = EscapeEngine::new(config.cycle_detection);
    let start = Instant::now();
    engine.generate(&mut buffer);
    let engine_duration = start.elapsed();

    let algorithm = MandelbrotAlgorithm::new(grid, params.world_bounds, params.max_iterations)?;
    let start = Instant::now();
    let reference = generate_fractal_rayon(grid, &algorithm)?;
    let reference_duration = start.elapsed();

    let matching = buffer
        .data()
        .iter()
        .zip(&reference)
        .filter(|(value, escape)| (**value == 0) == (**escape == 0))
        .count();

    let report = VerifyReport {
        grid,
        matching,
        inside_engine: buffer.count_inside(),
        inside_reference: reference.iter().filter(|escape| **escape == 0).count(),
        engine_duration,
        reference_duration,
    };

    log::info!(
        "{}x{}: {:.3}% agreement, {} inside (reference {}), engine {:?}, reference {:?}",
        grid.cols,
        grid.rows,
        report.agreement() * 100.0,
        report.inside_engine,
        report.inside_reference,
        report.engine_duration,
        report.reference_duration
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_agrees_with_reference() {
        let config = MandelbrotConfig {
            buffer_rows: 120,
            buffer_cols: 120,
            ..MandelbrotConfig::default()
        };

        let report = verify_controller(&config, false).unwrap();

        assert_eq!(report.grid, GridSize::new(120, 120));
        assert!(report.agreement() >= 0.99, "agreement {}", report.agreement());
        assert!(report.inside_engine > 0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = MandelbrotConfig {
            max_iterations: 0,
            ..MandelbrotConfig::default()
        };

        assert!(verify_controller(&config, false).is_err());
    }
}
