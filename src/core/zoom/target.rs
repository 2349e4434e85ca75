use crate::core::data::complex::Complex;
use crate::core::data::complex_rect::ComplexRect;
use crate::core::data::fractal_buffer::FractalBuffer;
use crate::core::data::point::Point;
use crate::core::fractals::mandelbrot::palette::PaletteBand;
use crate::core::input::snapshot::InputSnapshot;
use crate::core::zoom::limits::ZoomStep;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

const JOYSTICK_FULL_SCALE: f64 = 128.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetPolicy {
    /// Picks interesting boundary detail from the buffer itself.
    #[default]
    Autonomous,
    /// Follows the joystick.
    Interactive,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetConfig {
    pub policy: TargetPolicy,
    /// Refinement looks for a pixel in this band next to one in a higher band.
    pub refine_band: PaletteBand,
    /// Largest ring, in buffer pixels, searched during refinement.
    pub spiral_radius: u32,
    /// Full joystick deflection moves the target this many half extents.
    pub joystick_gain: f64,
    pub seed: u64,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            policy: TargetPolicy::Autonomous,
            refine_band: PaletteBand::GreenRamp,
            spiral_radius: 48,
            joystick_gain: 1.0,
            seed: 0x5eed,
        }
    }
}

/// Chooses where each coarse zoom step heads.
#[derive(Debug, Clone)]
pub struct TargetSelector {
    config: TargetConfig,
    rng: SmallRng,
    prior: Option<Complex>,
    first_entry: bool,
}

impl TargetSelector {
    #[must_use]
    pub fn new(config: TargetConfig) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(config.seed),
            config,
            prior: None,
            first_entry: true,
        }
    }

    /// Forgets the previous target so the next choice samples afresh.
    pub fn reset(&mut self) {
        self.prior = None;
        self.first_entry = true;
    }

    /// Target for the next coarse step from `buffer`, clamped so that the
    /// step stays inside the buffer's bounds.
    pub fn choose(
        &mut self,
        buffer: &FractalBuffer,
        input: InputSnapshot,
        step: &ZoomStep,
    ) -> Complex {
        let bounds = buffer.world_bounds();

        let target = match self.config.policy {
            TargetPolicy::Autonomous => self.autonomous_target(buffer),
            TargetPolicy::Interactive => {
                interactive_target(&bounds, input, self.config.joystick_gain)
            }
        };

        let target = step.clamp_target(&bounds, target);
        self.prior = Some(target);
        target
    }

    /// On first entry into a region the spiral starts at a randomly sampled
    /// boundary pixel, since the centre of a fresh overview rarely sits near
    /// detail. Later buffers spiral out from their centre.
    fn autonomous_target(&mut self, buffer: &FractalBuffer) -> Complex {
        let grid = buffer.grid();
        let centre = Point::new(grid.cols as i32 / 2, grid.rows as i32 / 2);

        let seed = if self.first_entry {
            self.first_entry = false;
            sample_boundary_pixel(buffer, &mut self.rng)
        } else {
            Some(centre)
        };

        let refined = seed.and_then(|seed| {
            refine(
                buffer,
                seed,
                self.config.refine_band,
                self.config.spiral_radius,
            )
        });

        let chosen = refined
            .or(seed.filter(|_| self.prior.is_none()))
            .and_then(|pixel| buffer.world_of(pixel));

        match (chosen, self.prior) {
            (Some(world), _) => world,
            (None, Some(prior)) => prior,
            (None, None) => buffer.world_bounds().center(),
        }
    }
}

/// Offset from the centre of `bounds` proportional to joystick deflection.
#[must_use]
pub fn interactive_target(bounds: &ComplexRect, input: InputSnapshot, gain: f64) -> Complex {
    let dx = f64::from(input.joystick_x) / JOYSTICK_FULL_SCALE;
    let dy = f64::from(input.joystick_y) / JOYSTICK_FULL_SCALE;

    bounds.center()
        + Complex::new(
            dx * bounds.half_width() * gain,
            dy * bounds.half_height() * gain,
        )
}

/// Escaped pixel with exactly one inside neighbour.
fn is_boundary(buffer: &FractalBuffer, pixel: Point) -> bool {
    if buffer.get_point(pixel).unwrap_or(0) == 0 {
        return false;
    }

    let inside_neighbours = pixel
        .neighbours()
        .iter()
        .filter(|n| buffer.get_point(**n) == Some(0))
        .count();

    inside_neighbours == 1
}

/// Uniformly picks one boundary pixel in a single scan (reservoir sampling).
fn sample_boundary_pixel(buffer: &FractalBuffer, rng: &mut SmallRng) -> Option<Point> {
    let mut chosen = None;
    let mut seen: u32 = 0;

    for y in 0..buffer.rows() as i32 {
        for x in 0..buffer.cols() as i32 {
            let pixel = Point::new(x, y);
            if !is_boundary(buffer, pixel) {
                continue;
            }

            seen += 1;
            if rng.gen_range(0..seen) == 0 {
                chosen = Some(pixel);
            }
        }
    }

    chosen
}

fn band_of(buffer: &FractalBuffer, pixel: Point) -> Option<PaletteBand> {
    match buffer.get_point(pixel)? {
        0 => None,
        value => Some(PaletteBand::of(value)),
    }
}

fn is_refinement_candidate(
    buffer: &FractalBuffer,
    pixel: Point,
    refine_band: PaletteBand,
) -> bool {
    if band_of(buffer, pixel) != Some(refine_band) {
        return false;
    }

    pixel
        .neighbours()
        .iter()
        .any(|n| band_of(buffer, *n).is_some_and(|band| band > refine_band))
}

/// Points on the square ring at distance `radius` around `centre`.
fn ring(centre: Point, radius: i32) -> impl Iterator<Item = Point> {
    let horizontal = (-radius..=radius).flat_map(move |dx| {
        [
            Point::new(centre.x + dx, centre.y - radius),
            Point::new(centre.x + dx, centre.y + radius),
        ]
    });
    let vertical = (-radius + 1..radius).flat_map(move |dy| {
        [
            Point::new(centre.x - radius, centre.y + dy),
            Point::new(centre.x + radius, centre.y + dy),
        ]
    });

    horizontal.chain(vertical)
}

/// Spirals out from `seed` to the first refinement candidate.
fn refine(
    buffer: &FractalBuffer,
    seed: Point,
    refine_band: PaletteBand,
    max_radius: u32,
) -> Option<Point> {
    if is_refinement_candidate(buffer, seed, refine_band) {
        return Some(seed);
    }

    (1..=max_radius as i32)
        .flat_map(|radius| ring(seed, radius))
        .find(|pixel| is_refinement_candidate(buffer, *pixel, refine_band))
}
