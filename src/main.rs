use clap::{Parser, Subcommand, ValueEnum};
use fractal_zoomer::{
    ComputeMode, Explorer, ExplorerConfig, MandelbrotConfig, MemoryDisplay, NoInput, TargetPolicy,
    verify_controller, write_ppm,
};
use std::path::PathBuf;
use std::time::Duration;

const MIN_AGREEMENT: f64 = 0.99;

#[derive(Parser)]
#[command(name = "fractal_zoomer")]
#[command(about = "Real-time Mandelbrot zoom explorer")]
struct Args {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Zoom headlessly into an in-memory display
    Run {
        #[arg(long, default_value_t = 240)]
        frames: u64,

        #[arg(long, value_enum, default_value_t = ComputeArg::Threaded)]
        compute: ComputeArg,

        #[arg(long, value_enum, default_value_t = PolicyArg::Autonomous)]
        policy: PolicyArg,

        /// Seed for target sampling
        #[arg(long)]
        seed: Option<u64>,

        /// Coarse zoom steps before restarting
        #[arg(long)]
        max_jumps: Option<u32>,

        /// Simulated display transfer time per pixel, in nanoseconds
        #[arg(long, default_value_t = 0)]
        pixel_time_ns: u64,

        /// Give up waiting for a late buffer after this many milliseconds
        #[arg(long)]
        swap_timeout_ms: Option<u64>,

        /// Write the last frame as a PPM image
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Compare the fixed-point engine with the double-precision reference
    Verify {
        #[arg(long, default_value_t = 320)]
        size: usize,

        #[arg(long)]
        cycle_detection: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ComputeArg {
    Threaded,
    Inline,
}

impl From<ComputeArg> for ComputeMode {
    fn from(arg: ComputeArg) -> Self {
        match arg {
            ComputeArg::Threaded => Self::Threaded,
            ComputeArg::Inline => Self::Inline,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PolicyArg {
    Autonomous,
    Interactive,
}

impl From<PolicyArg> for TargetPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Autonomous => Self::Autonomous,
            PolicyArg::Interactive => Self::Interactive,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Args::parse().cmd {
        Cmd::Run {
            frames,
            compute,
            policy,
            seed,
            max_jumps,
            pixel_time_ns,
            swap_timeout_ms,
            output,
        } => {
            let mut config = ExplorerConfig::default();
            config.compute_mode = compute.into();
            config.target.policy = policy.into();
            if let Some(seed) = seed {
                config.target.seed = seed;
            }
            config.zoom.max_jumps = max_jumps;
            config.swap_timeout = swap_timeout_ms.map(Duration::from_millis);

            let display = MemoryDisplay::new(Duration::from_nanos(pixel_time_ns));
            let mut explorer = Explorer::new(config, display, NoInput)?;
            let summary = explorer.run(frames)?;

            println!(
                "{} frames, {} buffer swaps ({} late), {} restarts, {} rows computed in display idle time",
                summary.frames, summary.swaps, summary.late_swaps, summary.resets, summary.stolen_rows
            );

            if let Some(path) = output {
                if let Some(frame) = explorer.sink().last_frame() {
                    write_ppm(frame, &path)?;
                    log::info!("wrote frame {} to {}", frame.generation(), path.display());
                }
            }
        }
        Cmd::Verify {
            size,
            cycle_detection,
        } => {
            let config = MandelbrotConfig {
                buffer_rows: size,
                buffer_cols: size,
                ..MandelbrotConfig::default()
            };

            let report = verify_controller(&config, cycle_detection)?;
            println!(
                "{}x{}: {:.3}% of pixels agree with the reference",
                report.grid.cols,
                report.grid.rows,
                report.agreement() * 100.0
            );

            if report.agreement() < MIN_AGREEMENT {
                return Err(format!(
                    "agreement {:.4} is below {}",
                    report.agreement(),
                    MIN_AGREEMENT
                )
                .into());
            }
        }
    }

    Ok(())
}
