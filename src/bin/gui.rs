use clap::Parser;
use fractal_zoomer::{ExplorerConfig, PixelsPresenterFactory, RunGuiCommand, TargetPolicy};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "gui")]
#[command(about = "Mandelbrot zoom explorer in a window")]
struct Args {
    /// Steer with the arrow keys instead of zooming on its own
    #[arg(long)]
    interactive: bool,

    /// Seed for target sampling
    #[arg(long)]
    seed: Option<u64>,

    /// Simulated display transfer time per pixel, in nanoseconds
    #[arg(long, default_value_t = 0)]
    pixel_time_ns: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = ExplorerConfig::default();
    if args.interactive {
        config.target.policy = TargetPolicy::Interactive;
    }
    if let Some(seed) = args.seed {
        config.target.seed = seed;
    }

    let presenter_factory = PixelsPresenterFactory::new();
    let command = RunGuiCommand::new(
        presenter_factory,
        config,
        Duration::from_nanos(args.pixel_time_ns),
    );

    command.execute()
}
