use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use argh::FromArgs;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use flocking::boids::Simulation;
use flocking::config::Config;
use flocking::population::{AdaptivePopulation, FrameRate};
use flocking::render::{Canvas, wrap_boid};

#[derive(FromArgs)]
/// Run the flocking simulation headless, optionally writing every frame as a PNG.
struct Args {
    /// JSON config file; the built-in demo settings are used without one
    #[argh(option)]
    config: Option<PathBuf>,

    /// initial number of boids, overriding the config
    #[argh(option)]
    boids: Option<usize>,

    /// seed for initial placement
    #[argh(option)]
    seed: Option<u64>,

    /// steer boids on the rayon thread pool
    #[argh(switch)]
    parallel: bool,

    /// number of ticks to run
    #[argh(option, default = "600")]
    frames: usize,

    /// canvas width in pixels
    #[argh(option, default = "800")]
    width: u32,

    /// canvas height in pixels
    #[argh(option, default = "600")]
    height: u32,

    /// directory to write frame PNGs into
    #[argh(option)]
    out: Option<PathBuf>,

    /// grow or shrink the flock with the measured tick rate
    #[argh(switch)]
    adaptive: bool,

    /// write the final flock as JSON to this path
    #[argh(option)]
    dump: Option<PathBuf>,
}

fn demo_config() -> Config {
    Config {
        boids: 150,
        speed_limit: 2.0,
        acceleration_limit: 0.5,
        ..Config::default()
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args: Args = argh::from_env();

    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => demo_config(),
    };
    if let Some(boids) = args.boids {
        config.boids = boids;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.parallel |= args.parallel;

    if let Some(out) = &args.out {
        fs::create_dir_all(out).with_context(|| format!("creating {}", out.display()))?;
    }

    let mut canvas = Canvas::new(args.width, args.height);
    let (half_width, half_height) = canvas.half_extent();
    let mut simulation = Simulation::new(&config).on_tick(move |boids| {
        for boid in boids.iter_mut() {
            wrap_boid(boid, half_width, half_height);
        }
    });
    info!(
        "Running {} ticks with {} boids on a {}x{} canvas",
        args.frames,
        simulation.len(),
        args.width,
        args.height
    );

    let mut meter = FrameRate::default();
    let policy = AdaptivePopulation::default();
    let mut rng = rand::rng();

    let pbar = ProgressBar::new(args.frames as u64);
    pbar.set_style(
        ProgressStyle::with_template(
            "[{elapsed_precise}/{eta_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}",
        )
        .context("building progress bar style")?,
    );

    for frame in 0..args.frames {
        simulation.tick();

        if let Some(out) = &args.out {
            canvas.draw(simulation.boids());
            let path = out.join(format!("frame_{:0>8}.png", frame));
            canvas
                .save(&path)
                .with_context(|| format!("writing {}", path.display()))?;
        }

        if args.adaptive {
            if let Some(rate) = meter.tick(Instant::now()) {
                policy.adjust(&mut simulation, rate, &mut rng);
                pbar.set_message(format!("{} boids, {:.0} ticks/s", simulation.len(), rate));
            }
        }
        pbar.inc(1);
    }
    pbar.finish();
    if args.adaptive {
        info!(
            "Finished with {} boids at {:.1} ticks/s",
            simulation.len(),
            meter.rate()
        );
    }

    if let Some(dump) = &args.dump {
        let file = File::create(dump).with_context(|| format!("creating {}", dump.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), simulation.boids())
            .with_context(|| format!("writing {}", dump.display()))?;
        info!("Wrote {} boids to {}", simulation.len(), dump.display());
    }

    Ok(())
}
