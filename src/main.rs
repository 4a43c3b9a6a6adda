//! Bounce Box entry point
//!
//! Headless demo loop: scatter a handful of boxes with a seeded RNG, step
//! the field at a fixed cadence, and write periodic PPM snapshot frames.
//! Presentation (a window, a GPU texture) would consume the same byte
//! buffer; none is wired up here.

use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use bounce_box::config::SimConfig;
use bounce_box::sim::{Body, FieldError};
use bounce_box::snapshot;

/// Boxes scattered by the demo
const DEMO_BOXES: u32 = 8;
/// One snapshot frame per this many ticks
const SNAPSHOT_EVERY: u64 = 60;

struct Args {
    config: Option<PathBuf>,
    seed: u64,
    ticks: u64,
    out_dir: PathBuf,
}

impl Args {
    fn parse() -> Result<Self, String> {
        let mut args = Self {
            config: None,
            seed: 0xB0B0C5,
            ticks: 600,
            out_dir: PathBuf::from("frames"),
        };
        let mut it = std::env::args().skip(1);
        while let Some(flag) = it.next() {
            let mut value = |name: &str| it.next().ok_or(format!("{name} needs a value"));
            match flag.as_str() {
                "--config" => args.config = Some(PathBuf::from(value("--config")?)),
                "--seed" => args.seed = value("--seed")?.parse().map_err(|e| format!("{e}"))?,
                "--ticks" => args.ticks = value("--ticks")?.parse().map_err(|e| format!("{e}"))?,
                "--out" => args.out_dir = PathBuf::from(value("--out")?),
                other => {
                    return Err(format!(
                        "unknown argument {other}\nusage: bounce-box [--config PATH] [--seed N] [--ticks N] [--out DIR]"
                    ));
                }
            }
        }
        Ok(args)
    }
}

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let args = Args::parse()?;
    let config = match &args.config {
        Some(path) => {
            log::info!("Loading config from {}", path.display());
            SimConfig::load(path)?
        }
        None => SimConfig::default(),
    };

    let mut field = config.field()?;
    let mut raster = config.raster()?;
    log::info!(
        "Field {}x{}, canvas {}x{}, seed {}",
        field.width(),
        field.height(),
        raster.width(),
        raster.height(),
        args.seed
    );

    if field.width() < 80 || field.height() < 80 {
        return Err("demo scatter needs a field of at least 80x80".into());
    }

    let mut rng = Pcg32::seed_from_u64(args.seed);
    let mut spawned = 0;
    while spawned < DEMO_BOXES {
        let width = rng.random_range(20..=60);
        let height = rng.random_range(20..=60);
        let body = Body::new(
            rng.random_range(1..field.width() - width),
            rng.random_range(1..field.height() - height),
            width,
            height,
        );
        match field.spawn(body) {
            Ok(handle) => {
                let vel = IVec2::new(rng.random_range(-5..=5), rng.random_range(-5..=5));
                // A motionless box makes a dull demo
                let vel = if vel == IVec2::ZERO { IVec2::new(3, 2) } else { vel };
                field.body_mut(handle).ok_or(FieldError::Unknown(handle))?.set_vel(vel);
                spawned += 1;
            }
            // Unlucky overlap with an earlier spawn; roll again
            Err(FieldError::SlotOccupied { .. }) => continue,
            Err(e) => return Err(e.into()),
        }
    }
    log::info!("Spawned {} boxes", field.len());

    fs::create_dir_all(&args.out_dir)?;
    let mut frame = 0u64;
    for _ in 0..args.ticks {
        field.step();
        if field.tick_count() % SNAPSHOT_EVERY == 0 {
            raster.clear(config.background);
            raster.draw(&field, config.fill);
            let path = args.out_dir.join(format!("frame_{frame:04}.ppm"));
            snapshot::write_file(&raster, &path)?;
            log::debug!("Wrote {}", path.display());
            frame += 1;
        }
    }

    log::info!(
        "Done: {} ticks, {} frames in {}",
        field.tick_count(),
        frame,
        args.out_dir.display()
    );
    Ok(())
}
