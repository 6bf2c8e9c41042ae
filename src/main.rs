//! Munchkey headless runner
//!
//! Drives the simulation with a scripted autopilot and logs a run summary.
//! Usage: `munchkey [seed] [ticks] [settings.json]`. `RUST_LOG` controls
//! verbosity.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::error::Error;

    use munchkey::SimSettings;
    use munchkey::sim::{SeededRng, TickInput, World, tick};

    const DEFAULT_SEED: u64 = 12345;
    const DEFAULT_TICKS: u64 = 60 * 60;

    /// Parsed command line
    struct Args {
        seed: u64,
        ticks: u64,
        settings: SimSettings,
    }

    fn parse_args() -> Result<Args, Box<dyn Error>> {
        let mut args = std::env::args().skip(1);
        let seed = match args.next() {
            Some(s) => s.parse()?,
            None => DEFAULT_SEED,
        };
        let ticks = match args.next() {
            Some(s) => s.parse()?,
            None => DEFAULT_TICKS,
        };
        let settings = match args.next() {
            Some(path) => SimSettings::from_json(&std::fs::read_to_string(path)?)?,
            None => SimSettings::default(),
        };
        Ok(Args {
            seed,
            ticks,
            settings,
        })
    }

    /// Circle the arena, swinging and punching on a rhythm
    fn autopilot(frame: u64, world: &World) -> TickInput {
        let t = frame as f32 / 120.0;
        TickInput {
            forward: t.cos() * 0.6,
            lateral: t.sin() * 0.6,
            aim: t * 2.0,
            fire: frame % 7 == 0,
            punch: frame % 97 == 0,
            boost: frame % 240 == 0,
            switch_slot: frame % 900 == 0,
            restart: world.is_game_over(),
        }
    }

    pub fn run() -> Result<(), Box<dyn Error>> {
        let args = parse_args()?;
        log::info!("Munchkey headless run: seed {}, {} ticks", args.seed, args.ticks);

        let mut world = World::with_settings(args.settings, Box::new(SeededRng::new(args.seed)));
        let mut runs = 1;

        for frame in 0..args.ticks {
            let input = autopilot(frame, &world);
            tick(&mut world, &input);

            if world.restart_requested() {
                log::info!(
                    "Run {} ended: {} orders completed",
                    runs,
                    world.completed_orders()
                );
                world.restart();
                runs += 1;
            }

            if frame % 600 == 0 {
                log::debug!(
                    "tick {}: {} fruit, {} projectiles, hp {}",
                    world.frame_count(),
                    world.fruit_count(),
                    world.projectiles().count(),
                    world.player().body.hp()
                );
            }
        }

        let slots: Vec<usize> = world.skewer_slots().iter().map(|s| s.len()).collect();
        log::info!(
            "Finished: run {}, tick {}, hp {}, {} fruit live, {} orders completed, slots {:?}",
            runs,
            world.frame_count(),
            world.player().body.hp(),
            world.fruit_count(),
            world.completed_orders(),
            slots
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    if let Err(e) = headless::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the host page on wasm; nothing to run here
}
