use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tilehop_common::{GameConfig, Intent};
use tilehop_input::MAX_SCRIPT_FRAMES;
use tilehop_kernel::{World, WorldEvent, WorldSummary};
use tilehop_render::{DebugTextRenderer, Renderer};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tilehop-cli", about = "Headless tilehop driver")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML game configuration; built-in defaults when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, config and scene layout info
    Info,
    /// Step the world headlessly, optionally driven by an intent script
    Simulate {
        /// Idle frames to run when no script is given
        #[arg(
            short,
            long,
            default_value = "120",
            value_parser = clap::value_parser!(u64).range(1..=MAX_SCRIPT_FRAMES as u64)
        )]
        frames: u64,
        /// Override the scene layout seed
        #[arg(short, long)]
        seed: Option<u64>,
        /// Intent script, one line per frame
        #[arg(long)]
        script: Option<PathBuf>,
        /// Print every draw request of the final frame
        #[arg(long)]
        draws: bool,
        /// Emit a JSON report instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration as YAML
    Config,
}

/// What a headless run produced.
#[derive(Debug, Serialize)]
struct SimulationReport {
    frames_run: u64,
    quit: bool,
    state_hash: u64,
    summary: WorldSummary,
    events: Vec<WorldEvent>,
    #[serde(skip)]
    final_frame: String,
}

fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    match path {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(GameConfig::default()),
    }
}

/// Run `script` frame by frame through the world; stops early on quit.
fn simulate(world: &mut World, script: &[Vec<Intent>], verbose_draws: bool) -> SimulationReport {
    let mut renderer = if verbose_draws {
        DebugTextRenderer::verbose()
    } else {
        DebugTextRenderer::new()
    };

    let mut frames_run = 0;
    let mut last = None;
    for intents in script {
        let frame = world.step(intents);
        frames_run += 1;
        let quit = frame.should_quit();
        last = Some(frame);
        if quit {
            break;
        }
    }

    let quit = last.as_ref().is_some_and(|f| f.should_quit());
    let final_frame = last.map(|f| renderer.render(&f)).unwrap_or_default();
    let summary = world.summary();
    let events = world
        .drain_events()
        .into_iter()
        .filter(|e| !matches!(e, WorldEvent::Stepped { .. }))
        .collect();

    SimulationReport {
        frames_run,
        quit,
        state_hash: world.state_hash(),
        summary,
        events,
        final_frame,
    }
}

fn read_script(path: &Path) -> Result<Vec<Vec<Intent>>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    tilehop_input::parse_script(&text)
        .with_context(|| format!("invalid script {}", path.display()))
}

fn print_info(config: &GameConfig) -> Result<()> {
    let world = World::new(config.clone()).context("invalid game configuration")?;
    let w = &config.world;
    println!("tilehop-cli v{}", env!("CARGO_PKG_VERSION"));
    println!(
        "world: floor={}x{} water={} tiles rest_height={:.1} seed={}",
        w.grid_width,
        w.grid_depth,
        w.water_tile_count(),
        w.rest_height(),
        w.seed
    );
    println!(
        "layout: obstacles={} movable_tiles={}",
        world.layout().obstacles().len(),
        world.layout().movable_tiles().count()
    );
    println!(
        "oscillation: {:.2}..{:.2} step {:.3}",
        config.oscillation.min, config.oscillation.max, config.oscillation.delta
    );
    println!("camera: {} fov={:.0}", world.camera_mode(), config.camera.fov_degrees);
    let spawn = world.spawn_point();
    println!("spawn: ({:.2}, {:.2}, {:.2})", spawn.x, spawn.y, spawn.z);

    match tilehop_audio::probe_track(&config.audio.track) {
        Ok(info) => println!(
            "audio: {} ({} ch, {} Hz)",
            config.audio.track.display(),
            info.channels,
            info.sample_rate
        ),
        Err(e) => println!("audio: unavailable ({e})"),
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Info => print_info(&config)?,
        Commands::Simulate {
            frames,
            seed,
            script,
            draws,
            json,
        } => {
            if let Some(seed) = seed {
                config.world.seed = seed;
            }
            let script = match &script {
                Some(path) => read_script(path)?,
                None => vec![Vec::new(); frames as usize],
            };
            let mut world = World::new(config).context("invalid game configuration")?;
            tracing::info!(
                seed = world.config().world.seed,
                frames = script.len(),
                "simulation started"
            );

            let report = simulate(&mut world, &script, draws);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report.final_frame);
                println!("{}", report.summary);
                println!(
                    "frames={} quit={} events={} hash={:#018x}",
                    report.frames_run,
                    report.quit,
                    report.events.len(),
                    report.state_hash
                );
            }
        }
        Commands::Config => {
            config.validate().context("invalid game configuration")?;
            print!("{}", config.to_yaml()?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilehop_common::{CameraMode, Direction};

    fn world() -> World {
        World::new(GameConfig::default()).unwrap()
    }

    #[test]
    fn idle_run_steps_every_frame() {
        let mut w = world();
        let report = simulate(&mut w, &vec![Vec::new(); 25], false);
        assert_eq!(report.frames_run, 25);
        assert!(!report.quit);
        assert_eq!(report.summary.frame, 25);
        assert!(report.final_frame.starts_with("=== Frame 25"));
    }

    #[test]
    fn quit_stops_the_run() {
        let mut w = world();
        let script = tilehop_input::parse_script("wait 3\nquit\nwait 10\n").unwrap();
        let report = simulate(&mut w, &script, false);
        assert_eq!(report.frames_run, 4);
        assert!(report.quit);
    }

    #[test]
    fn report_keeps_gameplay_events_only() {
        let mut w = world();
        let script = vec![vec![Intent::SwitchCamera(CameraMode::Top)], Vec::new()];
        let report = simulate(&mut w, &script, false);
        assert!(
            report
                .events
                .iter()
                .all(|e| !matches!(e, WorldEvent::Stepped { .. }))
        );
        assert!(report.events.iter().any(|e| matches!(
            e,
            WorldEvent::CameraSwitched {
                to: CameraMode::Top,
                ..
            }
        )));
    }

    #[test]
    fn same_script_same_hash() {
        let script = vec![
            vec![Intent::step(Direction::Right)],
            vec![Intent::Jump],
            Vec::new(),
        ];
        let a = simulate(&mut world(), &script, false);
        let b = simulate(&mut world(), &script, false);
        assert_eq!(a.state_hash, b.state_hash);
    }

    #[test]
    fn json_report_serialises() {
        let mut w = world();
        let report = simulate(&mut w, &[vec![Intent::Jump]], false);
        let value: serde_json::Value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["frames_run"], 1);
        assert!(value.get("final_frame").is_none());
        assert!(value["events"].is_array());
    }

    #[test]
    fn bundled_demo_script_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/tour.hop");
        let script = read_script(&path).unwrap();
        assert!(script.len() > 50);
    }

    #[test]
    fn frame_count_is_bounded() {
        let too_many = (MAX_SCRIPT_FRAMES + 1).to_string();
        assert!(Cli::try_parse_from(["tilehop-cli", "simulate", "--frames", &too_many]).is_err());
        assert!(Cli::try_parse_from(["tilehop-cli", "simulate", "--frames", "0"]).is_err());
    }

    #[test]
    fn simulate_flags_parse() {
        let cli = Cli::parse_from([
            "tilehop-cli",
            "simulate",
            "--seed",
            "7",
            "--frames",
            "10",
            "--json",
        ]);
        match cli.command {
            Commands::Simulate {
                seed, frames, json, ..
            } => {
                assert_eq!(seed, Some(7));
                assert_eq!(frames, 10);
                assert!(json);
            }
            _ => panic!("expected simulate"),
        }
    }
}
