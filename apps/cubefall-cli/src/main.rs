use anyhow::Context;
use clap::{Parser, Subcommand};
use cubefall_common::DemoConfig;
use cubefall_input::FrameInput;
use cubefall_kernel::{SceneEvent, Viewer};
use cubefall_physics::rapier_scene;
use cubefall_render::{DebugTextRenderer, RenderView, Renderer};
use cubefall_tools::SceneInspector;
use glam::Vec3;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cubefall-cli", about = "Headless runner for the cubefall scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON config file; defaults are used when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and effective settings
    Info,
    /// Drive the scene without a window
    Run {
        /// Number of frames to run
        #[arg(short, long, default_value = "600")]
        frames: u64,
        /// Frame time in seconds (defaults to one physics step)
        #[arg(long)]
        dt: Option<f64>,
        /// Press the spawn input every N frames (0 disables, minimum 2)
        #[arg(long, default_value = "60", value_parser = parse_spawn_every)]
        spawn_every: u64,
        /// Print the draw list every N frames (0 prints only the last frame)
        #[arg(long, default_value = "0")]
        print_every: u64,
    },
    /// Print the effective config as JSON
    Config {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// A press needs a released frame after it, so a period of 1 would hold
/// spawn for the whole run.
fn parse_spawn_every(text: &str) -> Result<u64, String> {
    let every: u64 = text.parse().map_err(|e| format!("{e}"))?;
    if every == 1 {
        return Err("must be 0 or at least 2".into());
    }
    Ok(every)
}

/// Spawn is held on the first frame of every `every`-frame window, so each
/// window produces exactly one press.
fn spawn_input(frame: u64, every: u64) -> FrameInput {
    if every > 0 && frame % every == 0 {
        FrameInput::spawning()
    } else {
        FrameInput::idle()
    }
}

fn run(
    config: &DemoConfig,
    frames: u64,
    dt: Option<f64>,
    spawn_every: u64,
    print_every: u64,
) -> anyhow::Result<()> {
    let dt = dt.unwrap_or(config.physics.step_size);
    let eye = config.window.camera_start;
    let viewer = Viewer::new(eye, Vec3::NEG_Z);
    let view = RenderView::from_viewer(&viewer, &config.window);

    let mut scene = rapier_scene(config, eye).context("failed to build scene")?;
    let mut renderer = DebugTextRenderer::new();
    let mut spawned = 0u64;
    let mut evicted = 0u64;

    println!("Running {frames} frames at dt={dt:.5}s (step {:.5}s)", config.physics.step_size);
    for frame in 0..frames {
        let input = spawn_input(frame, spawn_every);
        let result = scene
            .frame(dt, &input, &viewer)
            .with_context(|| format!("frame {frame} failed"))?;
        spawned += result.spawned.is_some() as u64;
        evicted += result.evicted.len() as u64;

        let last = frame + 1 == frames;
        if last || (print_every > 0 && (frame + 1) % print_every == 0) {
            print!("{}", renderer.render(&result.draws, &view));
        }
        for event in scene.drain_events() {
            if let SceneEvent::Teleported { id, to } = event {
                println!("teleported {id} to {to}");
            }
        }
    }

    println!("{}", SceneInspector::summary(&scene));
    println!("Spawned: {spawned}  Evicted: {evicted}");
    let released = scene.shutdown().context("shutdown failed")?;
    println!("Released {released} actors");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    let config = DemoConfig::load_or_default(cli.config.as_deref())
        .context("failed to load configuration")?;

    match cli.command {
        Commands::Info => {
            println!("cubefall-cli v{}", env!("CARGO_PKG_VERSION"));
            let p = &config.physics;
            println!(
                "physics: step={:.5}s gravity={} activation={:?} overflow={:?}",
                p.step_size, p.gravity, p.activation, p.overflow
            );
            let s = &config.scene;
            println!(
                "scene: stack={}x{} cull={} projectile r={} v={}",
                s.stack_columns, s.stack_layers, s.cull_distance, s.projectile_radius, s.projectile_speed
            );
            println!(
                "trigger: {}",
                match &s.trigger {
                    Some(t) if t.teleport_to.is_some() => "log + teleport",
                    Some(_) => "log only",
                    None => "none",
                }
            );
        }
        Commands::Run {
            frames,
            dt,
            spawn_every,
            print_every,
        } => run(&config, frames, dt, spawn_every, print_every)?,
        Commands::Config { output } => {
            let json = config.to_json_pretty();
            match output {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("wrote {}", path.display());
                }
                None => println!("{json}"),
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_schedule_presses_once_per_window() {
        let presses = (0..300)
            .map(|f| spawn_input(f, 60))
            .filter(|i| i.spawn_held)
            .count();
        assert_eq!(presses, 5);
        assert!(!(0..100).any(|f| spawn_input(f, 0).spawn_held));
    }

    #[test]
    fn spawn_every_one_rejected() {
        let parsed = Cli::try_parse_from(["cubefall-cli", "run", "--spawn-every", "1"]);
        assert!(parsed.is_err());
        let parsed = Cli::try_parse_from(["cubefall-cli", "run", "--spawn-every", "0"]);
        assert!(parsed.is_ok());
    }

    #[test]
    fn every_other_frame_spawns_each_press() {
        let presses: Vec<bool> = (0..6).map(|f| spawn_input(f, 2).spawn_held).collect();
        assert_eq!(presses, vec![true, false, true, false, true, false]);
    }

    #[test]
    fn cli_parses_run() {
        let cli = Cli::try_parse_from([
            "cubefall-cli",
            "--config",
            "demo.json",
            "run",
            "--frames",
            "10",
            "--spawn-every",
            "2",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("demo.json")));
        assert!(matches!(
            cli.command,
            Commands::Run {
                frames: 10,
                spawn_every: 2,
                dt: None,
                ..
            }
        ));
    }

    #[test]
    fn short_run_completes() {
        let mut config = DemoConfig::default();
        config.scene.stack_columns = 2;
        config.scene.stack_layers = 2;
        run(&config, 20, None, 5, 0).unwrap();
    }
}
