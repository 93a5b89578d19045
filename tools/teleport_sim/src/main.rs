use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use cgmath::{Vector3, vec3};
use clap::Parser;
use engine::{
    Time,
    logging::{Level, LogConfig, init_logging_with_config},
};
use vr_teleport::{
    Effect, EffectQueue, Handedness,
    teleport::{TeleportConfig, TeleportSinks, TeleportSystem},
};

/// Simulator events, gated by the `sim` scope of `TELEPORT_LOG`.
macro_rules! sim_log {
    ($level:ident, $($arg:tt)*) => {
        engine::scoped_log!($level, "sim", $($arg)*)
    };
}

mod scene;
mod script;
mod sinks;

use script::InputScript;
use sinks::{ArcLog, LandingMarker};

#[derive(Parser)]
#[command(name = "teleport_sim")]
#[command(about = "Run a scripted arc-teleport session against a test level")]
#[command(version)]
struct Cli {
    /// JSON teleport configuration; unspecified fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of frames to simulate
    #[arg(long, default_value_t = 180)]
    frames: u32,

    #[arg(long, default_value_t = 72.0)]
    frame_rate: f32,

    /// Override the number of arc segments
    #[arg(long)]
    segments: Option<usize>,

    /// Frame of the first press of the double-click that starts aiming
    #[arg(long, default_value_t = 10)]
    start_frame: u32,

    /// Frame of the first press of the double-click that stops aiming
    #[arg(long)]
    stop_frame: Option<u32>,

    /// Frames on which the confirm trigger is pressed
    #[arg(long, value_delimiter = ',', default_value = "60")]
    confirm: Vec<u32>,

    /// Thumbstick Y held while aiming, in [-1, 1]
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    extend: f32,

    /// Downward tilt of the pointing hand in degrees
    #[arg(long, default_value_t = 20.0, allow_hyphen_values = true)]
    pitch: f32,

    /// Place a wall this far in front of the player
    #[arg(long)]
    wall_distance: Option<f32>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(cli: &Cli) -> Result<TeleportConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading teleport config {}", path.display()))?;
            TeleportConfig::from_json_str(&text)
                .with_context(|| format!("parsing teleport config {}", path.display()))?
        }
        None => TeleportConfig::default(),
    };

    if let Some(segments) = cli.segments {
        config.segment_count = segments;
    }

    config.validate().context("invalid teleport config")?;
    Ok(config)
}

/// INFO unless `TELEPORT_LOG` says otherwise; `--verbose` raises the global
/// level to DEBUG either way.
fn build_log_config(env_value: Option<&str>, verbose: bool) -> LogConfig {
    let mut config = match env_value {
        Some(value) => LogConfig::parse(value),
        None => {
            let mut config = LogConfig::new();
            config.set_global_level(Level::INFO);
            config
        }
    };
    if verbose {
        config.set_global_level(Level::DEBUG);
    }
    config
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let env_value = std::env::var("TELEPORT_LOG").ok();
    init_logging_with_config(build_log_config(env_value.as_deref(), cli.verbose));

    anyhow::ensure!(cli.frame_rate > 0.0, "frame rate must be positive");
    let config = load_config(&cli)?;
    sim_log!(
        info,
        segments = config.segment_count,
        hand = ?config.hand,
        "Starting teleport_sim"
    );

    let level = scene::build_test_level(40.0, cli.wall_distance);
    let hand_offset = match config.hand {
        Handedness::Left => vec3(-0.2, 1.2, -0.3),
        Handedness::Right => vec3(0.2, 1.2, -0.3),
    };
    let script = InputScript {
        hand: config.hand,
        start_aiming_frame: Some(cli.start_frame),
        stop_aiming_frame: cli.stop_frame,
        confirm_frames: cli.confirm.clone(),
        extend_axis: cli.extend.clamp(-1.0, 1.0),
        pitch_degrees: cli.pitch,
        hand_offset,
    };

    let mut system = TeleportSystem::new(config);
    let mut arc = ArcLog::default();
    let mut marker = LandingMarker::default();
    let mut effects = EffectQueue::new();
    system.initialize(&mut TeleportSinks {
        renderer: &mut arc,
        marker: &mut marker,
        relocation: &mut effects,
    });

    let mut player_position: Vector3<f32> = vec3(0.0, 0.0, 0.0);
    let mut relocations = 0;

    for frame in 0..cli.frames {
        let time = Time::at_frame(frame, cli.frame_rate);
        let input = script.input_for_frame(frame, player_position);

        let update = system.update_from_input_context(
            &time,
            &input,
            &level,
            &mut TeleportSinks {
                renderer: &mut arc,
                marker: &mut marker,
                relocation: &mut effects,
            },
        );

        if let Some(state) = update.transition {
            sim_log!(info, frame, ?state, "teleport mode changed");
        }

        for effect in effects.drain() {
            match effect {
                Effect::SetPlayerPosition { position, .. } => {
                    sim_log!(
                        info,
                        frame,
                        from = ?player_position,
                        to = ?position,
                        "teleported"
                    );
                    player_position = position;
                    relocations += 1;
                }
            }
        }

        sim_log!(
            debug,
            frame,
            aiming = system.is_aiming(),
            reach = system.reach(),
            drawing = arc.drawing,
            points = arc.points.len(),
            marker_visible = marker.visible,
            marker = ?marker.position,
            queries = update.result.queries,
            "frame"
        );
    }

    sim_log!(
        info,
        aiming = system.is_aiming(),
        player = ?player_position,
        relocations,
        arc_length = system.trajectory().arc_length(),
        "Simulation finished"
    );

    Ok(())
}
