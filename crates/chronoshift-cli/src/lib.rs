//! # Chronoshift CLI
//!
//! Headless driver for the Chronoshift platformer.
//!
//! ## Commands
//! - `periods` - Print the time period registry
//! - `levels` - Dump level layouts as JSON
//! - `run` - Play a session headlessly from a key script

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use chronoshift_core::level::{LevelCatalog, MAX_LEVEL};
use chronoshift_core::period::TimePeriod;
use chronoshift_core::time::DeltaTime;
use chronoshift_game::{FrameSnapshot, GameEvent, HudSnapshot, Session, SessionConfig};

/// Chronoshift headless driver
#[derive(Parser)]
#[command(name = "chronoshift")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Print the time period registry
    Periods,

    /// Dump level layouts as JSON
    Levels {
        /// Only this level
        #[arg(short, long)]
        level: Option<u32>,

        /// Seed for level 3 heights
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Run a session headlessly and print the final state as JSON
    Run {
        /// Number of 60 Hz frames to simulate
        #[arg(short, long, default_value = "600")]
        frames: u64,

        /// Key script: JSON array of { "frame", "key", "pressed" }
        #[arg(long)]
        script: Option<PathBuf>,

        /// Session config JSON; omitted fields keep their defaults
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Seed for level 3 heights and portal particles
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

/// One scripted key event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptedKey {
    /// Frame the event is delivered before
    pub frame: u64,
    /// Host key identifier, e.g. "d", "ArrowUp", " "
    pub key: String,
    #[serde(default = "pressed_default")]
    pub pressed: bool,
}

fn pressed_default() -> bool {
    true
}

/// Outcome of a headless run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub frames: u64,
    pub events: Vec<GameEvent>,
    pub hud: HudSnapshot,
    pub snapshot: FrameSnapshot,
}

/// Parse a key script, ordered by frame
pub fn parse_script(json: &str) -> Result<Vec<ScriptedKey>> {
    let mut script: Vec<ScriptedKey> = serde_json::from_str(json).context("Invalid key script")?;
    script.sort_by_key(|entry| entry.frame);
    Ok(script)
}

fn load_script(path: &Path) -> Result<Vec<ScriptedKey>> {
    let json = fs::read_to_string(path).with_context(|| format!("Failed to read script {}", path.display()))?;
    parse_script(&json).with_context(|| format!("Failed to parse script {}", path.display()))
}

fn load_config(path: &Path) -> Result<SessionConfig> {
    let json = fs::read_to_string(path).with_context(|| format!("Failed to read config {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Failed to parse config {}", path.display()))
}

/// Start a game and replay `script` for `frames` frames of 1/60 s
pub fn run_headless(config: SessionConfig, script: &[ScriptedKey], frames: u64) -> Result<RunReport> {
    let mut session = Session::new(config).context("Invalid session config")?;
    session.start_game();

    let frame_time = DeltaTime::from_secs(1.0 / 60.0);
    let mut pending = script.iter().peekable();
    let mut events = Vec::new();

    for frame in 0..frames {
        while let Some(entry) = pending.next_if(|entry| entry.frame <= frame) {
            log::debug!("Frame {}: {} {}", frame, entry.key, if entry.pressed { "down" } else { "up" });
            if entry.pressed {
                session.on_key_down(&entry.key);
            } else {
                session.on_key_up(&entry.key);
            }
        }

        session.update(frame_time);

        for event in session.drain_events() {
            log::info!("Frame {}: {}", frame, event.name());
            events.push(event);
        }
    }

    Ok(RunReport {
        frames,
        events,
        hud: session.hud(),
        snapshot: session.snapshot(),
    })
}

fn print_periods() {
    println!("{:<8} {:<8} {:<8} {:<8}", "NAME", "LABEL", "AMBIENT", "FOG");
    for period in TimePeriod::ALL {
        let info = period.info();
        println!(
            "{:<8} {:<8} #{:06X}  #{:06X}",
            period.name(),
            info.label,
            info.ambient_color,
            info.fog_color
        );
    }
}

fn dump_levels(level: Option<u32>, seed: Option<u64>) -> Result<()> {
    let mut catalog = match seed {
        Some(seed) => LevelCatalog::with_seed(seed),
        None => LevelCatalog::new(),
    };

    let indices: Vec<u32> = match level {
        Some(index) if !LevelCatalog::contains(index) => bail!("No level {} (levels are 1..={})", index, MAX_LEVEL),
        Some(index) => vec![index],
        None => (1..=MAX_LEVEL).collect(),
    };

    let mut levels = Vec::with_capacity(indices.len());
    for index in indices {
        levels.push(catalog.build_level(index)?);
    }

    println!("{}", serde_json::to_string_pretty(&levels)?);
    Ok(())
}

/// Execute the CLI command
pub fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    match cli.command {
        Commands::Periods => print_periods(),

        Commands::Levels { level, seed } => dump_levels(level, seed)?,

        Commands::Run { frames, script, config, seed } => {
            let mut config = match config {
                Some(path) => load_config(&path)?,
                None => SessionConfig::default(),
            };
            if seed.is_some() {
                config.level_seed = seed;
            }

            let script = match script {
                Some(path) => load_script(&path)?,
                None => Vec::new(),
            };

            log::info!("Running {} frames with {} scripted keys", frames, script.len());
            let report = run_headless(config, &script, frames)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
