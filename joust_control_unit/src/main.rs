//! # Joust Control Unit
//!
//! Runs the knight against a hardware backend. Loads the TOML config (all
//! sections optional), assembles the framework, starts the tick source and
//! enters the paced dispatch loop until Ctrl-C, the cycle limit, or a
//! service fault.

use clap::{Parser, ValueEnum};
use joust_common::command::Side;
use joust_common::config::ConfigError;
use joust_common::hal::driver::Hardware;
use joust_control_unit::config::JoustConfig;
use joust_control_unit::cycle::{CycleRunner, TickCounter, build_framework, spawn_ticker};
use joust_hal::DriverRegistry;
use joust_hal::drivers::console::StdinConsole;
use joust_hal::drivers::simulation::SimulatedRobot;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;

/// Side-select switch position for the simulated robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SideArg {
    Red,
    Dark,
}

impl From<SideArg> for Side {
    fn from(arg: SideArg) -> Self {
        match arg {
            SideArg::Red => Side::Red,
            SideArg::Dark => Side::Dark,
        }
    }
}

/// Joust Control Unit: autonomous knight event loop
#[derive(Parser, Debug)]
#[command(name = "joust_control_unit")]
#[command(author = "RTS007")]
#[command(version)]
#[command(about = "Event-driven control loop for a jousting robot")]
struct Args {
    /// Path to the TOML configuration. Missing file falls back to defaults.
    #[arg(short, long, default_value = "config/joust.toml")]
    config: PathBuf,

    /// Hardware backend name.
    #[arg(long, default_value = "simulation")]
    driver: String,

    /// Side switch position (simulation backend only).
    #[arg(long, value_enum, default_value_t = SideArg::Dark)]
    side: SideArg,

    /// Feed stdin keystrokes to the console (simulation backend only).
    #[arg(long)]
    keyboard: bool,

    /// Stop after this many cycles.
    #[arg(long)]
    cycles: Option<u64>,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            setup_tracing(&args, None);
            error!("FATAL: {e}");
            process::exit(1);
        }
    };
    setup_tracing(&args, Some(&config));

    info!(
        "Joust Control Unit v{} starting ({})",
        env!("CARGO_PKG_VERSION"),
        config.shared.service_name
    );

    if let Err(e) = run(&args, &config) {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("Joust Control Unit shutdown complete");
}

fn load_config(args: &Args) -> Result<JoustConfig, ConfigError> {
    match JoustConfig::from_file(&args.config) {
        Err(ConfigError::FileNotFound(_)) => Ok(JoustConfig::default()),
        other => other,
    }
}

fn run(args: &Args, config: &JoustConfig) -> Result<(), Box<dyn std::error::Error>> {
    if !args.config.exists() {
        warn!("Config {} not found, using defaults", args.config.display());
    }
    info!(
        "Config OK: tick={}µs, cycle={}µs, queue={}, mode={:?}",
        config.framework.tick_us,
        config.framework.cycle_time_us,
        config.framework.queue_capacity,
        config.command_bus.mode,
    );

    let hal = create_hal(args)?;
    let framework = build_framework(hal, config)?;
    info!(hal = framework.hal().name(), "Services initialized");

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    })?;

    let ticks = TickCounter::new();
    let ticker = spawn_ticker(
        ticks.clone(),
        Duration::from_micros(u64::from(config.framework.tick_us)),
        Arc::clone(&running),
    )?;

    let mut runner = CycleRunner::new(framework, ticks, config.framework.cycle_time_us)
        .with_cycle_limit(args.cycles);
    let result = runner.run(&running);

    running.store(false, Ordering::SeqCst);
    if ticker.join().is_err() {
        warn!("Ticker thread panicked");
    }
    result?;
    Ok(())
}

fn create_hal(args: &Args) -> Result<Box<dyn Hardware>, Box<dyn std::error::Error>> {
    if args.driver != "simulation" {
        return Ok(DriverRegistry::with_builtin().create(&args.driver)?);
    }
    let mut robot = SimulatedRobot::with_side(args.side.into());
    if args.keyboard {
        // The reader thread is detached; it ends with the process.
        let (_console, keys) = StdinConsole::spawn()?;
        robot.io_mut().attach_key_source(keys);
        info!("Keyboard console attached");
    }
    Ok(Box::new(robot))
}

fn setup_tracing(args: &Args, config: Option<&JoustConfig>) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        config
            .map(|c| c.shared.log_level.as_filter())
            .and_then(|s| s.parse().ok())
            .unwrap_or(Level::INFO)
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
