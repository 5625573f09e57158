use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn};
use nalgebra::Vector3;

use lander_sim::gnc::Controller;
use lander_sim::io::{write_summary_file, write_telemetry_file, FlightSummary};
use lander_sim::sim::{EventLog, CUSTOM_SCENARIO, SCENARIO_NAMES};
use lander_sim::{Autopilot, ControlPanel, ManualInput, SimConfig, Simulation, Telemetry};

/// Headless lander descent: run one scenario, optionally under a Lua
/// autopilot, and print a flight report.
#[derive(Debug, Parser)]
#[command(name = "lander-sim", version, about)]
struct Args {
    /// Scenario id (0-7 presets, 8 = custom)
    #[arg(short, long, default_value_t = 1)]
    scenario: usize,

    /// Lua autopilot script; it runs once per tick
    #[arg(long)]
    script: Option<PathBuf>,

    /// TOML configuration overriding the built-in Mars lander
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stop after this many simulated seconds
    #[arg(long, default_value_t = 3600.0)]
    max_time: f64,

    /// Telemetry samples per simulated second
    #[arg(long, default_value_t = 1.0)]
    sample_rate: f64,

    /// Write the sampled telemetry as CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write a JSON flight summary
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Seed for terrain, wind and debris (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Custom scenario position, km (planet-centred)
    #[arg(long, value_delimiter = ',', num_args = 3, allow_hyphen_values = true)]
    position: Option<Vec<f64>>,

    /// Custom scenario velocity, km/s
    #[arg(long, value_delimiter = ',', num_args = 3, allow_hyphen_values = true)]
    velocity: Option<Vec<f64>>,
}

fn vector(values: &[f64]) -> Vector3<f64> {
    Vector3::new(values[0], values[1], values[2])
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SimConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.sample_rate <= 0.0 {
        bail!("sample rate must be positive, got {}", args.sample_rate);
    }

    // -----------------------------------------------------------------------
    // World and control panel
    // -----------------------------------------------------------------------
    let mut sim = Simulation::new(&config);
    let mut panel = ControlPanel::default();
    for (flag, values) in [("position", &args.position), ("velocity", &args.velocity)] {
        if let Some(v) = values {
            if v.len() != 3 {
                bail!("--{flag} takes three comma-separated components");
            }
        }
    }
    if let Some(p) = &args.position {
        panel.custom_scenario.position = vector(p);
    }
    if let Some(v) = &args.velocity {
        panel.custom_scenario.velocity = vector(v);
    }
    if (args.position.is_some() || args.velocity.is_some()) && args.scenario != CUSTOM_SCENARIO {
        warn!("--position/--velocity only apply to scenario {CUSTOM_SCENARIO}");
    }

    sim.set_scenario(args.scenario, &panel.custom_scenario)?;
    panel.selected_scenario = args.scenario;

    let mut autopilot = match &args.script {
        Some(path) => {
            let ap = Autopilot::load(path, &mut panel.message_log);
            panel.autopilot_active = ap.is_loaded();
            Some(ap)
        }
        None => None,
    };

    // -----------------------------------------------------------------------
    // Run
    // -----------------------------------------------------------------------
    info!(
        "Scenario {} ({}), dt={:.5} s, max {:.0} s",
        sim.scenario_id, SCENARIO_NAMES[sim.scenario_id], sim.timestep, args.max_time
    );

    let input = ManualInput::default();
    let mut events = EventLog::standard();
    let mut samples = Vec::new();
    let sample_period = 1.0 / args.sample_rate;
    let mut next_sample = 0.0;

    let first = Telemetry::capture(&sim);
    events.observe(&first);
    samples.push(first);
    next_sample += sample_period;

    let mut ticks = 0usize;
    while sim.time < args.max_time {
        let controller = autopilot.as_mut().map(|ap| ap as &mut dyn Controller);
        sim.step(&mut panel, &input, controller);
        ticks += 1;

        let t = Telemetry::capture(&sim);
        events.observe(&t);
        let done = t.landed || t.crashed || t.paused;
        if done || t.time >= next_sample {
            samples.push(t);
            next_sample += sample_period;
        }
        if done {
            break;
        }
    }

    let Some(last) = samples.last().cloned() else {
        bail!("no telemetry recorded");
    };

    // -----------------------------------------------------------------------
    // Export
    // -----------------------------------------------------------------------
    if let Some(path) = &args.csv {
        write_telemetry_file(path, &samples)
            .with_context(|| format!("writing {}", path.display()))?;
        info!("Telemetry written to {}", path.display());
    }
    let summary = FlightSummary::from_samples(&samples, &events.events);
    if let (Some(path), Some(summary)) = (&args.summary, &summary) {
        write_summary_file(path, summary)
            .with_context(|| format!("writing {}", path.display()))?;
        info!("Summary written to {}", path.display());
    }

    // -----------------------------------------------------------------------
    // Report
    // -----------------------------------------------------------------------
    println!();
    println!("====================================================================");
    println!(
        "  LANDER DESCENT SIMULATION - scenario {} ({})",
        sim.scenario_id, SCENARIO_NAMES[sim.scenario_id]
    );
    println!("====================================================================");
    println!();

    let lander = &sim.lander;
    println!("  Lander");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Dry mass:      {:>9.1} kg    Fuel capacity: {:>8.1}",
        lander.attrs.dry_mass, lander.attrs.fuel_capacity
    );
    println!(
        "  Max thrust:    {:>9.3} kN    Max delta-v:   {:>8.3} km/s",
        last.max_thrust, last.max_delta_v
    );
    match &autopilot {
        Some(ap) if ap.is_loaded() => println!("  Autopilot:     {}", ap.name()),
        Some(ap) => println!("  Autopilot:     {} (unloaded)", ap.path()),
        None => println!("  Autopilot:     none"),
    }
    println!();

    if !panel.message_log.is_empty() {
        println!("  Messages");
        println!("  ──────────────────────────────────────────────────────────────────");
        for line in &panel.message_log {
            println!("  {line}");
        }
        println!();
    }

    println!("  Flight Events");
    println!("  ──────────────────────────────────────────────────────────────────");
    if events.events.is_empty() {
        println!("  (none)");
    }
    for e in &events.events {
        println!(
            "  {:<18} t={:>8.1}s   alt={:>9.4}km   v={:>8.5}km/s   vd={:>8.5}km/s",
            e.kind.label(),
            e.time,
            e.telemetry.altitude,
            e.telemetry.speed,
            e.telemetry.descent_rate,
        );
    }
    println!();

    if let Some(s) = &summary {
        println!("  Performance Summary");
        println!("  ──────────────────────────────────────────────────────────────────");
        println!("  Outcome:       {:>12}", s.outcome);
        println!("  Flight time:   {:>12.1} s", s.flight_time);
        println!("  Max altitude:  {:>12.3} km", s.max_altitude);
        println!("  Max speed:     {:>12.5} km/s", s.max_speed);
        println!(
            "  Touchdown:     {:>12.2} m/s descent, {:.2} m/s ground",
            s.final_descent_rate * 1000.0,
            s.final_ground_speed * 1000.0
        );
        println!("  Fuel used:     {:>12.3} kg", s.fuel_used);
        println!("  Delta-v left:  {:>12.4} km/s", s.delta_v_remaining);
        println!();
    }

    println!("  Trajectory");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>8}  {:>10}  {:>9}  {:>9}  {:>8}  {:>6}  {:>8}",
        "t (s)", "alt (km)", "v (km/s)", "vd (km/s)", "mass(kg)", "thr", "state"
    );
    println!("  {}", "─".repeat(66));

    let sample_interval = (samples.len() / 30).max(1);
    for (i, t) in samples.iter().enumerate() {
        if i % sample_interval != 0 && i != samples.len() - 1 {
            continue;
        }
        let state = if t.crashed {
            "CRASH"
        } else if t.landed {
            "LANDED"
        } else if t.me_throttle > 0.0 {
            "BURN"
        } else {
            "COAST"
        };
        println!(
            "  {:>8.1}  {:>10.4}  {:>9.5}  {:>9.5}  {:>8.2}  {:>6.2}  {:>8}",
            t.time, t.altitude, t.speed, t.descent_rate, t.mass, t.me_throttle, state
        );
    }

    println!();
    println!("  Simulation: {} ticks, dt={:.5} s", ticks, sim.timestep);
    println!("====================================================================");
    println!();

    Ok(())
}
