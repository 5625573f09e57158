use std::path::PathBuf;

use clap::Parser;
use eframe::egui;
use egui_plot::{Legend, Line, Plot};

use lander_sim::gnc::Controller;
use lander_sim::sim::{EventLog, FlightEvent, SCENARIO_NAMES};
use lander_sim::{Autopilot, ControlPanel, ManualInput, SimConfig, Simulation, Telemetry};

/// Fly one scenario headless and plot its telemetry.
#[derive(Debug, Parser)]
#[command(name = "lander-viz", version, about)]
struct Args {
    #[arg(short, long, default_value_t = 1)]
    scenario: usize,
    #[arg(long)]
    script: Option<PathBuf>,
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long, default_value_t = 3600.0)]
    max_time: f64,
}

fn fly(args: &Args) -> anyhow::Result<SimViz> {
    let config = match &args.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    let mut sim = Simulation::new(&config);
    let mut panel = ControlPanel::default();
    sim.set_scenario(args.scenario, &panel.custom_scenario)?;
    panel.selected_scenario = args.scenario;

    let mut autopilot = args.script.as_ref().map(|p| Autopilot::load(p, &mut panel.message_log));
    panel.autopilot_active = autopilot.as_ref().is_some_and(Autopilot::is_loaded);

    let input = ManualInput::default();
    let mut events = EventLog::standard();
    let mut trace = vec![Telemetry::capture(&sim)];
    // Keep roughly ten samples per simulated second.
    let stride = ((0.1 / sim.timestep).round() as usize).max(1);
    let mut tick = 0usize;

    while sim.time < args.max_time {
        sim.step(&mut panel, &input, autopilot.as_mut().map(|ap| ap as &mut dyn Controller));
        tick += 1;
        let t = Telemetry::capture(&sim);
        events.observe(&t);
        let done = t.landed || t.crashed || t.paused;
        if done || tick % stride == 0 {
            trace.push(t);
        }
        if done {
            break;
        }
    }

    Ok(SimViz {
        scenario: sim.scenario_id,
        trace,
        events: events.events,
        messages: panel.message_log,
    })
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let app = fly(&args)?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native("Lander Descent Viewer", options, Box::new(|_| Ok(Box::new(app))))
        .map_err(|e| anyhow::anyhow!("viewer failed: {e}"))
}

struct SimViz {
    scenario: usize,
    trace: Vec<Telemetry>,
    events: Vec<FlightEvent>,
    messages: Vec<String>,
}

impl SimViz {
    fn series(&self, f: impl Fn(&Telemetry) -> f64) -> Vec<[f64; 2]> {
        self.trace
            .iter()
            .map(|t| [t.time, f(t)])
            .filter(|p| p[1].is_finite())
            .collect()
    }
}

impl eframe::App for SimViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            let name = SCENARIO_NAMES.get(self.scenario).copied().unwrap_or("unknown");
            ui.heading(format!("Scenario {}: {}", self.scenario, name));
            if let Some(last) = self.trace.last() {
                let outcome = if last.crashed {
                    "crashed"
                } else if last.landed {
                    "landed"
                } else {
                    "in flight"
                };
                ui.label(format!(
                    "Outcome: {}  |  Flight: {:.0} s  |  Fuel left: {:.1}%  |  Delta-v left: {:.3} km/s",
                    outcome,
                    last.time,
                    last.fuel_level * 100.0,
                    last.delta_v,
                ));
            }
            let events: Vec<String> =
                self.events.iter().map(|e| format!("{} @ {:.1}s", e.kind.label(), e.time)).collect();
            if !events.is_empty() {
                ui.label(events.join("  |  "));
            }
        });

        if !self.messages.is_empty() {
            egui::SidePanel::right("messages").show(ctx, |ui| {
                ui.label("Autopilot log");
                egui::ScrollArea::vertical().show(ui, |ui| {
                    for line in &self.messages {
                        ui.monospace(line);
                    }
                });
            });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let half_w = available.x / 2.0 - 8.0;
            let half_h = available.y / 2.0 - 8.0;

            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label("Altitude (km)");
                    let points = self.series(|t| t.altitude);
                    Plot::new("altitude")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Altitude", points));
                        });
                });

                ui.vertical(|ui| {
                    ui.label("Speed (m/s)");
                    let speed = self.series(|t| t.surface_speed * 1000.0);
                    let descent = self.series(|t| t.descent_rate * 1000.0);
                    let ground = self.series(|t| t.ground_speed * 1000.0);
                    Plot::new("speed")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .legend(Legend::default())
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Surface speed", speed));
                            plot_ui.line(Line::new("Descent rate", descent));
                            plot_ui.line(Line::new("Ground speed", ground));
                        });
                });
            });

            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label("Propulsion");
                    let fuel = self.series(|t| t.fuel_level);
                    let throttle = self.series(|t| t.me_throttle);
                    Plot::new("propulsion")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .legend(Legend::default())
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Fuel level", fuel));
                            plot_ui.line(Line::new("Main engine", throttle));
                        });
                });

                ui.vertical(|ui| {
                    ui.label("Apsides altitude (km)");
                    let peri = self.series(|t| t.periapsis_alt);
                    let apo = self.series(|t| t.apoapsis_alt);
                    Plot::new("apsides")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .legend(Legend::default())
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Periapsis", peri));
                            plot_ui.line(Line::new("Apoapsis", apo));
                        });
                });
            });
        });
    }
}
