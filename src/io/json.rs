use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::sim::{FlightEvent, Telemetry, SCENARIO_NAMES};

/// Summary statistics computed from a recorded flight.
#[derive(Debug, Clone)]
pub struct FlightSummary {
    pub scenario_id: usize,
    pub outcome: &'static str,
    pub flight_time: f64,
    pub max_altitude: f64,
    pub min_altitude: f64,
    pub max_speed: f64,
    pub final_descent_rate: f64,
    pub final_ground_speed: f64,
    pub fuel_used: f64,
    pub final_mass: f64,
    pub delta_v_remaining: f64,
    pub events: Vec<(f64, String)>,
}

impl FlightSummary {
    /// Compute summary from telemetry samples. `None` for an empty record.
    pub fn from_samples(samples: &[Telemetry], events: &[FlightEvent]) -> Option<Self> {
        let first = samples.first()?;
        let last = samples.last()?;

        let max_altitude = samples.iter().map(|t| t.altitude).fold(f64::NEG_INFINITY, f64::max);
        let min_altitude = samples.iter().map(|t| t.altitude).fold(f64::INFINITY, f64::min);
        let max_speed = samples.iter().map(|t| t.speed).fold(0.0_f64, f64::max);

        let outcome = if last.crashed {
            "crashed"
        } else if last.landed {
            "landed"
        } else {
            "in flight"
        };

        Some(FlightSummary {
            scenario_id: last.scenario_id,
            outcome,
            flight_time: last.time,
            max_altitude,
            min_altitude,
            max_speed,
            final_descent_rate: last.descent_rate,
            final_ground_speed: last.ground_speed,
            fuel_used: first.mass - last.mass,
            final_mass: last.mass,
            delta_v_remaining: last.delta_v,
            events: events.iter().map(|e| (e.time, e.kind.label())).collect(),
        })
    }
}

#[derive(Serialize)]
struct ScenarioRef<'a> {
    id: usize,
    name: &'a str,
}

#[derive(Serialize)]
struct Performance {
    flight_time_s: f64,
    max_altitude_km: f64,
    min_altitude_km: f64,
    max_speed_kms: f64,
    final_descent_rate_kms: f64,
    final_ground_speed_kms: f64,
    fuel_used_kg: f64,
    final_mass_kg: f64,
    delta_v_remaining_kms: f64,
}

#[derive(Serialize)]
struct EventEntry<'a> {
    time_s: f64,
    event: &'a str,
}

#[derive(Serialize)]
struct Report<'a> {
    scenario: ScenarioRef<'a>,
    outcome: &'a str,
    performance: Performance,
    events: Vec<EventEntry<'a>>,
}

/// Write flight summary as pretty-printed JSON to a writer.
pub fn write_summary<W: Write>(writer: &mut W, summary: &FlightSummary) -> io::Result<()> {
    let name = SCENARIO_NAMES.get(summary.scenario_id).copied().unwrap_or("unknown");
    let report = Report {
        scenario: ScenarioRef { id: summary.scenario_id, name },
        outcome: summary.outcome,
        performance: Performance {
            flight_time_s: summary.flight_time,
            max_altitude_km: summary.max_altitude,
            min_altitude_km: summary.min_altitude,
            max_speed_kms: summary.max_speed,
            final_descent_rate_kms: summary.final_descent_rate,
            final_ground_speed_kms: summary.final_ground_speed,
            fuel_used_kg: summary.fuel_used,
            final_mass_kg: summary.final_mass,
            delta_v_remaining_kms: summary.delta_v_remaining,
        },
        events: summary
            .events
            .iter()
            .map(|(time, label)| EventEntry { time_s: *time, event: label })
            .collect(),
    };
    to_writer_pretty(&mut *writer, &report)?;
    writeln!(writer)
}

/// Write flight summary JSON to a file.
pub fn write_summary_file<P: AsRef<Path>>(path: P, summary: &FlightSummary) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_summary(&mut file, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::EventKind;

    fn simple_flight() -> Vec<Telemetry> {
        vec![
            Telemetry { altitude: 10.0, speed: 0.0, mass: 200.0, scenario_id: 1, ..Telemetry::default() },
            Telemetry { time: 30.0, altitude: 8.5, speed: 0.11, mass: 195.0, scenario_id: 1, ..Telemetry::default() },
            Telemetry {
                time: 60.0,
                altitude: 0.0,
                speed: 0.0008,
                mass: 190.0,
                scenario_id: 1,
                landed: true,
                ..Telemetry::default()
            },
        ]
    }

    #[test]
    fn summary_computes_extremes() {
        let s = FlightSummary::from_samples(&simple_flight(), &[]).unwrap();
        assert_eq!(s.max_altitude, 10.0);
        assert_eq!(s.min_altitude, 0.0);
        assert!((s.max_speed - 0.11).abs() < 1e-12);
        assert!((s.fuel_used - 10.0).abs() < 1e-12);
        assert_eq!(s.outcome, "landed");
    }

    #[test]
    fn empty_record_has_no_summary() {
        assert!(FlightSummary::from_samples(&[], &[]).is_none());
    }

    #[test]
    fn json_output_parses_back() {
        let flight = simple_flight();
        let events = vec![
            FlightEvent { time: 30.0, kind: EventKind::Altitude(10.0), telemetry: flight[1].clone() },
            FlightEvent { time: 60.0, kind: EventKind::Touchdown, telemetry: flight[2].clone() },
        ];
        let summary = FlightSummary::from_samples(&flight, &events).unwrap();

        let mut buf = Vec::new();
        write_summary(&mut buf, &summary).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(json["scenario"]["id"], 1);
        assert_eq!(json["scenario"]["name"], "10 km descent");
        assert_eq!(json["outcome"], "landed");
        assert_eq!(json["performance"]["fuel_used_kg"], 10.0);
        assert_eq!(json["events"][1]["event"], "TOUCHDOWN");
        assert_eq!(json["events"][1]["time_s"], 60.0);
    }

    #[test]
    fn control_characters_are_escaped() {
        let mut summary = FlightSummary::from_samples(&simple_flight(), &[]).unwrap();
        summary.events.push((1.0, "line\nbreak\t\"quoted\"\u{1}".to_string()));

        let mut buf = Vec::new();
        write_summary(&mut buf, &summary).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(json["events"][0]["event"], "line\nbreak\t\"quoted\"\u{1}");
    }
}
