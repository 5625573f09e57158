use super::telemetry::Telemetry;
use crate::vehicle::ParachuteStatus;

// ---------------------------------------------------------------------------
// Flight events
// ---------------------------------------------------------------------------

/// Kinds of flight events.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    Touchdown,
    Crash,
    ParachuteDeployed,
    ParachuteLost,
    FuelExhausted,
    /// Descending through the given altitude, km.
    Altitude(f64),
}

impl EventKind {
    pub fn label(&self) -> String {
        match self {
            EventKind::Touchdown => "TOUCHDOWN".into(),
            EventKind::Crash => "CRASH".into(),
            EventKind::ParachuteDeployed => "CHUTE".into(),
            EventKind::ParachuteLost => "CHUTE LOST".into(),
            EventKind::FuelExhausted => "DRY".into(),
            EventKind::Altitude(km) => format!("ALT {:.1} km", km),
        }
    }
}

/// A discrete event observed between two telemetry snapshots.
#[derive(Debug, Clone)]
pub struct FlightEvent {
    pub time: f64,
    pub kind: EventKind,
    pub telemetry: Telemetry,
}

/// Trait for passive event detectors.
/// Implementations inspect consecutive snapshots and report events.
pub trait EventDetector {
    fn check(&mut self, prev: &Telemetry, current: &Telemetry) -> Option<EventKind>;
}

/// Landing or crash, from the flight state flags.
pub struct TouchdownDetector;

impl EventDetector for TouchdownDetector {
    fn check(&mut self, prev: &Telemetry, current: &Telemetry) -> Option<EventKind> {
        if current.crashed && !prev.crashed {
            Some(EventKind::Crash)
        } else if current.landed && !prev.landed {
            Some(EventKind::Touchdown)
        } else {
            None
        }
    }
}

/// Parachute opening or being torn off.
pub struct ParachuteDetector;

impl EventDetector for ParachuteDetector {
    fn check(&mut self, prev: &Telemetry, current: &Telemetry) -> Option<EventKind> {
        if prev.parachute == current.parachute {
            return None;
        }
        match current.parachute {
            ParachuteStatus::Deployed => Some(EventKind::ParachuteDeployed),
            // A scripted cut after landing is not a loss worth reporting.
            ParachuteStatus::Destroyed if !current.landed => Some(EventKind::ParachuteLost),
            _ => None,
        }
    }
}

/// Tank running dry.
pub struct FuelDetector;

impl EventDetector for FuelDetector {
    fn check(&mut self, prev: &Telemetry, current: &Telemetry) -> Option<EventKind> {
        if prev.fuel_level > 0.0 && current.fuel_level <= 0.0 {
            Some(EventKind::FuelExhausted)
        } else {
            None
        }
    }
}

/// Fires once when the lander descends through `altitude` (km).
pub struct AltitudeDetector {
    pub altitude: f64,
    fired: bool,
}

impl AltitudeDetector {
    pub fn new(altitude: f64) -> Self {
        Self { altitude, fired: false }
    }
}

impl EventDetector for AltitudeDetector {
    fn check(&mut self, prev: &Telemetry, current: &Telemetry) -> Option<EventKind> {
        if self.fired {
            return None;
        }
        if prev.altitude > self.altitude && current.altitude <= self.altitude {
            self.fired = true;
            Some(EventKind::Altitude(self.altitude))
        } else {
            None
        }
    }
}

/// Runs a set of detectors over a telemetry stream and keeps what they find.
pub struct EventLog {
    detectors: Vec<Box<dyn EventDetector>>,
    prev: Option<Telemetry>,
    pub events: Vec<FlightEvent>,
}

impl EventLog {
    pub fn new(detectors: Vec<Box<dyn EventDetector>>) -> Self {
        Self { detectors, prev: None, events: Vec::new() }
    }

    /// Touchdown, parachute and fuel detectors, plus altitude gates at
    /// 10 km and 1 km.
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(TouchdownDetector),
            Box::new(ParachuteDetector),
            Box::new(FuelDetector),
            Box::new(AltitudeDetector::new(10.0)),
            Box::new(AltitudeDetector::new(1.0)),
        ])
    }

    pub fn observe(&mut self, current: &Telemetry) {
        if let Some(prev) = &self.prev {
            for det in self.detectors.iter_mut() {
                if let Some(kind) = det.check(prev, current) {
                    self.events.push(FlightEvent {
                        time: current.time,
                        kind,
                        telemetry: current.clone(),
                    });
                }
            }
        }
        self.prev = Some(current.clone());
    }
}
