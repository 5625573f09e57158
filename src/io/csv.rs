use std::io::{self, Write};
use std::path::Path;

use crate::sim::Telemetry;

/// Write a telemetry time series in CSV format.
///
/// Columns: time, pos_x, pos_y, pos_z, vel_x, vel_y, vel_z,
///          altitude_km, speed, descent_rate, ground_speed,
///          mass, fuel_level, me_throttle, rcs_throttle,
///          periapsis_alt, apoapsis_alt, state
pub fn write_telemetry<W: Write>(writer: &mut W, samples: &[Telemetry]) -> io::Result<()> {
    writeln!(
        writer,
        "time,pos_x,pos_y,pos_z,vel_x,vel_y,vel_z,\
         altitude_km,speed,descent_rate,ground_speed,\
         mass,fuel_level,me_throttle,rcs_throttle,\
         periapsis_alt,apoapsis_alt,state"
    )?;

    for t in samples {
        let state = if t.crashed {
            "crashed"
        } else if t.landed {
            "landed"
        } else {
            "flying"
        };
        writeln!(
            writer,
            "{:.4},{:.6},{:.6},{:.6},{:.7},{:.7},{:.7},\
             {:.6},{:.7},{:.7},{:.7},\
             {:.4},{:.5},{:.3},{:.3},\
             {:.3},{:.3},{}",
            t.time,
            t.position.x, t.position.y, t.position.z,
            t.velocity.x, t.velocity.y, t.velocity.z,
            t.altitude,
            t.speed,
            t.descent_rate,
            t.ground_speed,
            t.mass,
            t.fuel_level,
            t.me_throttle,
            t.rcs_throttle,
            t.periapsis_alt,
            t.apoapsis_alt,
            state,
        )?;
    }

    Ok(())
}

/// Write a telemetry time series to a CSV file at the given path.
pub fn write_telemetry_file<P: AsRef<Path>>(path: P, samples: &[Telemetry]) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_telemetry(&mut file, samples)
}
