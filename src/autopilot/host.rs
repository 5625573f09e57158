use std::cell::RefCell;
use std::rc::Rc;

use mlua::{Lua, Result as LuaResult};

use super::command::{Command, Reference};
use crate::sim::Telemetry;

// ---------------------------------------------------------------------------
// Host API exposed to scripts
// ---------------------------------------------------------------------------

/// State shared between the sandbox owner and the registered host functions.
///
/// Telemetry is refreshed right before each `STEP()`; commands are drained
/// right after it.
#[derive(Debug, Default)]
pub struct Bridge {
    pub telemetry: Telemetry,
    pub commands: Vec<Command>,
}

pub type SharedBridge = Rc<RefCell<Bridge>>;

fn telemetry_fn(lua: &Lua, bridge: &SharedBridge, name: &str, read: fn(&Telemetry) -> f64) -> LuaResult<()> {
    let bridge = Rc::clone(bridge);
    let f = lua.create_function(move |_, ()| Ok(read(&bridge.borrow().telemetry)))?;
    lua.globals().set(name, f)
}

fn command_fn(lua: &Lua, bridge: &SharedBridge, name: &str, cmd: Command) -> LuaResult<()> {
    let bridge = Rc::clone(bridge);
    let f = lua.create_function(move |_, ()| {
        bridge.borrow_mut().commands.push(cmd.clone());
        Ok(())
    })?;
    lua.globals().set(name, f)
}

fn scalar_command_fn(lua: &Lua, bridge: &SharedBridge, name: &str, make: fn(f64) -> Command) -> LuaResult<()> {
    let bridge = Rc::clone(bridge);
    let f = lua.create_function(move |_, x: f64| {
        bridge.borrow_mut().commands.push(make(x));
        Ok(())
    })?;
    lua.globals().set(name, f)
}

/// Install every host function into the sandbox globals.
pub fn register(lua: &Lua, bridge: &SharedBridge) -> LuaResult<()> {
    // Telemetry
    telemetry_fn(lua, bridge, "TIME", |t| t.time)?;
    telemetry_fn(lua, bridge, "LANDER_ALT", |t| t.altitude)?;
    telemetry_fn(lua, bridge, "LANDER_VELOCITY", |t| t.speed)?;
    telemetry_fn(lua, bridge, "LANDER_SURFACE_VELOCITY", |t| t.surface_speed)?;
    telemetry_fn(lua, bridge, "LANDER_GROUND_SPEED", |t| t.ground_speed)?;
    telemetry_fn(lua, bridge, "LANDER_DESCENT_RATE", |t| t.descent_rate)?;
    telemetry_fn(lua, bridge, "LANDER_DELTA_V", |t| t.delta_v)?;
    telemetry_fn(lua, bridge, "LANDER_MAX_THRUST", |t| t.max_thrust)?;
    telemetry_fn(lua, bridge, "LANDER_WEIGHT", |t| t.weight)?;
    telemetry_fn(lua, bridge, "LANDER_MASS", |t| t.mass)?;
    telemetry_fn(lua, bridge, "PERIAPSIS_ALT", |t| t.periapsis_alt)?;
    telemetry_fn(lua, bridge, "APOAPSIS_ALT", |t| t.apoapsis_alt)?;

    // Attitude
    command_fn(lua, bridge, "MAINTAIN_ATTITUDE", Command::MaintainAttitude)?;
    let holds = [
        ("HOLD_PROGRADE", Reference::Prograde),
        ("HOLD_RETROGRADE", Reference::Retrograde),
        ("HOLD_NORMAL", Reference::Normal),
        ("HOLD_ANTINORMAL", Reference::Antinormal),
        ("HOLD_RADIAL", Reference::Radial),
        ("HOLD_ANTIRADIAL", Reference::Antiradial),
        ("HOLD_SURFACE_PROGRADE", Reference::SurfacePrograde),
        ("HOLD_SURFACE_RETROGRADE", Reference::SurfaceRetrograde),
    ];
    for (name, reference) in holds {
        command_fn(lua, bridge, name, Command::Hold(reference))?;
    }

    // Engines and parachute
    scalar_command_fn(lua, bridge, "SET_MAIN_ENGINE_THROTTLE", |x| {
        Command::SetMainEngineThrottle(x.clamp(0.0, 1.0))
    })?;
    scalar_command_fn(lua, bridge, "MAINTAIN_SURFACE_VELOCITY", Command::MaintainSurfaceVelocity)?;
    command_fn(lua, bridge, "DEPLOY_PARACHUTE", Command::DeployParachute)?;

    // Misc
    let info_bridge = Rc::clone(bridge);
    let info = lua.create_function(move |_, msg: String| {
        info_bridge.borrow_mut().commands.push(Command::Info(msg));
        Ok(())
    })?;
    lua.globals().set("INFO", info)?;
    command_fn(lua, bridge, "PAUSE", Command::Pause)?;

    Ok(())
}
