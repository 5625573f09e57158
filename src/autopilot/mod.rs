//! Lua autopilot sandbox.
//!
//! A script defines a global `STEP()` that runs once per simulation tick.
//! It sees a fixed set of host functions (telemetry queries and actuation
//! requests) and only the `math`, `string` and `table` libraries on top of
//! the base library. A script fault unloads the program; it never stops the
//! simulation.

pub mod command;
pub mod host;

pub use command::{Command, Reference};

use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use log::{info, warn};
use mlua::{Lua, LuaOptions, StdLib, Value};
use thiserror::Error;

use crate::gnc::Controller;
use crate::sim::{Simulation, Telemetry};
use host::{Bridge, SharedBridge};

/// Base-library entry points that would reach the file system.
const BLOCKED_GLOBALS: [&str; 2] = ["dofile", "loadfile"];

#[derive(Debug, Error)]
pub enum AutopilotError {
    #[error("cannot open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{0}")]
    Lua(#[from] mlua::Error),
}

struct Sandbox {
    lua: Lua,
    bridge: SharedBridge,
}

impl Sandbox {
    fn new() -> Result<Self, AutopilotError> {
        let lua = Lua::new_with(StdLib::MATH | StdLib::STRING | StdLib::TABLE, LuaOptions::default())?;
        for name in BLOCKED_GLOBALS {
            lua.globals().set(name, Value::Nil)?;
        }
        let bridge: SharedBridge = Rc::new(RefCell::new(Bridge::default()));
        host::register(&lua, &bridge)?;
        Ok(Self { lua, bridge })
    }
}

/// A loaded (or failed) autopilot program.
pub struct Autopilot {
    path: String,
    sandbox: Option<Sandbox>,
}

impl Autopilot {
    /// Load a script file. Success or failure is reported into `log`; a
    /// failed program is simply not loaded.
    pub fn load<P: AsRef<Path>>(path: P, log: &mut Vec<String>) -> Self {
        let path = path.as_ref().display().to_string();
        let result = fs::read_to_string(&path)
            .map_err(|source| AutopilotError::Io { path: path.clone(), source })
            .and_then(|src| Self::build(&path, &src));
        Self::finish(path, result, log)
    }

    /// Load a script from memory. `name` stands in for the path in messages.
    pub fn load_source(name: &str, source: &str, log: &mut Vec<String>) -> Self {
        Self::finish(name.to_string(), Self::build(name, source), log)
    }

    fn build(name: &str, source: &str) -> Result<Sandbox, AutopilotError> {
        let sandbox = Sandbox::new()?;
        sandbox.lua.load(source).set_name(name).exec()?;
        Ok(sandbox)
    }

    fn finish(path: String, result: Result<Sandbox, AutopilotError>, log: &mut Vec<String>) -> Self {
        match result {
            Ok(sandbox) => {
                info!("Autopilot loaded from {}", path);
                log.push(format!("[INFO] Successfully loaded script from {}", path));
                Self { path, sandbox: Some(sandbox) }
            }
            Err(e) => {
                warn!("Autopilot {} failed to load: {}", path, e);
                log.push(format!("[INFO] Lua error: {}", e));
                Self { path, sandbox: None }
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.sandbox.is_some()
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Run `STEP()` once and apply what it asked for.
    ///
    /// Requests are applied in call order after `STEP()` returns. If it
    /// faults, requests made before the fault still apply and the program
    /// is unloaded.
    pub fn run(&mut self, sim: &mut Simulation, log: &mut Vec<String>) {
        let Some(sandbox) = &self.sandbox else {
            return;
        };

        let step = match sandbox.lua.globals().get::<Value>("STEP") {
            Ok(Value::Function(f)) => f,
            _ => {
                warn!("Autopilot {} has no STEP(), unloading", self.path);
                log.push("[INFO] STEP() not defined. Unloading autopilot program.".to_string());
                self.sandbox = None;
                return;
            }
        };

        sandbox.bridge.borrow_mut().telemetry = Telemetry::capture(sim);
        let result = step.call::<()>(());
        let commands = std::mem::take(&mut sandbox.bridge.borrow_mut().commands);
        for cmd in commands {
            sim.apply_command(cmd, log);
        }

        if let Err(e) = result {
            warn!("Autopilot {} faulted: {}", self.path, e);
            log.push(format!("[INFO] Lua error: {}", e));
            self.sandbox = None;
        }
    }
}

impl Controller for Autopilot {
    fn control(&mut self, sim: &mut Simulation, log: &mut Vec<String>) {
        self.run(sim, log);
    }

    fn is_ready(&self) -> bool {
        self.is_loaded()
    }

    fn name(&self) -> &str {
        &self.path
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
