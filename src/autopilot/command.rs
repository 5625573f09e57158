/// Direction an attitude hold points body +Y at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    Prograde,
    Retrograde,
    /// Along `v × r`, perpendicular to the orbit plane.
    Normal,
    Antinormal,
    /// Away from the planet centre.
    Radial,
    Antiradial,
    /// Along the velocity relative to the rotating ground.
    SurfacePrograde,
    SurfaceRetrograde,
}

/// An actuation request queued by a script during `STEP()` and applied to
/// the simulation afterwards, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    MaintainAttitude,
    Hold(Reference),
    SetMainEngineThrottle(f64),
    MaintainSurfaceVelocity(f64),
    DeployParachute,
    Info(String),
    Pause,
}
