// ---------------------------------------------------------------------------
// PID Controller (single axis)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Pid {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    error: f64,
    integral: f64,
    derivative: f64,
    prev_error: f64,
}

impl Pid {
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self {
            kp,
            ki,
            kd,
            error: 0.0,
            integral: 0.0,
            derivative: 0.0,
            prev_error: 0.0,
        }
    }

    pub fn update(&mut self, error: f64, dt: f64) -> f64 {
        self.error = error;
        self.integral += error * dt;
        self.derivative = if dt > 0.0 { (error - self.prev_error) / dt } else { 0.0 };
        self.prev_error = error;
        self.output()
    }

    /// Output for the most recent update, without advancing the controller.
    pub fn output(&self) -> f64 {
        self.kp * self.error + self.ki * self.integral + self.kd * self.derivative
    }

    pub fn reset(&mut self) {
        self.error = 0.0;
        self.integral = 0.0;
        self.derivative = 0.0;
        self.prev_error = 0.0;
    }
}
