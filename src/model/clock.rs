use tracing::info;

/// Simulation time. Accumulates scaled frame time; everything that moves
/// is computed from `elapsed()` rather than stepped along with it.
#[derive(Debug, Clone)]
pub struct SimClock {
    elapsed: f64,
    time_scale: f64,
    paused: bool,
}

impl SimClock {
    pub fn new(time_scale: f64, paused: bool) -> Self {
        SimClock {
            elapsed: 0.0,
            time_scale,
            paused,
        }
    }

    /// Advances by one frame of `dt` wall-clock seconds. Returns the new
    /// elapsed simulation time.
    pub fn advance(&mut self, dt: f64) -> f64 {
        if !self.paused {
            self.elapsed += dt * self.time_scale;
        }
        self.elapsed
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn set_elapsed(&mut self, elapsed: f64) {
        self.elapsed = elapsed;
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        info!(paused = self.paused, "toggled pause");
    }

    pub fn speed_up(&mut self) {
        self.time_scale *= 2.0;
        info!("Time scale is {} s / s", self.time_scale);
    }

    pub fn slow_down(&mut self) {
        self.time_scale /= 2.0;
        info!("Time scale is {} s / s", self.time_scale);
    }
}

impl Default for SimClock {
    fn default() -> Self {
        SimClock::new(1.0, false)
    }
}

pub fn format_seconds(seconds: f64) -> String {
    let mut total_seconds = seconds.max(0.0) as u64;
    let n_minutes = 60;
    let n_hours = n_minutes * 60;
    let n_days = n_hours * 24;
    let n_years = 365 * n_days;

    macro_rules! count_and_remainder {
        ($variable:ident, $divisor:expr) => {
            let $variable = total_seconds / $divisor;
            total_seconds %= $divisor;
        };
    }

    count_and_remainder!(years, n_years);
    count_and_remainder!(days, n_days);
    count_and_remainder!(hours, n_hours);
    count_and_remainder!(minutes, n_minutes);

    format!(
        "{}y, {}d, {:02}:{:02}:{:02}",
        years, days, hours, minutes, total_seconds
    )
}
