/// Wall-clock anchored at the first observed timestamp.
///
/// Host timestamps (`performance.now()` style milliseconds) come in on each
/// tick; simulation time is seconds since the first one.
#[derive(Debug, Clone, Copy, Default)]
pub struct Clock {
    start_ms: Option<f64>,
    last_ms: f64,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a timestamp and return elapsed seconds since the first one.
    /// Timestamps that go backwards are clamped to the last one seen.
    pub fn advance(&mut self, now_ms: f64) -> f32 {
        let start = *self.start_ms.get_or_insert(now_ms);
        self.last_ms = now_ms.max(self.last_ms).max(start);
        ((self.last_ms - start) / 1000.0) as f32
    }

    /// Last recorded timestamp in milliseconds.
    pub fn now_ms(&self) -> f64 {
        self.last_ms
    }

    /// Seconds since start at the last recorded timestamp.
    pub fn elapsed(&self) -> f32 {
        match self.start_ms {
            Some(start) => ((self.last_ms - start) / 1000.0) as f32,
            None => 0.0,
        }
    }

    pub fn is_started(&self) -> bool {
        self.start_ms.is_some()
    }
}
