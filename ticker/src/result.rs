use serde::Serialize;
use timekeeping::{timer::Deadline, DateTime, Interval};

#[derive(Debug, Default, Serialize, Clone)]
pub struct TickerResult {
    /// Configured delay; non-finite values serialize as `null`
    pub interval_ns: f64,
    /// `None` when the timer was armed to never fire
    pub deadline: Option<DateTime>,
    pub started: Option<DateTime>,
    pub fires: Vec<DateTime>,
    pub expirations: u64,
    pub timed_out: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TickerResult {
    pub fn new(interval: Interval, deadline: Deadline, started: DateTime) -> Self {
        Self {
            interval_ns: interval.nanoseconds(),
            deadline: (!deadline.is_never()).then(|| deadline.to_date_time()),
            started: Some(started),
            ..Default::default()
        }
    }

    pub fn from_error(error: String) -> Self {
        Self {
            error: Some(error),
            ..Default::default()
        }
    }

    pub fn record_fire(&mut self, at: DateTime, expirations: u64) {
        self.fires.push(at);
        self.expirations += expirations;
    }
}
