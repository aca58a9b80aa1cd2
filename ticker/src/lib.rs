//! This crate drives a wall-clock timer from a configuration file. The configured value and
//! unit become an [`Interval`], the interval arms a `timerfd` through
//! [`timekeeping::timer::schedule_after`] (or its repeating variant) and the run waits on a
//! `mio` poll until the requested number of expirations or the timeout.

use std::path::Path;
use std::time::Duration;

use mio::{Events, Interest, Poll, Token};
use serde::{Deserialize, Serialize};
use timekeeping::{
    convertible::interval_from_unit,
    error::CommonError,
    timer::{schedule_after, schedule_repeating},
    timer_fd::TimerFd,
    DateTime, Interval, IntervalConvertible,
};
use validator::Validate;

pub use result::TickerResult;

mod result;

const TIMER: Token = Token(0);
const EVENT_CAPACITY: usize = 8;

fn default_expirations() -> u32 {
    1
}

fn default_timeout_ms() -> u64 {
    5_000
}

#[derive(Validate, Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct TickerConfiguration {
    /// Delay before the first expiry, in `unit`. Negative values never fire.
    pub value: f64,
    #[validate(length(min = 1, max = 16))]
    pub unit: String,
    /// Period between expiries, in `unit`.
    pub repeat_every: Option<f64>,
    #[serde(default = "default_expirations")]
    #[validate(range(min = 1, max = 1000))]
    pub expirations: u32,
    #[serde(default = "default_timeout_ms")]
    #[validate(range(min = 1, max = 3_600_000))]
    pub timeout_ms: u64,
}

impl Default for TickerConfiguration {
    fn default() -> Self {
        Self {
            value: 1.0,
            unit: "seconds".to_string(),
            repeat_every: None,
            expirations: default_expirations(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl TickerConfiguration {
    pub fn new(value: f64, unit: &str) -> Self {
        Self {
            value,
            unit: unit.to_owned(),
            ..Default::default()
        }
    }

    pub fn from_json(contents: &str) -> Result<Self, CommonError> {
        let configuration: TickerConfiguration = serde_json::from_str(contents)
            .map_err(|e| CommonError::Config(format!("invalid JSON: {}", e)))?;
        configuration.validate()?;
        Ok(configuration)
    }

    pub fn from_yaml(contents: &str) -> Result<Self, CommonError> {
        let configuration: TickerConfiguration = serde_yaml::from_str(contents)
            .map_err(|e| CommonError::Config(format!("invalid YAML: {}", e)))?;
        configuration.validate()?;
        Ok(configuration)
    }

    /// Reads YAML for `.yml`/`.yaml` files and JSON for everything else.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CommonError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        match path.extension().and_then(|extension| extension.to_str()) {
            Some("yml") | Some("yaml") => Self::from_yaml(&contents),
            _ => Self::from_json(&contents),
        }
    }

    pub fn interval(&self) -> Result<Interval, CommonError> {
        interval_from_unit(self.value, &self.unit)
    }

    pub fn period(&self) -> Result<Option<Interval>, CommonError> {
        self.repeat_every
            .map(|every| interval_from_unit(every, &self.unit))
            .transpose()
    }
}

pub struct Ticker {
    configuration: TickerConfiguration,
}

impl Ticker {
    pub fn new(configuration: TickerConfiguration) -> Self {
        Self { configuration }
    }

    pub fn execute(&self) -> Result<TickerResult, CommonError> {
        let interval = self.configuration.interval()?;
        let period = self.configuration.period()?;
        let wanted = match period {
            Some(_) => self.configuration.expirations as u64,
            None => 1,
        };

        let mut poll = Poll::new()?;
        let mut events = Events::with_capacity(EVENT_CAPACITY);
        let mut timer = TimerFd::new()?;
        poll.registry()
            .register(&mut timer, TIMER, Interest::READABLE)?;

        let started = DateTime::utc_now();
        let give_up = started + (self.configuration.timeout_ms as i64).milliseconds();
        let deadline = match period {
            Some(every) => schedule_repeating(interval, every, &mut timer)?,
            None => schedule_after(interval, &mut timer)?,
        };
        log::info!(
            "Waiting for {} expiration(s), giving up at {}",
            wanted,
            give_up
        );

        let mut result = TickerResult::new(interval, deadline, started);
        while result.expirations < wanted {
            let timeout = match Duration::try_from(give_up.interval_since_now()) {
                Ok(timeout) if !timeout.is_zero() => timeout,
                _ => {
                    log::warn!("Timed out after {} expiration(s)", result.expirations);
                    result.timed_out = true;
                    break;
                }
            };
            if let Err(e) = poll.poll(&mut events, Some(timeout)) {
                if e.kind() == std::io::ErrorKind::Interrupted {
                    continue;
                }
                return Err(e.into());
            }
            for event in events.iter() {
                if event.token() != TIMER || !event.is_readable() {
                    continue;
                }
                let expirations = timer.read_expirations()?;
                if expirations > 0 {
                    let now = DateTime::utc_now();
                    log::info!("Timer fired {} time(s) at {}", expirations, now);
                    result.record_fire(now, expirations);
                }
            }
        }

        timer.disarm()?;
        poll.registry().deregister(&mut timer)?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_configuration_defaults() {
        let configuration =
            TickerConfiguration::from_json(r#"{"value": 2.5, "unit": "s"}"#).unwrap();
        assert_eq!(configuration.expirations, 1);
        assert_eq!(configuration.timeout_ms, 5_000);
        assert_eq!(configuration.repeat_every, None);
        assert_eq!(configuration.interval().unwrap(), 2.5_f64.seconds());
        assert_eq!(configuration.period().unwrap(), None);
    }

    #[test]
    fn test_yaml_configuration() {
        let configuration = TickerConfiguration::from_yaml(
            "value: 1\nunit: minutes\nrepeat_every: 0.5\nexpirations: 3\n",
        )
        .unwrap();
        assert_eq!(configuration.interval().unwrap(), 1_i32.minute());
        assert_eq!(configuration.period().unwrap(), Some(30_i32.seconds()));
        assert_eq!(configuration.expirations, 3);
    }

    #[test]
    fn test_validation_rejects_out_of_range() {
        let result = TickerConfiguration::from_json(
            r#"{"value": 1, "unit": "s", "expirations": 0}"#,
        );
        assert!(matches!(result, Err(CommonError::ValidationError(_))));
        let result = TickerConfiguration::from_json(r#"{"value": 1, "unit": ""}"#);
        assert!(matches!(result, Err(CommonError::ValidationError(_))));
    }

    #[test]
    fn test_malformed_configuration() {
        assert!(matches!(
            TickerConfiguration::from_json("{"),
            Err(CommonError::Config(_))
        ));
        assert!(matches!(
            TickerConfiguration::from_yaml("value: [1"),
            Err(CommonError::Config(_))
        ));
    }

    #[test]
    fn test_unknown_unit() {
        let configuration = TickerConfiguration::new(1.0, "fortnights");
        assert!(matches!(
            configuration.interval(),
            Err(CommonError::InvalidArgument(_))
        ));
        assert!(matches!(
            Ticker::new(configuration).execute(),
            Err(CommonError::InvalidArgument(_))
        ));
    }
}
