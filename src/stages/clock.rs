//! Current-date lookup used to ground prompts in time.

use chrono::{DateTime, Datelike, Local};
use serde_json::{Value, json};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock frozen at one instant.
pub struct FixedClock(pub DateTime<Local>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

/// The `get_current_datetime()` lookup result.
pub fn current_datetime(clock: &dyn Clock) -> Value {
    let now = clock.now();
    json!({
        "current_date": now.format("%Y-%m-%d").to_string(),
        "current_time": now.format("%H:%M:%S").to_string(),
        "current_datetime": now.format("%Y-%m-%d %H:%M:%S").to_string(),
        "year": now.year(),
        "month": now.month(),
        "day": now.day(),
        "formatted": now.format("%B %d, %Y").to_string(),
        "iso_format": now.to_rfc3339(),
    })
}

/// Line embedded in every stage prompt.
pub fn date_context(now: &DateTime<Local>) -> String {
    format!(
        "Current Date: {} ({})",
        now.format("%B %d, %Y"),
        now.format("%Y-%m-%d")
    )
}
