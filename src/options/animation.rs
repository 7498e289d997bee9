use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[schemars(title = "Animation", inline)]
#[serde(default)]
/// Timing parameters for camera animations.
pub struct AnimationOptions {
    /// Milliseconds between two ticks.
    #[schemars(title = "Tick Interval (ms)", range(min = 1, max = 1000))]
    pub tick_interval_ms: u64,
    /// Duration used when a request does not specify one.
    #[schemars(title = "Default Duration (ms)", range(min = 0, max = 10000))]
    pub default_duration_ms: u64,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            tick_interval_ms: 50,
            default_duration_ms: 1000,
        }
    }
}

impl AnimationOptions {
    /// Tick interval, never shorter than one millisecond.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    /// Duration applied to requests that leave it unspecified.
    #[must_use]
    pub fn default_duration(&self) -> Duration {
        Duration::from_millis(self.default_duration_ms)
    }
}
