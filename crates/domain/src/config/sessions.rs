use std::time::Duration;

use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Session drivers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Timing knobs for scripted conversation sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionsConfig {
    /// Lower bound of the random pause before each scripted reply.
    #[serde(default = "d_think_time_min_ms")]
    pub think_time_min_ms: u64,
    /// Upper bound of the random pause before each scripted reply.
    #[serde(default = "d_think_time_max_ms")]
    pub think_time_max_ms: u64,
    /// Random delay between starting two sessions.
    #[serde(default = "d_stagger_min_ms")]
    pub stagger_min_ms: u64,
    #[serde(default = "d_stagger_max_ms")]
    pub stagger_max_ms: u64,
    /// How long the follow-up sweep keeps running after every session
    /// finished. Defaults to twice the idle threshold.
    #[serde(default)]
    pub linger_secs: Option<u64>,
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            think_time_min_ms: d_think_time_min_ms(),
            think_time_max_ms: d_think_time_max_ms(),
            stagger_min_ms: d_stagger_min_ms(),
            stagger_max_ms: d_stagger_max_ms(),
            linger_secs: None,
        }
    }
}

impl SessionsConfig {
    pub fn think_time(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.think_time_min_ms),
            Duration::from_millis(self.think_time_max_ms),
        )
    }

    pub fn stagger(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.stagger_min_ms),
            Duration::from_millis(self.stagger_max_ms),
        )
    }

    pub fn linger(&self, idle_threshold_secs: u64) -> Duration {
        Duration::from_secs(
            self.linger_secs
                .unwrap_or_else(|| idle_threshold_secs.saturating_mul(2)),
        )
    }
}

fn d_think_time_min_ms() -> u64 {
    1_000
}
fn d_think_time_max_ms() -> u64 {
    3_000
}
fn d_stagger_min_ms() -> u64 {
    500
}
fn d_stagger_max_ms() -> u64 {
    1_500
}
