use std::time::Duration;

use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Follow-up scheduler
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Idle detection cadence.
///
/// `poll_interval_secs` is how often the sweep runs; `idle_threshold_secs`
/// is how long a lead may stay silent before it is nudged. The two are
/// independent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowUpConfig {
    #[serde(default = "d_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "d_idle_threshold_secs")]
    pub idle_threshold_secs: u64,
}

impl Default for FollowUpConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: d_poll_interval_secs(),
            idle_threshold_secs: d_idle_threshold_secs(),
        }
    }
}

impl FollowUpConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn idle_threshold(&self) -> Duration {
        Duration::from_secs(self.idle_threshold_secs)
    }
}

fn d_poll_interval_secs() -> u64 {
    5
}

fn d_idle_threshold_secs() -> u64 {
    10
}
