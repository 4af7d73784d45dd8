use std::time::Duration;

use catch_core::config::Timeouts;
use serde::Serialize;

use crate::backend::HealthProbe;

pub const WAKE_WARNING: &str = "⏳ Backend is waking up (this takes ~60 seconds on free tier)...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum WakeOutcome {
    Awake,
    Waited { delay: Duration },
}

/// Give a cold-starting backend time to come up.
///
/// Probes `/health` with the wake timeout; on anything but 200, calls `wait` exactly once with
/// the configured delay. This is a single fixed wait, not a retry loop, and it never prevents
/// a later dispatch.
pub fn ensure_awake<F>(probe: &dyn HealthProbe, timeouts: &Timeouts, wait: F) -> WakeOutcome
where
    F: FnOnce(Duration),
{
    if probe.probe(timeouts.wake_probe).is_connected() {
        return WakeOutcome::Awake;
    }
    let delay = timeouts.wake_delay;
    tracing::warn!(delay_secs = delay.as_secs(), "backend not healthy; waiting for cold start");
    wait(delay);
    WakeOutcome::Waited { delay }
}
