//! Pacing between image requests and optional per-slide dwell.
//!
//! The image service rate-limits aggressively, so a fixed delay runs
//! between successive image requests regardless of whether the previous
//! one succeeded.  Separately, a configurable dwell time can hold each
//! slide on screen after it is appended; dwell is additive to the pace
//! delay, not a replacement for it.

use std::time::Duration;

use crate::config::PacingConfig;

/// Enforces the inter-request delay and the optional dwell.
#[derive(Debug, Clone)]
pub struct Pacer {
    delay: Duration,
    dwell: Option<Duration>,
}

impl Pacer {
    pub fn from_config(config: &PacingConfig) -> Self {
        Self {
            delay: Duration::from_millis(config.image_request_delay_ms),
            dwell: config.slide_dwell_secs.map(Duration::from_secs),
        }
    }

    /// Wait the fixed inter-request delay.
    pub async fn pace(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }

    /// Wait the per-slide dwell, if one is configured.
    pub async fn dwell(&self) {
        if let Some(dwell) = self.dwell {
            tokio::time::sleep(dwell).await;
        }
    }

    /// Replace the dwell duration; `None` disables dwelling.
    pub fn set_dwell(&mut self, dwell: Option<Duration>) {
        self.dwell = dwell;
    }

    pub fn dwell_duration(&self) -> Option<Duration> {
        self.dwell
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
