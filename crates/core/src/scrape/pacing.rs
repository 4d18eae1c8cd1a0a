//! Retry and pacing schedule for the extraction pipeline.
//!
//! These are plain values; the pipeline decides when to sleep. Tests use
//! [`BackoffPolicy::immediate`] and [`Pacing::zero`] so nothing waits.

use std::time::Duration;

/// A closed interval of delays, sampled uniformly by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Jitter {
    pub min: Duration,
    pub max: Duration,
}

impl Jitter {
    pub const fn fixed(delay: Duration) -> Self {
        Self {
            min: delay,
            max: delay,
        }
    }

    pub const fn between(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    /// Delay at position `unit` in the interval, where `unit` is in `[0, 1]`.
    pub fn at(&self, unit: f64) -> Duration {
        let unit = unit.clamp(0.0, 1.0);
        let span = self.max.saturating_sub(self.min);
        self.min + span.mul_f64(unit)
    }

    fn scaled(self, factor: f64) -> Self {
        Self {
            min: self.min.mul_f64(factor),
            max: self.max.mul_f64(factor),
        }
    }
}

/// Per-date retry schedule.
///
/// Attempts are numbered from zero. A date is tried at most `max_attempts`
/// times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    pub max_attempts: u32,
    pub block_base: Duration,
    pub block_step: Duration,
    pub error_base: Duration,
    pub error_step: Duration,
    pub empty_rows_delay: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            block_base: Duration::from_secs(10),
            block_step: Duration::from_secs(5),
            error_base: Duration::from_secs(5),
            error_step: Duration::from_secs(1),
            empty_rows_delay: Duration::from_secs(3),
        }
    }
}

impl BackoffPolicy {
    /// Same attempt budget, no waiting.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            block_base: Duration::ZERO,
            block_step: Duration::ZERO,
            error_base: Duration::ZERO,
            error_step: Duration::ZERO,
            empty_rows_delay: Duration::ZERO,
        }
    }

    /// Wait after detecting the bot challenge on `attempt`.
    pub fn block_delay(&self, attempt: u32) -> Duration {
        self.block_base + self.block_step * attempt
    }

    /// Wait after a navigation or page error on `attempt`.
    pub fn error_delay(&self, attempt: u32) -> Duration {
        self.error_base + self.error_step * attempt
    }

    /// Whether another attempt follows `attempt`.
    pub fn has_retry_after(&self, attempt: u32) -> bool {
        attempt + 1 < self.max_attempts
    }

    /// Multiplies every delay by `factor`. Negative or non-finite factors
    /// are treated as zero and one respectively.
    pub fn scaled(self, factor: f64) -> Self {
        let factor = sanitize_factor(factor);
        Self {
            max_attempts: self.max_attempts,
            block_base: self.block_base.mul_f64(factor),
            block_step: self.block_step.mul_f64(factor),
            error_base: self.error_base.mul_f64(factor),
            error_step: self.error_step.mul_f64(factor),
            empty_rows_delay: self.empty_rows_delay.mul_f64(factor),
        }
    }
}

/// Fixed pauses that let the site render between browser actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// After loading a date's page.
    pub settle: Jitter,
    /// Between two dates of the same run.
    pub between_dates: Jitter,
    /// After clicking a row's detail link.
    pub pane_open: Duration,
    /// After closing a detail pane.
    pub pane_close: Duration,
    /// After navigating to a detail fragment address.
    pub fragment_load: Duration,
    /// Upper bound on waiting for the detail container to appear.
    pub pane_wait_timeout: Duration,
    /// Before reading an open detail pane.
    pub detail_read: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            settle: Jitter::between(Duration::from_secs(2), Duration::from_secs(4)),
            between_dates: Jitter::between(Duration::from_secs(2), Duration::from_secs(4)),
            pane_open: Duration::from_secs(3),
            pane_close: Duration::from_secs(2),
            fragment_load: Duration::from_secs(5),
            pane_wait_timeout: Duration::from_secs(10),
            detail_read: Duration::from_secs(1),
        }
    }
}

impl Pacing {
    pub fn zero() -> Self {
        Self {
            settle: Jitter::fixed(Duration::ZERO),
            between_dates: Jitter::fixed(Duration::ZERO),
            pane_open: Duration::ZERO,
            pane_close: Duration::ZERO,
            fragment_load: Duration::ZERO,
            pane_wait_timeout: Duration::ZERO,
            detail_read: Duration::ZERO,
        }
    }

    /// Multiplies every pause by `factor`, with the same rules as
    /// [`BackoffPolicy::scaled`].
    pub fn scaled(self, factor: f64) -> Self {
        let factor = sanitize_factor(factor);
        Self {
            settle: self.settle.scaled(factor),
            between_dates: self.between_dates.scaled(factor),
            pane_open: self.pane_open.mul_f64(factor),
            pane_close: self.pane_close.mul_f64(factor),
            fragment_load: self.fragment_load.mul_f64(factor),
            pane_wait_timeout: self.pane_wait_timeout.mul_f64(factor),
            detail_read: self.detail_read.mul_f64(factor),
        }
    }
}

fn sanitize_factor(factor: f64) -> f64 {
    if !factor.is_finite() {
        1.0
    } else {
        factor.max(0.0)
    }
}
