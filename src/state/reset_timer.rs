//! One-shot, cancellable form reset timer

use std::time::{Duration, Instant};

/// A single pending deadline.
///
/// Scheduling replaces any pending deadline, so at most one reset is ever
/// outstanding.
#[derive(Debug, Clone)]
pub struct ResetTimer {
    delay: Duration,
    scheduled_at: Option<Instant>,
}

impl ResetTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            scheduled_at: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm the timer to fire `delay` after `now`
    pub fn schedule(&mut self, now: Instant) {
        if self.scheduled_at.is_some() {
            tracing::debug!("Replacing pending reset");
        }
        self.scheduled_at = Some(now);
    }

    pub fn cancel(&mut self) {
        self.scheduled_at = None;
    }

    pub fn is_pending(&self) -> bool {
        self.scheduled_at.is_some()
    }

    /// Whether the deadline has passed; firing disarms the timer
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        if self.is_due(now) {
            self.scheduled_at = None;
            true
        } else {
            false
        }
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.scheduled_at
            .is_some_and(|start| now.saturating_duration_since(start) >= self.delay)
    }

    /// Fraction of the delay already elapsed, in `0.0..=1.0`
    pub fn progress(&self, now: Instant) -> f32 {
        match self.scheduled_at {
            Some(start) if !self.delay.is_zero() => {
                let elapsed = now.saturating_duration_since(start);
                (elapsed.as_secs_f32() / self.delay.as_secs_f32()).min(1.0)
            }
            Some(_) => 1.0,
            None => 0.0,
        }
    }
}
