use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum TimerStatus {
    #[default]
    Idle,
    Running,
    Completed,
}

/// Countdown for the suggested activity.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ActivityTimer {
    pub status: TimerStatus,
    pub activity_id: Option<String>,
    pub target_ms: u64,
    pub elapsed_ms: u64,
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub running_anchor: Option<Instant>,
}

impl ActivityTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, activity_id: &str, duration_minutes: u32, now: Instant) {
        *self = Self {
            status: TimerStatus::Running,
            activity_id: Some(activity_id.to_string()),
            target_ms: u64::from(duration_minutes) * 60_000,
            elapsed_ms: 0,
            started_at: Some(Utc::now()),
            running_anchor: Some(now),
        };
    }

    pub fn elapsed_ms_at(&self, now: Instant) -> u64 {
        match (self.status, self.running_anchor) {
            (TimerStatus::Running, Some(anchor)) => {
                let elapsed = now.saturating_duration_since(anchor).as_millis() as u64;
                elapsed.min(self.target_ms)
            }
            _ => self.elapsed_ms,
        }
    }

    pub fn remaining_ms_at(&self, now: Instant) -> u64 {
        match self.status {
            TimerStatus::Idle | TimerStatus::Completed => 0,
            TimerStatus::Running => self.target_ms.saturating_sub(self.elapsed_ms_at(now)),
        }
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms_at(Instant::now())
    }

    /// Marks the timer completed once its target has elapsed. Returns the status.
    pub fn poll_at(&mut self, now: Instant) -> TimerStatus {
        if self.status == TimerStatus::Running && self.remaining_ms_at(now) == 0 {
            self.complete_at(now);
        }
        self.status
    }

    /// Finish now, early or not.
    pub fn complete_at(&mut self, now: Instant) {
        if self.status != TimerStatus::Running {
            return;
        }
        self.elapsed_ms = self.elapsed_ms_at(now);
        self.status = TimerStatus::Completed;
        self.running_anchor = None;
    }

    pub fn complete(&mut self) {
        self.complete_at(Instant::now());
    }

    pub fn cancel(&mut self) {
        *self = Self::default();
    }

    pub fn format_remaining_at(&self, now: Instant) -> String {
        format_clock(self.remaining_ms_at(now))
    }
}

/// `m:ss`, rounding partial seconds up so a running timer never shows 0:00.
pub fn format_clock(ms: u64) -> String {
    let secs = ms.div_ceil(1000);
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_countdown_runs_to_completion() {
        let start = Instant::now();
        let mut timer = ActivityTimer::new();
        timer.begin("happy1", 5, start);

        assert_eq!(timer.target_ms, 300_000);
        assert_eq!(timer.remaining_ms_at(start), 300_000);
        assert_eq!(timer.format_remaining_at(start), "5:00");

        let later = start + Duration::from_millis(61_500);
        assert_eq!(timer.format_remaining_at(later), "3:59");
        assert_eq!(timer.poll_at(later), TimerStatus::Running);

        let done = start + Duration::from_secs(301);
        assert_eq!(timer.poll_at(done), TimerStatus::Completed);
        assert_eq!(timer.elapsed_ms, 300_000);
        assert_eq!(timer.remaining_ms_at(done), 0);
    }

    #[test]
    fn test_early_completion_and_cancel() {
        let start = Instant::now();
        let mut timer = ActivityTimer::new();
        timer.begin("sad1", 10, start);
        timer.complete_at(start + Duration::from_secs(90));
        assert_eq!(timer.status, TimerStatus::Completed);
        assert_eq!(timer.elapsed_ms, 90_000);

        timer.cancel();
        assert_eq!(timer.status, TimerStatus::Idle);
        assert!(timer.activity_id.is_none());
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(1), "0:01");
        assert_eq!(format_clock(600_000), "10:00");
    }
}
