use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// No file loaded yet
    Empty,
    Stopped,
    Playing,
    Paused,
}

impl PlaybackState {
    pub fn label(self) -> &'static str {
        match self {
            PlaybackState::Empty => "No file loaded",
            PlaybackState::Stopped => "Stopped",
            PlaybackState::Playing => "Playing",
            PlaybackState::Paused => "Paused",
        }
    }

    pub fn pause_button_label(self) -> &'static str {
        if self.is_paused() {
            "Resume"
        } else {
            "Pause"
        }
    }

    pub fn is_paused(self) -> bool {
        self == PlaybackState::Paused
    }
}

/// Wall-clock accounting of how long the current track has been audible.
#[derive(Debug, Clone, Default)]
pub struct PlaybackClock {
    running_since: Option<Instant>,
    accumulated: Duration,
}

impl PlaybackClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, now: Instant) {
        self.accumulated = Duration::ZERO;
        self.running_since = Some(now);
    }

    pub fn pause(&mut self, now: Instant) {
        if let Some(since) = self.running_since.take() {
            self.accumulated += now.saturating_duration_since(since);
        }
    }

    pub fn resume(&mut self, now: Instant) {
        if self.running_since.is_none() {
            self.running_since = Some(now);
        }
    }

    pub fn reset(&mut self) {
        self.running_since = None;
        self.accumulated = Duration::ZERO;
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        match self.running_since {
            Some(since) => self.accumulated + now.saturating_duration_since(since),
            None => self.accumulated,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSnapshot {
    pub elapsed: Duration,
    pub duration: Option<Duration>,
}

impl ProgressSnapshot {
    pub fn remaining(&self) -> Option<Duration> {
        self.duration.map(|total| remaining(total, self.elapsed))
    }

    /// Fraction of the track played, 0.0 when the length is unknown.
    pub fn fraction(&self) -> f32 {
        match self.duration {
            Some(total) if !total.is_zero() => {
                (self.elapsed.as_secs_f32() / total.as_secs_f32()).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }

    pub fn countdown_label(&self) -> String {
        match self.remaining() {
            Some(left) => format!("Time remaining: {}", format_clock(left)),
            None => format!("Elapsed: {}", format_clock(self.elapsed)),
        }
    }
}

pub fn remaining(total: Duration, elapsed: Duration) -> Duration {
    total.saturating_sub(elapsed)
}

/// `MM:SS`, or `H:MM:SS` from one hour up.
pub fn format_clock(duration: Duration) -> String {
    let total = duration.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}
