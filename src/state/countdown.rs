//! Countdown state and its snapshot

use serde::Serialize;

use crate::timer::{calculate_progress, format_seconds, Mode};

/// Result of advancing the countdown by one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Paused, nothing changed
    Idle,
    /// Still counting down
    Counting(u64),
    /// The given mode just reached zero and is waiting for its transition
    Expired(Mode),
}

/// The active mode and its remaining time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    mode: Mode,
    remaining_seconds: u64,
    running: bool,
    auto_start: bool,
    completed_focus_sessions: u32,
}

impl Countdown {
    /// Create a paused countdown at the full duration of `mode`
    pub fn new(mode: Mode, auto_start: bool) -> Self {
        Self {
            mode,
            remaining_seconds: mode.duration_seconds(),
            running: false,
            auto_start,
            completed_focus_sessions: 0,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn completed_focus_sessions(&self) -> u32 {
        self.completed_focus_sessions
    }

    /// Start or resume. A countdown sitting at zero stays paused.
    pub fn start(&mut self) {
        if self.remaining_seconds > 0 {
            self.running = true;
        }
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Back to the full duration of the current mode, paused
    pub fn reset(&mut self) {
        self.remaining_seconds = self.mode.duration_seconds();
        self.running = false;
    }

    /// Enter `mode` at its full duration, paused
    pub fn switch_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.reset();
    }

    /// Decrement by one second while running
    pub fn tick(&mut self) -> Tick {
        if !self.running {
            return Tick::Idle;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.running = false;
            Tick::Expired(self.mode)
        } else {
            Tick::Counting(self.remaining_seconds)
        }
    }

    /// Move to the successor mode after the current one ran out.
    ///
    /// Keeps running only when auto-start is enabled. Returns the new mode.
    pub fn advance(&mut self) -> Mode {
        if self.mode == Mode::Focus {
            self.completed_focus_sessions += 1;
        }
        let next = self.mode.next();
        self.switch_mode(next);
        if self.auto_start {
            self.start();
        }
        next
    }

    /// Move to the successor mode without finishing the current one
    pub fn skip(&mut self) -> Mode {
        let next = self.mode.next();
        self.switch_mode(next);
        next
    }

    pub fn snapshot(&self) -> CountdownSnapshot {
        let config = self.mode.config();
        CountdownSnapshot {
            mode: self.mode,
            label: config.label,
            color: config.color,
            remaining_seconds: self.remaining_seconds,
            duration_seconds: config.duration_seconds,
            display: format_seconds(self.remaining_seconds),
            progress: calculate_progress(self.remaining_seconds, config.duration_seconds),
            running: self.running,
            next_mode: config.next_mode,
            next_label: config.next_label,
            completed_focus_sessions: self.completed_focus_sessions,
        }
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(Mode::Focus, false)
    }
}

/// What a UI needs to render the countdown
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountdownSnapshot {
    pub mode: Mode,
    pub label: &'static str,
    pub color: &'static str,
    pub remaining_seconds: u64,
    pub duration_seconds: u64,
    /// `MM:SS`
    pub display: String,
    pub progress: f64,
    pub running: bool,
    pub next_mode: Mode,
    pub next_label: &'static str,
    pub completed_focus_sessions: u32,
}
