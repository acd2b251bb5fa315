//! Static mode table

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::TimerError;

/// One of the three timer phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    Focus,
    ShortBreak,
    LongBreak,
}

/// Display and transition settings for a single mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeConfig {
    pub id: Mode,
    pub label: &'static str,
    pub duration_seconds: u64,
    pub color: &'static str,
    pub color_rgb: (u8, u8, u8),
    pub next_mode: Mode,
    pub next_label: &'static str,
}

/// Every mode, in display order
pub static MODES: [ModeConfig; 3] = [
    ModeConfig {
        id: Mode::Focus,
        label: "Focus",
        duration_seconds: 25 * 60,
        color: "#ef4444",
        color_rgb: (239, 68, 68),
        next_mode: Mode::ShortBreak,
        next_label: "Take a Short Break",
    },
    ModeConfig {
        id: Mode::ShortBreak,
        label: "Short Break",
        duration_seconds: 5 * 60,
        color: "#10b981",
        color_rgb: (16, 185, 129),
        next_mode: Mode::Focus,
        next_label: "Start Focus Session",
    },
    ModeConfig {
        id: Mode::LongBreak,
        label: "Long Break",
        duration_seconds: 15 * 60,
        color: "#3b82f6",
        color_rgb: (59, 130, 246),
        next_mode: Mode::Focus,
        next_label: "Start Focus Session",
    },
];

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Focus, Mode::ShortBreak, Mode::LongBreak];

    /// Identifier used on the wire
    pub const fn id(self) -> &'static str {
        match self {
            Mode::Focus => "focus",
            Mode::ShortBreak => "shortBreak",
            Mode::LongBreak => "longBreak",
        }
    }

    pub fn config(self) -> &'static ModeConfig {
        match self {
            Mode::Focus => &MODES[0],
            Mode::ShortBreak => &MODES[1],
            Mode::LongBreak => &MODES[2],
        }
    }

    pub fn label(self) -> &'static str {
        self.config().label
    }

    pub fn duration_seconds(self) -> u64 {
        self.config().duration_seconds
    }

    /// Mode entered automatically when this one runs out
    pub fn next(self) -> Mode {
        self.config().next_mode
    }

    pub fn is_break(self) -> bool {
        matches!(self, Mode::ShortBreak | Mode::LongBreak)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Mode {
    type Err = TimerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|mode| mode.id() == s)
            .ok_or_else(|| TimerError::UnknownMode(s.to_string()))
    }
}

/// Strict lookup of a mode configuration by identifier
pub fn lookup_mode(mode_id: &str) -> Result<&'static ModeConfig, TimerError> {
    mode_id.parse::<Mode>().map(Mode::config)
}

/// Label for a mode identifier, falling back to the Focus label
pub fn get_mode_label(mode_id: &str) -> &'static str {
    lookup_mode(mode_id)
        .map(|config| config.label)
        .unwrap_or(Mode::Focus.config().label)
}
