//! Pomodoro Timer - A local countdown service for focus sessions and breaks
//!
//! This library provides the fixed Focus / Short Break / Long Break mode table,
//! the display helpers a UI calls on every tick, the synthesized completion
//! chime, and the countdown state served over a small JSON API.

pub mod api;
pub mod config;
pub mod cue;
pub mod error;
pub mod state;
pub mod tasks;
pub mod timer;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use cue::CompletionCue;
pub use error::TimerError;
pub use state::AppState;
pub use timer::{calculate_progress, format_time, get_mode_label, Mode, ModeConfig, MODES};
pub use utils::signals::shutdown_signal;
