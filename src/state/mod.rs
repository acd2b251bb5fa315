//! State management module
//!
//! This module contains the countdown and the shared application state that drives it.

pub mod app_state;
pub mod countdown;

// Re-export main types
pub use app_state::{AppState, TickOutcome};
pub use countdown::{Countdown, CountdownSnapshot, Tick};
