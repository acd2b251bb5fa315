//! Error types for the timer core

use thiserror::Error;

/// Errors surfaced by mode lookup, formatting and shared state access
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// Mode identifier is not one of `focus`, `shortBreak`, `longBreak`
    #[error("unknown mode: {0}")]
    UnknownMode(String),

    /// A duration that cannot be displayed (negative seconds)
    #[error("invalid duration: {0} seconds")]
    InvalidDuration(i64),

    /// The shared countdown could not be locked
    #[error("countdown state unavailable: {0}")]
    StateUnavailable(String),
}
