//! Timer core
//!
//! The fixed mode table and the helpers a UI calls on every tick.

pub mod format;
pub mod modes;

// Re-export main types
pub use format::{calculate_progress, format_seconds, format_time};
pub use modes::{get_mode_label, lookup_mode, Mode, ModeConfig, MODES};
