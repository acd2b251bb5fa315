//! Countdown ticker background task

use std::{sync::Arc, time::Duration};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};

use crate::state::{AppState, TickOutcome};

/// Interval between countdown ticks
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Background task that decrements the countdown once per second
pub async fn countdown_ticker_task(state: Arc<AppState>) {
    info!("Starting countdown ticker task");

    let mut ticker = interval(TICK_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately
    ticker.tick().await;

    loop {
        ticker.tick().await;

        match state.tick() {
            Ok(TickOutcome::Completed { finished, next, .. }) => {
                info!(
                    "{} session complete, {} is up ({})",
                    finished.label(),
                    next.label(),
                    next.config().next_label
                );
            }
            Ok(_) => {}
            Err(e) => {
                error!("Failed to tick countdown: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cue::CompletionCue;

    #[tokio::test(start_paused = true)]
    async fn test_ticker_counts_down_running_timer() {
        let state = Arc::new(AppState::new(0, "127.0.0.1".to_string(), false, CompletionCue::silent()));
        state.start().unwrap();

        let task = tokio::spawn(countdown_ticker_task(Arc::clone(&state)));
        tokio::time::sleep(Duration::from_millis(3_500)).await;
        task.abort();

        assert_eq!(state.snapshot().unwrap().remaining_seconds, 1497);
    }
}
