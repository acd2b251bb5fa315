//! Main application state management

use std::{
    sync::{Mutex, MutexGuard},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{
    cue::{CompletionCue, CueHandle},
    error::TimerError,
    timer::Mode,
};
use super::{Countdown, CountdownSnapshot, Tick};

/// What happened on a ticker beat
#[derive(Debug)]
pub enum TickOutcome {
    Idle,
    Counting(u64),
    /// `finished` ran out, the chime was started, and the countdown moved to `next`
    Completed {
        finished: Mode,
        next: Mode,
        cue: CueHandle,
    },
}

/// Shared state behind the ticker task and the HTTP handlers
#[derive(Debug)]
pub struct AppState {
    countdown: Mutex<Countdown>,
    cue: CompletionCue,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Channel for countdown updates
    pub countdown_tx: watch::Sender<CountdownSnapshot>,
    /// Keep the receiver alive to prevent channel closure
    pub _countdown_rx: watch::Receiver<CountdownSnapshot>,
}

impl AppState {
    /// Create state with a paused Focus countdown
    pub fn new(port: u16, host: String, auto_start: bool, cue: CompletionCue) -> Self {
        let countdown = Countdown::new(Mode::Focus, auto_start);
        let (countdown_tx, countdown_rx) = watch::channel(countdown.snapshot());

        Self {
            countdown: Mutex::new(countdown),
            cue,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            countdown_tx,
            _countdown_rx: countdown_rx,
        }
    }

    fn lock_countdown(&self) -> Result<MutexGuard<'_, Countdown>, TimerError> {
        self.countdown
            .lock()
            .map_err(|e| TimerError::StateUnavailable(format!("Failed to lock countdown: {}", e)))
    }

    /// Apply a user action to the countdown and notify watchers
    pub fn update_countdown<F>(&self, action: &str, updater: F) -> Result<CountdownSnapshot, TimerError>
    where
        F: FnOnce(&mut Countdown),
    {
        let mut countdown = self.lock_countdown()?;
        updater(&mut *countdown);
        let snapshot = countdown.snapshot();
        drop(countdown); // Release the lock early

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        self.publish(snapshot.clone());
        Ok(snapshot)
    }

    pub fn start(&self) -> Result<CountdownSnapshot, TimerError> {
        info!("Starting countdown");
        self.update_countdown("start", Countdown::start)
    }

    pub fn pause(&self) -> Result<CountdownSnapshot, TimerError> {
        info!("Pausing countdown");
        self.update_countdown("pause", Countdown::pause)
    }

    pub fn reset(&self) -> Result<CountdownSnapshot, TimerError> {
        info!("Resetting countdown");
        self.update_countdown("reset", Countdown::reset)
    }

    /// Enter `mode` at its full duration and silence any chime still playing
    pub fn switch_mode(&self, mode: Mode) -> Result<CountdownSnapshot, TimerError> {
        info!("Switching to {} mode", mode.label());
        // Cancel under the countdown lock so an expiry cannot slip a chime in between
        self.update_countdown("switch-mode", |countdown| {
            self.cue.cancel_current();
            countdown.switch_mode(mode);
        })
    }

    /// Jump to the next mode without the chime
    pub fn skip(&self) -> Result<CountdownSnapshot, TimerError> {
        let snapshot = self.update_countdown("skip", |countdown| {
            self.cue.cancel_current();
            countdown.skip();
        })?;
        info!("Skipped to {} mode", snapshot.label);
        Ok(snapshot)
    }

    /// Play the completion chime without touching the countdown
    pub fn preview_chime(&self) -> CueHandle {
        info!("Playing chime preview");
        self.cue.emit()
    }

    /// Advance the countdown by one second.
    ///
    /// On expiry the chime is started before the mode transition happens.
    pub fn tick(&self) -> Result<TickOutcome, TimerError> {
        let mut countdown = self.lock_countdown()?;

        let outcome = match countdown.tick() {
            Tick::Idle => return Ok(TickOutcome::Idle),
            Tick::Counting(remaining) => {
                debug!("{} remaining: {}s", countdown.mode().label(), remaining);
                TickOutcome::Counting(remaining)
            }
            Tick::Expired(finished) => {
                let cue = self.cue.emit();
                let next = countdown.advance();
                info!("{} finished, moving to {}", finished.label(), next.label());
                TickOutcome::Completed { finished, next, cue }
            }
        };

        let snapshot = countdown.snapshot();
        drop(countdown);

        self.publish(snapshot);
        Ok(outcome)
    }

    /// Get current countdown snapshot
    pub fn snapshot(&self) -> Result<CountdownSnapshot, TimerError> {
        self.lock_countdown().map(|countdown| countdown.snapshot())
    }

    /// Subscribe to countdown updates
    pub fn subscribe(&self) -> watch::Receiver<CountdownSnapshot> {
        self.countdown_tx.subscribe()
    }

    fn publish(&self, snapshot: CountdownSnapshot) {
        if let Err(e) = self.countdown_tx.send(snapshot) {
            warn!("Failed to send countdown update: {}", e);
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::cue::testing::{CountingSink, HoldingSink, UnavailableSink};
    use crate::timer::format_time;

    fn state_with(sink: Arc<dyn crate::cue::ToneSink>) -> AppState {
        AppState::new(0, "127.0.0.1".to_string(), false, CompletionCue::new(sink))
    }

    #[tokio::test]
    async fn test_focus_session_runs_out_into_short_break() {
        let sink = Arc::new(CountingSink::default());
        let state = state_with(sink.clone());
        state.start().unwrap();

        for _ in 0..1499 {
            assert!(matches!(state.tick().unwrap(), TickOutcome::Counting(_)));
        }
        let snapshot = state.snapshot().unwrap();
        assert_eq!(snapshot.remaining_seconds, 1);
        assert_eq!(format_time(snapshot.remaining_seconds as i64).unwrap(), "00:01");
        assert_eq!(sink.plays(), 0);

        match state.tick().unwrap() {
            TickOutcome::Completed { finished, next, cue } => {
                assert_eq!(finished, Mode::Focus);
                assert_eq!(next, Mode::ShortBreak);
                cue.finished().await;
            }
            other => panic!("expected completion, got {:?}", other),
        }

        assert_eq!(sink.plays(), 1);
        let snapshot = state.snapshot().unwrap();
        assert_eq!(snapshot.mode, Mode::ShortBreak);
        assert_eq!(snapshot.remaining_seconds, 300);
        assert!(!snapshot.running);
        assert!(matches!(state.tick().unwrap(), TickOutcome::Idle));
    }

    #[tokio::test]
    async fn test_completion_survives_missing_audio() {
        let state = state_with(Arc::new(UnavailableSink));
        state.switch_mode(Mode::ShortBreak).unwrap();
        state.start().unwrap();

        let mut completed = None;
        for _ in 0..300 {
            if let TickOutcome::Completed { cue, .. } = state.tick().unwrap() {
                completed = Some(cue);
            }
        }
        completed.expect("short break should complete").finished().await;
        assert_eq!(state.snapshot().unwrap().mode, Mode::Focus);
    }

    #[tokio::test]
    async fn test_watchers_see_updates() {
        let state = state_with(Arc::new(CountingSink::default()));
        let mut rx = state.subscribe();

        state.switch_mode(Mode::LongBreak).unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().remaining_seconds, 900);

        state.start().unwrap();
        state.tick().unwrap();
        assert_eq!(rx.borrow_and_update().display, "14:59");
    }

    #[tokio::test]
    async fn test_switching_silences_finished_session_chime() {
        let state = state_with(Arc::new(HoldingSink));
        state.switch_mode(Mode::ShortBreak).unwrap();
        state.start().unwrap();

        let mut completed = None;
        for _ in 0..300 {
            if let TickOutcome::Completed { cue, .. } = state.tick().unwrap() {
                completed = Some(cue);
            }
        }
        let cue = completed.expect("short break should complete");
        assert!(!cue.is_cancelled());

        state.switch_mode(Mode::LongBreak).unwrap();
        assert!(cue.is_cancelled());
        tokio::time::timeout(std::time::Duration::from_secs(1), cue.finished())
            .await
            .expect("cancelled chime should stop");
    }

    #[tokio::test]
    async fn test_skip_silences_playing_chime() {
        let state = state_with(Arc::new(HoldingSink));
        let cue = state.preview_chime();
        state.skip().unwrap();
        assert!(cue.is_cancelled());
        cue.finished().await;
    }

    #[tokio::test]
    async fn test_last_action_tracking() {
        let state = state_with(Arc::new(CountingSink::default()));
        assert_eq!(state.get_last_action(), (None, None));

        state.skip().unwrap();
        let (action, time) = state.get_last_action();
        assert_eq!(action.as_deref(), Some("skip"));
        assert!(time.is_some());
        assert_eq!(state.snapshot().unwrap().mode, Mode::ShortBreak);
    }
}
