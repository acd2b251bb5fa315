//! Completion cue
//!
//! Plays the three-tone chime when a countdown reaches zero. Emitting is
//! fire-and-forget: the call returns immediately, playback runs on its own
//! task, and any failure along the way is logged and dropped.

pub mod chime;
pub mod sink;

use std::{
    panic::AssertUnwindSafe,
    sync::{Arc, Mutex},
};

use futures::FutureExt;
use tokio::{runtime::Handle, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub use chime::{Chime, Tone, SAMPLE_RATE};
#[cfg(feature = "rodio")]
pub use sink::RodioSink;
pub use sink::{CommandSink, CueError, SilentSink, ToneSink};

/// Handle to a chime that has been scheduled
#[derive(Debug)]
pub struct CueHandle {
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl CueHandle {
    /// Stop the chime if it is still playing
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether playback was actually handed to a task
    pub fn is_scheduled(&self) -> bool {
        self.task.is_some()
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Wait until the chime finishes, is cancelled, or fails
    pub async fn finished(self) {
        if let Some(task) = self.task {
            if let Err(e) = task.await {
                warn!("Chime task ended abnormally: {}", e);
            }
        }
    }
}

/// Emits the completion chime through a [`ToneSink`]
pub struct CompletionCue {
    sink: Arc<dyn ToneSink>,
    chime: Arc<Chime>,
    current: Mutex<Option<CancellationToken>>,
}

impl CompletionCue {
    pub fn new(sink: Arc<dyn ToneSink>) -> Self {
        Self {
            sink,
            chime: Arc::new(Chime::completion()),
            current: Mutex::new(None),
        }
    }

    /// Cue that never makes a sound
    pub fn silent() -> Self {
        Self::new(Arc::new(SilentSink))
    }

    pub fn chime(&self) -> &Chime {
        &self.chime
    }

    /// Start the chime and return immediately.
    ///
    /// A chime still playing from an earlier call is cancelled first.
    /// Never fails; problems are logged at warn level.
    pub fn emit(&self) -> CueHandle {
        let token = CancellationToken::new();
        self.replace_current(Some(token.clone()));

        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                warn!("Completion chime skipped, no async runtime: {}", e);
                return CueHandle { token, task: None };
            }
        };

        let sink = Arc::clone(&self.sink);
        let chime = Arc::clone(&self.chime);
        let cancel = token.clone();

        let task = runtime.spawn(async move {
            let playback = AssertUnwindSafe(sink.play(&chime, cancel)).catch_unwind();
            match playback.await {
                Ok(Ok(())) => debug!("Completion chime finished"),
                Ok(Err(e)) => warn!("Completion chime failed: {}", e),
                Err(_) => warn!("Completion chime panicked"),
            }
        });

        debug!("Completion chime scheduled");
        CueHandle {
            token,
            task: Some(task),
        }
    }

    /// Stop whatever chime is currently playing
    pub fn cancel_current(&self) {
        self.replace_current(None);
    }

    fn replace_current(&self, next: Option<CancellationToken>) {
        let mut current = match self.current.lock() {
            Ok(current) => current,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(previous) = std::mem::replace(&mut *current, next) {
            previous.cancel();
        }
    }
}

impl std::fmt::Debug for CompletionCue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionCue")
            .field("chime", &self.chime)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio_util::sync::CancellationToken;

    use super::{Chime, CueError, ToneSink};

    /// Counts plays and returns at once
    #[derive(Debug, Default)]
    pub struct CountingSink {
        plays: AtomicUsize,
    }

    impl CountingSink {
        pub fn plays(&self) -> usize {
            self.plays.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ToneSink for CountingSink {
        async fn play(&self, _chime: &Chime, _cancel: CancellationToken) -> Result<(), CueError> {
            self.plays.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    /// Plays until cancelled
    #[derive(Debug, Default)]
    pub struct HoldingSink;

    #[async_trait]
    impl ToneSink for HoldingSink {
        async fn play(&self, _chime: &Chime, cancel: CancellationToken) -> Result<(), CueError> {
            cancel.cancelled().await;
            Ok(())
        }
    }

    /// Behaves like a machine with no sound card
    #[derive(Debug, Default)]
    pub struct UnavailableSink;

    #[async_trait]
    impl ToneSink for UnavailableSink {
        async fn play(&self, _chime: &Chime, _cancel: CancellationToken) -> Result<(), CueError> {
            Err(CueError::DeviceUnavailable("no audio device".to_string()))
        }
    }
}
