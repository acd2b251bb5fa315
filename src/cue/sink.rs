//! Audio output backends for the completion chime

use std::{process::Stdio, time::Duration};

use async_trait::async_trait;
use thiserror::Error;
use tokio::{
    io::AsyncWriteExt,
    process::{Child, ChildStdin, Command},
};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::chime::{Chime, SAMPLE_RATE};

/// Extra time a player gets past the chime length before it is killed
pub const RELEASE_GRACE: Duration = Duration::from_secs(1);

/// Errors that can occur during chime playback
#[derive(Error, Debug)]
pub enum CueError {
    /// No usable audio output
    #[error("audio output not available: {0}")]
    DeviceUnavailable(String),

    /// Output was opened but playback did not complete
    #[error("playback failed: {0}")]
    PlaybackFailed(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Something that can play a chime to completion.
///
/// Implementations return once the audio resources are released, or early
/// when `cancel` fires.
#[async_trait]
pub trait ToneSink: Send + Sync {
    async fn play(&self, chime: &Chime, cancel: CancellationToken) -> Result<(), CueError>;
}

/// Sound disabled
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSink;

#[async_trait]
impl ToneSink for SilentSink {
    async fn play(&self, _chime: &Chime, _cancel: CancellationToken) -> Result<(), CueError> {
        debug!("Sound disabled, skipping chime");
        Ok(())
    }
}

/// Pipes raw PCM to an external player such as `aplay` or `paplay`
#[derive(Debug, Clone)]
pub struct CommandSink {
    program: String,
    args: Vec<String>,
}

impl CommandSink {
    pub const DEFAULT_PLAYER: &'static str = "aplay -q -t raw -f S16_LE -r 44100 -c 1 -";

    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Build from a whitespace separated command line
    pub fn from_command_line(command_line: &str) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self::new(program, parts.collect()))
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    async fn feed_and_wait(
        child: &mut Child,
        mut stdin: ChildStdin,
        pcm: &[u8],
    ) -> std::io::Result<std::process::ExitStatus> {
        stdin.write_all(pcm).await?;
        stdin.shutdown().await?;
        drop(stdin);
        child.wait().await
    }
}

impl Default for CommandSink {
    fn default() -> Self {
        Self::from_command_line(Self::DEFAULT_PLAYER).unwrap_or_else(|| Self::new("aplay", Vec::new()))
    }
}

#[async_trait]
impl ToneSink for CommandSink {
    async fn play(&self, chime: &Chime, cancel: CancellationToken) -> Result<(), CueError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| CueError::DeviceUnavailable(format!("failed to launch {}: {}", self.program, e)))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| CueError::PlaybackFailed(format!("{} has no stdin", self.program)))?;

        let pcm = chime.render_pcm_s16le(SAMPLE_RATE);
        let deadline = chime.total_duration() + RELEASE_GRACE;

        let outcome = tokio::select! {
            _ = cancel.cancelled() => None,
            result = tokio::time::timeout(deadline, Self::feed_and_wait(&mut child, stdin, &pcm)) => Some(result),
        };

        match outcome {
            None => {
                debug!("Chime cancelled, stopping {}", self.program);
                child.kill().await?;
                Ok(())
            }
            Some(Err(_elapsed)) => {
                child.kill().await?;
                Err(CueError::PlaybackFailed(format!(
                    "{} still running {:?} after the chime ended",
                    self.program, RELEASE_GRACE
                )))
            }
            Some(Ok(result)) => {
                let status = result?;
                if status.success() {
                    debug!("Chime played through {}", self.program);
                    Ok(())
                } else {
                    Err(CueError::PlaybackFailed(format!("{} exited with {}", self.program, status)))
                }
            }
        }
    }
}

/// Plays through the default output device
#[cfg(feature = "rodio")]
#[derive(Debug, Clone, Copy, Default)]
pub struct RodioSink;

#[cfg(feature = "rodio")]
#[async_trait]
impl ToneSink for RodioSink {
    async fn play(&self, chime: &Chime, cancel: CancellationToken) -> Result<(), CueError> {
        let samples = chime.render(SAMPLE_RATE);

        // The output stream is not Send, so it lives and dies on the blocking thread
        tokio::task::spawn_blocking(move || {
            let (_stream, handle) = rodio::OutputStream::try_default()
                .map_err(|e| CueError::DeviceUnavailable(e.to_string()))?;
            let sink = rodio::Sink::try_new(&handle).map_err(|e| CueError::PlaybackFailed(e.to_string()))?;
            sink.append(rodio::buffer::SamplesBuffer::new(1, SAMPLE_RATE, samples));

            while !sink.empty() {
                if cancel.is_cancelled() {
                    sink.stop();
                    break;
                }
                std::thread::sleep(Duration::from_millis(10));
            }
            Ok(())
        })
        .await
        .map_err(|e| CueError::PlaybackFailed(e.to_string()))?
    }
}
