//! Configuration and CLI argument handling

use std::sync::Arc;

use clap::{Parser, ValueEnum};

use crate::cue::{CommandSink, ToneSink, SilentSink};

/// Where the completion chime is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SoundBackend {
    /// Pipe raw PCM to the `--player` command
    Command,
    /// No sound
    Off,
    /// Default output device
    #[cfg(feature = "rodio")]
    Rodio,
}

/// CLI argument parsing structure
#[derive(Parser)]
#[command(name = "pomodoro-timer")]
#[command(about = "A local Pomodoro countdown service with a synthesized completion chime")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Keep counting after a mode finishes instead of pausing
    #[arg(short, long)]
    pub auto_start: bool,

    /// Chime output
    #[arg(long, value_enum, default_value = "command")]
    pub sound: SoundBackend,

    /// Player command line fed with s16le mono 44.1 kHz PCM on stdin
    #[arg(long, default_value = CommandSink::DEFAULT_PLAYER)]
    pub player: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Build the chime output selected on the command line
    pub fn tone_sink(&self) -> Arc<dyn ToneSink> {
        match self.sound {
            SoundBackend::Command => match CommandSink::from_command_line(&self.player) {
                Some(sink) => Arc::new(sink),
                None => {
                    tracing::warn!("Empty --player command, sound disabled");
                    Arc::new(SilentSink)
                }
            },
            SoundBackend::Off => Arc::new(SilentSink),
            #[cfg(feature = "rodio")]
            SoundBackend::Rodio => Arc::new(crate::cue::RodioSink),
        }
    }
}
