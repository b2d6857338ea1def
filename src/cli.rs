//! Command-line interface for funasr-client
//!
//! Provides argument parsing using clap derive macros.

use crate::config::{Config, parse_bool};
use crate::error::Result;
use crate::protocol::{ChunkSize, Mode};
use crate::session::SessionConfig;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use std::time::Duration;

/// Stream an audio file to a FunASR server and print the transcript
#[derive(Parser, Debug)]
#[command(
    name = "funasr-client",
    version,
    about = "Stream audio to a FunASR WebSocket server and print the transcript",
    subcommand_negates_reqs = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose logging (-v: session progress, -vv: per-chunk details)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Server host (default: localhost)
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Server port (default: 10095)
    #[arg(long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Audio file to transcribe (.wav, .pcm, anything ffmpeg reads, or - for stdin)
    #[arg(long, value_name = "PATH", required = true)]
    pub audio_file: Option<PathBuf>,

    /// Recognition mode: offline, online or 2pass (default: offline)
    #[arg(long, value_name = "MODE", value_parser = parse_mode)]
    pub mode: Option<Mode>,

    /// Use TLS: 1 or 0 (default: 1)
    #[arg(long, value_name = "0|1", value_parser = parse_toggle)]
    pub ssl: Option<bool>,

    /// Chunk size triple, e.g. 5,10,5 (default: 5,10,5)
    #[arg(long, value_name = "A,B,C", value_parser = parse_chunk_size)]
    pub chunk_size: Option<ChunkSize>,

    /// Chunk interval (default: 10)
    #[arg(long, value_name = "N")]
    pub chunk_interval: Option<u32>,

    /// Inverse text normalization: 1 or 0 (default: 1)
    #[arg(long, value_name = "0|1", value_parser = parse_toggle)]
    pub use_itn: Option<bool>,

    /// Grace period after a final result in streaming modes. Examples: 3, 0.5, 500ms
    #[arg(long, value_name = "SECONDS", value_parser = parse_seconds)]
    pub final_wait: Option<f64>,

    /// Give up waiting for results after this long (default: 30s)
    #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// Also write the result as JSON to this file
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check ffmpeg availability and show the effective configuration
    Check,

    /// View configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Configuration actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Dump,
    /// Print the default configuration file path
    Path,
}

impl Cli {
    /// Apply command-line flags on top of `config`.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(ssl) = self.ssl {
            config.server.ssl = ssl;
        }
        if let Some(mode) = self.mode {
            config.stream.mode = mode;
        }
        if let Some(chunk_size) = self.chunk_size {
            config.stream.chunk_size = chunk_size;
        }
        if let Some(interval) = self.chunk_interval {
            config.stream.chunk_interval = interval;
        }
        if let Some(itn) = self.use_itn {
            config.stream.itn = itn;
        }
        if let Some(wait) = self.final_wait {
            config.stream.final_wait_secs = wait;
        }
    }

    /// Session parameters from `config` with every flag applied.
    pub fn session(&self, mut config: Config) -> Result<SessionConfig> {
        self.apply_to(&mut config);
        let mut session = config.session()?;
        if let Some(timeout) = self.timeout {
            session.receive_timeout = timeout;
        }
        Ok(session)
    }
}

fn parse_mode(s: &str) -> std::result::Result<Mode, String> {
    s.parse().map_err(|e: crate::error::FunasrError| e.to_string())
}

fn parse_chunk_size(s: &str) -> std::result::Result<ChunkSize, String> {
    s.parse().map_err(|e: crate::error::FunasrError| e.to_string())
}

/// Parse an on/off flag given as `1`/`0` (also `true`/`false`).
fn parse_toggle(s: &str) -> std::result::Result<bool, String> {
    parse_bool(s).ok_or_else(|| format!("expected 1 or 0, got '{}'", s))
}

/// Parse a duration.
///
/// Bare numbers are seconds and may be fractional (`0.5`). Anything else goes
/// through `humantime` (`500ms`, `2s`, `1m30s`).
fn parse_duration(s: &str) -> std::result::Result<Duration, String> {
    let s = s.trim();
    if let Ok(secs) = s.parse::<f64>() {
        return Duration::try_from_secs_f64(secs)
            .map_err(|_| format!("'{}' is not a usable non-negative number of seconds", s));
    }
    humantime::parse_duration(s).map_err(|e| e.to_string())
}

fn parse_seconds(s: &str) -> std::result::Result<f64, String> {
    parse_duration(s).map(|d| d.as_secs_f64())
}
