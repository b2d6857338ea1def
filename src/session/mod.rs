//! One transcription session: connection parameters plus the send and
//! receive halves of the chunked-audio protocol.
//!
//! The sender runs to completion before the receiver starts; both borrow the
//! same WebSocket in turn.

pub mod plan;
pub mod receiver;
pub mod sender;

use crate::defaults;
use crate::protocol::{ChunkSize, Mode};
use std::time::Duration;

pub use plan::ChunkPlan;
pub use receiver::receive_segments;
pub use sender::{send_audio, send_chunks};

/// Immutable parameters of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub host: String,
    pub port: u16,
    /// Connect with `wss://` (certificate checks disabled).
    pub ssl: bool,
    pub mode: Mode,
    pub chunk_size: ChunkSize,
    /// Divides the chunk window; must be positive.
    pub chunk_interval: u32,
    /// Inverse text normalization.
    pub itn: bool,
    /// Grace period after a final result in streaming modes.
    pub final_wait: Duration,
    /// Bound on the whole receive phase.
    pub receive_timeout: Duration,
    /// Pause between the end marker and the first read.
    pub settle_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            host: defaults::HOST.to_string(),
            port: defaults::PORT,
            ssl: true,
            mode: Mode::TwoPass,
            chunk_size: ChunkSize::default(),
            chunk_interval: defaults::CHUNK_INTERVAL,
            itn: true,
            final_wait: Duration::from_secs_f64(defaults::FINAL_WAIT_SECS),
            receive_timeout: Duration::from_secs(defaults::RECEIVE_TIMEOUT_SECS),
            settle_delay: Duration::from_millis(defaults::SETTLE_DELAY_MS),
        }
    }
}

impl SessionConfig {
    /// WebSocket URI for this session.
    pub fn uri(&self) -> String {
        ws_uri(&self.host, self.port, self.ssl)
    }

    /// Pause after each audio chunk.
    ///
    /// Offline sessions are sent as fast as possible; streaming sessions are
    /// paced to real time, one chunk window per message.
    pub fn chunk_pause(&self) -> Duration {
        if self.mode.is_offline() {
            Duration::from_millis(defaults::OFFLINE_CHUNK_PAUSE_MS)
        } else {
            // 60 * window / interval milliseconds, kept integral in microseconds
            Duration::from_micros(
                60_000 * u64::from(self.chunk_size.window()) / u64::from(self.chunk_interval.max(1)),
            )
        }
    }
}

/// Build `wss://host:port` or `ws://host:port`.
pub fn ws_uri(host: &str, port: u16, ssl: bool) -> String {
    let scheme = if ssl { "wss" } else { "ws" };
    format!("{}://{}:{}", scheme, host, port)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_client() {
        let config = SessionConfig::default();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 10095);
        assert!(config.ssl);
        assert_eq!(config.mode, Mode::TwoPass);
        assert_eq!(config.chunk_size.values(), [5, 10, 5]);
        assert_eq!(config.chunk_interval, 10);
        assert!(config.itn);
        assert_eq!(config.final_wait, Duration::from_secs(3));
        assert_eq!(config.receive_timeout, Duration::from_secs(30));
        assert_eq!(config.settle_delay, Duration::from_millis(500));
    }

    #[test]
    fn custom_config_is_kept() {
        let config = SessionConfig {
            host: "192.168.1.100".to_string(),
            port: 10096,
            ssl: false,
            mode: Mode::Online,
            ..Default::default()
        };
        assert_eq!(config.host, "192.168.1.100");
        assert_eq!(config.port, 10096);
        assert!(!config.ssl);
        assert_eq!(config.mode, Mode::Online);
    }

    #[test]
    fn uri_uses_wss_with_ssl() {
        assert_eq!(ws_uri("localhost", 10095, true), "wss://localhost:10095");
    }

    #[test]
    fn uri_uses_ws_without_ssl() {
        assert_eq!(ws_uri("localhost", 10096, false), "ws://localhost:10096");
        let config = SessionConfig {
            host: "asr.internal".to_string(),
            port: 8080,
            ssl: false,
            ..Default::default()
        };
        assert_eq!(config.uri(), "ws://asr.internal:8080");
    }

    #[test]
    fn offline_pause_is_one_millisecond() {
        let config = SessionConfig {
            mode: Mode::Offline,
            ..Default::default()
        };
        assert_eq!(config.chunk_pause(), Duration::from_millis(1));
    }

    #[test]
    fn streaming_pause_tracks_chunk_window() {
        let config = SessionConfig {
            mode: Mode::TwoPass,
            ..Default::default()
        };
        assert_eq!(config.chunk_pause(), Duration::from_millis(60));

        let config = SessionConfig {
            mode: Mode::Online,
            chunk_size: ChunkSize::new([8, 8, 4]).unwrap(),
            chunk_interval: 4,
            ..Default::default()
        };
        assert_eq!(config.chunk_pause(), Duration::from_millis(120));
    }
}
